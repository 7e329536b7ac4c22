//! Building the codebase index: scan, parse in parallel, group by package.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use wirescope_core::errors::{ParseError, PipelineError};
use wirescope_core::types::FxHashMap;
use wirescope_core::WirescopeConfig;

use super::module::GoModule;
use super::package::Package;
use crate::parsers::build_constraint::excludes_without;
use crate::parsers::{GoFile, GoParser};
use crate::scanner::{GoScanner, ScanStats};

/// Immutable index of every package below a search root.
#[derive(Debug)]
pub struct CodebaseIndex {
    root: PathBuf,
    module: GoModule,
    /// Sorted by import path.
    packages: Vec<Package>,
    by_import_path: FxHashMap<String, usize>,
    stats: ScanStats,
    errors: Vec<String>,
    excluded_files: usize,
}

impl CodebaseIndex {
    /// Scan and parse everything below `root`.
    pub fn build(root: &Path, config: &WirescopeConfig) -> Result<Self, PipelineError> {
        let start = Instant::now();
        let scan = GoScanner::new(config.scan.clone()).scan(root)?;
        // Fail fast on a broken grammar instead of once per file.
        GoParser::new()?;

        let parsed: Vec<Result<GoFile, ParseError>> = scan
            .files
            .par_iter()
            .map_init(GoParser::new, |parser, file| match parser {
                Ok(parser) => parser.parse(&file.content, &file.rel_path),
                Err(e) => Err(ParseError::GrammarLoad {
                    message: e.to_string(),
                }),
            })
            .collect();

        let mut errors = scan.errors;
        let mut files = Vec::with_capacity(parsed.len());
        for result in parsed {
            match result {
                Ok(file) => files.push(file),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unparseable Go file");
                    errors.push(e.to_string());
                }
            }
        }

        let module = GoModule::load(root);
        let excluded_tags = config.scan.effective_excluded_build_tags();
        let mut index = Self::from_files(root, module, files, &excluded_tags);
        index.stats = scan.stats;
        index.errors = errors;

        tracing::info!(
            root = %root.display(),
            module = %index.module.path,
            packages = index.packages.len(),
            files = index.stats.total_files,
            excluded = index.excluded_files,
            duration_ms = start.elapsed().as_millis() as u64,
            "codebase indexed"
        );
        Ok(index)
    }

    /// Group already-parsed files into packages. Files whose build constraint
    /// requires one of `excluded_tags` are dropped.
    pub fn from_files(root: &Path, module: GoModule, files: Vec<GoFile>, excluded_tags: &[String]) -> Self {
        let mut by_dir: BTreeMap<String, Vec<GoFile>> = BTreeMap::new();
        let mut excluded_files = 0;
        for file in files {
            let excluded = file.build_constraint.as_deref().is_some_and(|expr| {
                excluded_tags.iter().any(|tag| excludes_without(expr, tag))
            });
            if excluded {
                tracing::debug!(path = %file.path, "excluded by build constraint");
                excluded_files += 1;
                continue;
            }
            let dir = file
                .path
                .rsplit_once('/')
                .map(|(dir, _)| dir.to_string())
                .unwrap_or_default();
            by_dir.entry(dir).or_default().push(file);
        }

        let mut packages: Vec<Package> = by_dir
            .into_iter()
            .filter_map(|(dir, files)| {
                let import_path = module.import_path_for(&dir);
                into_package(import_path, dir, files)
            })
            .collect();
        packages.sort_by(|a, b| a.import_path.cmp(&b.import_path));

        let by_import_path = packages
            .iter()
            .enumerate()
            .map(|(i, p)| (p.import_path.clone(), i))
            .collect();

        Self {
            root: root.to_path_buf(),
            module,
            packages,
            by_import_path,
            stats: ScanStats::default(),
            errors: Vec::new(),
            excluded_files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn module(&self) -> &GoModule {
        &self.module
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Non-fatal scan and parse errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn excluded_files(&self) -> usize {
        self.excluded_files
    }

    /// Package at `location`: an import path, a `./dir` path, or `""` for the
    /// root package.
    pub fn package(&self, location: &str) -> Option<&Package> {
        if location.is_empty() || location == "." || location == "./" {
            return self.root_package();
        }
        if let Some(&i) = self.by_import_path.get(location) {
            return Some(&self.packages[i]);
        }
        let dir = location.strip_prefix("./")?.trim_end_matches('/');
        self.package_by_dir(dir)
    }

    pub fn package_by_dir(&self, dir: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.dir == dir)
    }

    pub fn root_package(&self) -> Option<&Package> {
        self.package_by_dir("")
    }

    /// Import path a location refers to, so `""` and `./dir` forms share
    /// keys with import paths. Unknown locations are returned unchanged.
    pub fn normalize_location(&self, location: &str) -> String {
        self.package(location)
            .map(|p| p.import_path.clone())
            .unwrap_or_else(|| location.to_string())
    }
}

/// External test packages (`package foo_test`) share a directory with the
/// package under test but are not part of it.
fn into_package(import_path: String, dir: String, files: Vec<GoFile>) -> Option<Package> {
    let name = files
        .iter()
        .map(|f| f.package.as_str())
        .find(|name| !name.ends_with("_test"))
        .or_else(|| files.first().map(|f| f.package.as_str()))?
        .to_string();
    let files: Vec<GoFile> = files
        .into_iter()
        .filter(|f| {
            let keep = f.package == name;
            if !keep {
                tracing::debug!(path = %f.path, package = %f.package, "skipping file from another package");
            }
            keep
        })
        .collect();
    Some(Package {
        import_path,
        dir,
        name,
        files,
    })
}
