//! Go source walker: a sequential directory walk that applies ignore rules,
//! followed by parallel reads.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use rayon::prelude::*;
use wirescope_core::config::ScanConfig;
use wirescope_core::errors::ScanError;

use super::ignores::IgnorePatterns;
use super::types::{ScanResult, ScanStats, SourceFile};

pub struct GoScanner {
    config: ScanConfig,
}

impl GoScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan `root` for Go sources.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        let start = Instant::now();
        let metadata = fs::metadata(root).map_err(|_| ScanError::RootNotFound {
            path: root.to_path_buf(),
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let ignores = IgnorePatterns::new(root, &self.config.extra_ignore);
        let mut walk = Walk {
            root,
            ignores: &ignores,
            include_tests: self.config.effective_include_tests(),
            files: Vec::new(),
            dirs_skipped: 0,
            files_skipped: 0,
            errors: Vec::new(),
        };
        walk.dir(root)?;

        let max_size = self.config.effective_max_file_size();
        let files_skipped = AtomicUsize::new(walk.files_skipped);
        let errors = Mutex::new(walk.errors);

        let read = |path: &PathBuf| -> Option<SourceFile> {
            match read_source(root, path, max_size) {
                Ok(Some(file)) => Some(file),
                Ok(None) => {
                    files_skipped.fetch_add(1, Ordering::Relaxed);
                    None
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read Go file");
                    if let Ok(mut errs) = errors.lock() {
                        errs.push(format!("{}: {}", path.display(), e));
                    }
                    None
                }
            }
        };
        let mut files: Vec<SourceFile> = match self.thread_pool() {
            Some(pool) => pool.install(|| walk.files.par_iter().filter_map(read).collect()),
            None => walk.files.par_iter().filter_map(read).collect(),
        };
        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

        let stats = ScanStats {
            total_files: files.len(),
            total_bytes: files.iter().map(|f| f.content.len() as u64).sum(),
            dirs_skipped: walk.dirs_skipped,
            files_skipped: files_skipped.into_inner(),
            duration: start.elapsed(),
        };
        tracing::debug!(
            root = %root.display(),
            files = stats.total_files,
            skipped = stats.files_skipped,
            "scan complete"
        );

        Ok(ScanResult {
            root: root.to_path_buf(),
            files,
            stats,
            errors: errors.into_inner().unwrap_or_default(),
        })
    }

    fn thread_pool(&self) -> Option<rayon::ThreadPool> {
        let threads = self.config.threads.filter(|&n| n > 0)?;
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| tracing::warn!(threads, error = %e, "falling back to the global thread pool"))
            .ok()
    }
}

struct Walk<'a> {
    root: &'a Path,
    ignores: &'a IgnorePatterns,
    include_tests: bool,
    files: Vec<PathBuf>,
    dirs_skipped: usize,
    files_skipped: usize,
    errors: Vec<String>,
}

impl Walk<'_> {
    fn dir(&mut self, dir: &Path) -> Result<(), ScanError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(source) if dir == self.root => {
                return Err(ScanError::Io {
                    path: dir.to_path_buf(),
                    source,
                })
            }
            Err(e) => {
                self.errors.push(format!("{}: {}", dir.display(), e));
                return Ok(());
            }
        };

        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();
        for path in paths {
            let relative = path.strip_prefix(self.root).unwrap_or(&path);
            if path.is_dir() {
                if self.ignores.is_ignored(relative, true) {
                    self.dirs_skipped += 1;
                } else {
                    self.dir(&path)?;
                }
            } else if path.is_file() && is_go_source(&path) {
                if self.ignores.is_ignored(relative, false) || (!self.include_tests && is_test_file(&path)) {
                    self.files_skipped += 1;
                } else {
                    self.files.push(path);
                }
            }
        }
        Ok(())
    }
}

fn read_source(root: &Path, path: &Path, max_size: u64) -> Result<Option<SourceFile>, std::io::Error> {
    let size = fs::metadata(path)?.len();
    if size > max_size {
        tracing::debug!(path = %path.display(), size, "skipping oversized file");
        return Ok(None);
    }
    let content = fs::read(path)?;
    Ok(Some(SourceFile {
        rel_path: to_rel_path(root, path),
        content,
    }))
}

/// Root-relative, `/`-separated path.
pub(crate) fn to_rel_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_go_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
}

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn scans_go_files_only() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.go", "package main\n");
        write(dir.path(), "svc/service.go", "package svc\n");
        write(dir.path(), "svc/service_test.go", "package svc\n");
        write(dir.path(), "README.md", "# readme\n");
        write(dir.path(), "vendor/dep/dep.go", "package dep\n");
        write(dir.path(), "_tools/tools.go", "package tools\n");

        let result = GoScanner::new(ScanConfig::default()).scan(dir.path()).unwrap();
        let paths: Vec<&str> = result.files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(paths, ["main.go", "svc/service.go"]);
        assert_eq!(result.stats.total_files, 2);
        assert_eq!(result.stats.dirs_skipped, 2);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn includes_tests_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.go", "package a\n");
        write(dir.path(), "a_test.go", "package a\n");

        let config = ScanConfig {
            include_tests: Some(true),
            ..ScanConfig::default()
        };
        let result = GoScanner::new(config).scan(dir.path()).unwrap();
        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn skips_oversized_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "big.go", &format!("package big\n// {}\n", "x".repeat(200)));
        write(dir.path(), "small.go", "package big\n");

        let config = ScanConfig {
            max_file_size: Some(64),
            ..ScanConfig::default()
        };
        let result = GoScanner::new(config).scan(dir.path()).unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].rel_path, "small.go");
        assert_eq!(result.stats.files_skipped, 1);
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = GoScanner::new(ScanConfig::default())
            .scan(&dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }

    #[test]
    fn rel_dir_of_root_file_is_empty() {
        let file = SourceFile {
            rel_path: "main.go".into(),
            content: Vec::new(),
        };
        assert_eq!(file.rel_dir(), "");
        let nested = SourceFile {
            rel_path: "a/b/c.go".into(),
            content: Vec::new(),
        };
        assert_eq!(nested.rel_dir(), "a/b");
    }
}
