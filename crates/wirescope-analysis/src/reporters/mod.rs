//! Reporters: render a dependency forest for people or machines.

pub mod json;
pub mod text;

use crate::resolver::DependencyForest;

pub use json::JsonReporter;
pub use text::TextReporter;

/// Trait for output format reporters.
pub trait Reporter {
    fn name(&self) -> &'static str;
    fn generate(&self, forest: &DependencyForest) -> Result<String, String>;
}

/// Reporter by format name.
pub fn reporter_for(name: &str) -> Option<Box<dyn Reporter>> {
    match name {
        "text" => Some(Box::new(TextReporter)),
        "json" => Some(Box::new(JsonReporter)),
        _ => None,
    }
}
