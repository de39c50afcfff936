//! Engine configuration.
//!
//! [`ExplainConfig`] is immutable once built and injected per call, the same
//! way sessions receive their capability set. It replaces the process-wide
//! registries an embedding program would otherwise mutate (for instance "treat
//! these extra module names as standard-library").
//!
//! ```
//! use lucid::{ExplainConfig, RuntimeVersion};
//!
//! let config = ExplainConfig::new()
//!     .with_version(RuntimeVersion::new(3, 9))
//!     .with_extra_stdlib_names(["my_turtle"]);
//!
//! assert!(config.is_stdlib_module("my_turtle"));
//! assert!(config.is_stdlib_module("math"));
//! assert!(!config.is_stdlib_module("numpy"));
//! ```

use indexmap::IndexSet;

use crate::{
    fault::RuntimeVersion,
    stdlib::{STDLIB_MODULE_NAMES, looks_like_stdlib_path},
};

/// Default similarity cut-off for name and attribute suggestions.
pub const DEFAULT_THRESHOLD: f64 = 0.6;
/// Module attribute suggestions are stricter: modules expose many short,
/// similar names (`cos`, `cosh`, `acosh`).
pub const DEFAULT_MODULE_THRESHOLD: f64 = 0.7;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone)]
pub struct ExplainConfig {
    version: RuntimeVersion,
    lang: String,
    extra_stdlib_names: IndexSet<String>,
    stdlib_dirs: Vec<String>,
    name_threshold: f64,
    attribute_threshold: f64,
    module_threshold: f64,
    max_suggestions: usize,
    read_source_files: bool,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            version: RuntimeVersion::default(),
            lang: "en".to_owned(),
            extra_stdlib_names: IndexSet::new(),
            stdlib_dirs: Vec::new(),
            name_threshold: DEFAULT_THRESHOLD,
            attribute_threshold: DEFAULT_THRESHOLD,
            module_threshold: DEFAULT_MODULE_THRESHOLD,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            read_source_files: true,
        }
    }
}

impl ExplainConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime version assumed when a fault carries no version marker.
    #[must_use]
    pub fn with_version(mut self, version: RuntimeVersion) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    #[must_use]
    pub fn with_extra_stdlib_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_stdlib_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Directories holding the runtime's standard library. When empty, a
    /// path heuristic decides whether a module file belongs to it.
    #[must_use]
    pub fn with_stdlib_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stdlib_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_name_threshold(mut self, threshold: f64) -> Self {
        self.name_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_attribute_threshold(mut self, threshold: f64) -> Self {
        self.attribute_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_module_threshold(mut self, threshold: f64) -> Self {
        self.module_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    /// Allows or forbids the Locator to read offending files from disk.
    #[must_use]
    pub fn with_source_files(mut self, read: bool) -> Self {
        self.read_source_files = read;
        self
    }

    #[must_use]
    pub fn version(&self) -> RuntimeVersion {
        self.version
    }

    #[must_use]
    pub fn lang(&self) -> &str {
        &self.lang
    }

    #[must_use]
    pub fn name_threshold(&self) -> f64 {
        self.name_threshold
    }

    #[must_use]
    pub fn attribute_threshold(&self) -> f64 {
        self.attribute_threshold
    }

    #[must_use]
    pub fn module_threshold(&self) -> f64 {
        self.module_threshold
    }

    #[must_use]
    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    #[must_use]
    pub fn read_source_files(&self) -> bool {
        self.read_source_files
    }

    #[must_use]
    pub fn is_stdlib_module(&self, name: &str) -> bool {
        let top = name.split('.').next().unwrap_or(name);
        STDLIB_MODULE_NAMES.contains(&top) || self.extra_stdlib_names.contains(top)
    }

    /// All standard-library module names, built-in first then injected.
    pub fn stdlib_names(&self) -> impl Iterator<Item = &str> {
        STDLIB_MODULE_NAMES
            .iter()
            .copied()
            .chain(self.extra_stdlib_names.iter().map(String::as_str))
    }

    /// Whether a module loaded from `path` belongs to the standard library.
    #[must_use]
    pub fn is_stdlib_path(&self, path: &str) -> bool {
        if self.stdlib_dirs.is_empty() {
            return looks_like_stdlib_path(path);
        }
        let normalized = path.replace('\\', "/");
        self.stdlib_dirs
            .iter()
            .any(|dir| normalized.starts_with(&dir.replace('\\', "/")))
    }
}
