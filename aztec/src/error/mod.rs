//! Error types and error handling
//!
//! Introspection failures (locator, read, parse, missing class) abort a whole
//! generation run. Generation failures (missing template, write failure) are
//! fatal only to the layer that raised them; the pipeline records them and
//! moves on. Conditions that are not failures at all, such as a provider file
//! that could not be patched or a property default that could not be read
//! statically, are reported as values instead (see
//! [`ProviderPatch`](crate::generate::patch::ProviderPatch) and
//! [`ModelMetadata::notes`](crate::inspect::ModelMetadata::notes)).

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AztecError>;

/// Framework error type
#[derive(Debug, Error)]
pub enum AztecError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// No module directory matched the requested name
    #[error("Module \"{module}\" not found under \"{}\". Checked: {}", .root.display(), join_paths(.tried))]
    ModuleNotFound {
        /// Requested module name
        module: String,
        /// Configured modules root
        root: PathBuf,
        /// Every candidate directory that was checked
        tried: Vec<PathBuf>,
    },

    /// No model source file matched the requested class name
    #[error("Model \"{model}\" not found inside module \"{}\". Searched: {}", .module_path.display(), .tried.join(", "))]
    ModelNotFound {
        /// Requested model class name
        model: String,
        /// Module directory that was searched
        module_path: PathBuf,
        /// Relative candidates tried, then the recursive scan
        tried: Vec<String>,
    },

    /// A source file could not be read
    #[error("Unable to read file {}: {source}", .path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A source file is not valid enough to inspect
    #[error("Parse error in {} at line {line}: {message}", .path.display())]
    Parse {
        /// File that failed
        path: PathBuf,
        /// 1-based line of the offending token
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// The source file contains no class declaration
    #[error("No class found in file {}", .path.display())]
    NoClass {
        /// File that was inspected
        path: PathBuf,
    },

    /// The first class declaration has no name
    #[error("Unnamed class in file {}", .path.display())]
    UnnamedClass {
        /// File that was inspected
        path: PathBuf,
    },

    /// A class name that cannot become a file path
    #[error("Invalid class name \"{name}\": {reason}")]
    InvalidName {
        /// Name as given
        name: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// A template body could not be found
    #[error("Stub file not found: {name}")]
    TemplateMissing {
        /// Template name that was requested
        name: String,
    },

    /// A generated file could not be written
    #[error("Unable to write file {}: {source}", .path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Augmentation input could not be collected
    #[error("Unable to read augmentation input: {0}")]
    Augment(#[source] std::io::Error),
}

impl AztecError {
    /// Whether the error aborts the whole run rather than a single layer
    #[must_use]
    pub const fn is_fatal_to_run(&self) -> bool {
        !matches!(self, Self::TemplateMissing { .. } | Self::Write { .. })
    }
}

impl From<figment::Error> for AztecError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
