//! Module and model file discovery

use std::path::{Path, PathBuf};

use inflector::Inflector;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::AztecConfig;
use crate::error::{AztecError, Result};

/// Conventional model locations relative to a module, tried in order
pub const MODEL_PATTERNS: &[&str] = &[
    "app/Models/{}.php",
    "Models/{}.php",
    "Entities/{}.php",
    "{}.php",
    "Domain/Models/{}.php",
];

/// Resolves module names to directories under the modules root
#[derive(Debug, Clone)]
pub struct ModuleLocator {
    root: PathBuf,
}

impl ModuleLocator {
    /// Locator rooted at an explicit directory
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locator rooted at the configured `modules_path`
    #[must_use]
    pub fn from_config(config: &AztecConfig) -> Self {
        Self::new(&config.modules_path)
    }

    /// Modules root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the module directory, trying the literal name then the
    /// capitalized form
    ///
    /// # Errors
    ///
    /// Returns [`AztecError::ModuleNotFound`] listing both candidates when
    /// neither is a directory.
    pub fn locate(&self, module: &str) -> Result<PathBuf> {
        let mut tried = vec![self.root.join(module)];
        let capitalized = ucfirst(module);
        if capitalized != module {
            tried.push(self.root.join(&capitalized));
        }

        if let Some(found) = tried.iter().find(|candidate| candidate.is_dir()) {
            debug!(module, path = %found.display(), "module located");
            return Ok(canonical(found));
        }

        Err(AztecError::ModuleNotFound {
            module: module.to_string(),
            root: self.root.clone(),
            tried,
        })
    }
}

/// Finds the source file of a model class inside a module
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelLocator;

impl ModelLocator {
    /// Find `<model>.php` in the conventional locations, then anywhere in
    /// the module tree (file names compared case-insensitively)
    ///
    /// # Errors
    ///
    /// Returns [`AztecError::ModelNotFound`] listing every candidate tried,
    /// ending with the recursive scan.
    pub fn locate(module_path: &Path, model: &str) -> Result<PathBuf> {
        let studly = model.to_pascal_case();
        let names: Vec<&str> = if studly == model {
            vec![model]
        } else {
            vec![model, studly.as_str()]
        };

        let mut tried = Vec::new();
        for pattern in MODEL_PATTERNS {
            for name in &names {
                let relative = pattern.replace("{}", name);
                let candidate = module_path.join(&relative);
                if candidate.is_file() {
                    debug!(model, path = %candidate.display(), "model located by convention");
                    return Ok(canonical(&candidate));
                }
                tried.push(relative);
            }
        }

        if let Some(found) = Self::scan(module_path, model) {
            debug!(model, path = %found.display(), "model located by recursive scan");
            return Ok(canonical(&found));
        }

        tried.push(format!("**/{model}.php (any case)"));
        Err(AztecError::ModelNotFound {
            model: model.to_string(),
            module_path: module_path.to_path_buf(),
            tried,
        })
    }

    /// Recursive, case-insensitive file-name scan; first match wins
    fn scan(module_path: &Path, model: &str) -> Option<PathBuf> {
        let wanted = format!("{model}.php").to_lowercase();
        WalkDir::new(module_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .find(|entry| {
                entry.file_type().is_file()
                    && entry.file_name().to_string_lossy().to_lowercase() == wanted
            })
            .map(walkdir::DirEntry::into_path)
    }
}

/// Uppercase the first character, leaving the rest untouched
#[must_use]
pub fn ucfirst(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
