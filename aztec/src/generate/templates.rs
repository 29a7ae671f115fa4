//! Template lookup
//!
//! A stub is looked up in the override directory first (when configured),
//! then among the embedded defaults.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::stubs;
use super::write::{write_file, GeneratedFile, OverwritePolicy};
use crate::config::AztecConfig;
use crate::error::{AztecError, Result};

/// Resolves stub names to template bodies
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    override_dir: Option<PathBuf>,
    embedded: bool,
}

impl TemplateStore {
    /// Embedded stubs only
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            override_dir: None,
            embedded: true,
        }
    }

    /// Stubs from `dir`, falling back to the embedded ones
    #[must_use]
    pub fn with_overrides(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
            embedded: true,
        }
    }

    /// Stubs from `dir` only; a stub missing there is an error
    #[must_use]
    pub fn directory_only(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
            embedded: false,
        }
    }

    /// Store honouring `stubs_path` from configuration
    #[must_use]
    pub fn from_config(config: &AztecConfig) -> Self {
        config
            .stubs_path
            .as_ref()
            .map_or_else(Self::embedded, Self::with_overrides)
    }

    /// Override directory, if any
    #[must_use]
    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Body of the stub called `name`
    ///
    /// # Errors
    ///
    /// [`AztecError::TemplateMissing`] when no source provides the stub,
    /// [`AztecError::Read`] when an override exists but cannot be read.
    pub fn load(&self, name: &str) -> Result<String> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(name);
            if path.is_file() {
                debug!(stub = name, path = %path.display(), "using stub override");
                return fs::read_to_string(&path).map_err(|source| AztecError::Read { path, source });
            }
        }

        if self.embedded {
            if let Some(body) = stubs::embedded(name) {
                return Ok(body.to_string());
            }
        }

        Err(AztecError::TemplateMissing {
            name: name.to_string(),
        })
    }

    /// Copy every embedded stub into `dir` for customization
    ///
    /// # Errors
    ///
    /// [`AztecError::Write`] when a stub cannot be written.
    pub fn publish(dir: &Path, policy: &OverwritePolicy) -> Result<Vec<GeneratedFile>> {
        stubs::ALL
            .iter()
            .map(|(name, body)| write_file(&dir.join(name), body, policy, format!("Stub {name}")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::write::FileStatus;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_lookup() {
        let store = TemplateStore::embedded();
        assert!(store.load("controller.stub").unwrap().contains("{{ controllerClass }}"));
    }

    #[test]
    fn test_missing_template() {
        let err = TemplateStore::embedded().load("nope.stub").unwrap_err();
        assert_eq!(err.to_string(), "Stub file not found: nope.stub");
    }

    #[test]
    fn test_override_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("controller.stub"), "custom {{ model }}").unwrap();

        let store = TemplateStore::with_overrides(dir.path());
        assert_eq!(store.load("controller.stub").unwrap(), "custom {{ model }}");
        assert!(store.load("service.stub").unwrap().contains("{{ serviceClass }}"));
    }

    #[test]
    fn test_directory_only_store_has_no_fallback() {
        let dir = tempdir().unwrap();
        let store = TemplateStore::directory_only(dir.path());
        assert!(matches!(
            store.load("service.stub"),
            Err(AztecError::TemplateMissing { .. })
        ));
    }

    #[test]
    fn test_publish_writes_every_stub() {
        let dir = tempdir().unwrap();
        let files = TemplateStore::publish(dir.path(), &OverwritePolicy::Never).unwrap();

        assert_eq!(files.len(), stubs::ALL.len());
        assert!(files.iter().all(|f| f.status == FileStatus::Created));
        assert!(dir.path().join("module/provider.stub").is_file());

        let again = TemplateStore::publish(dir.path(), &OverwritePolicy::Never).unwrap();
        assert!(again.iter().all(|f| f.status == FileStatus::Skipped));
    }
}
