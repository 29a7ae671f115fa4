//! Single class generation inside a module
//!
//! # Example
//!
//! ```bash
//! aztec make controller Blog Admin/PostController
//! ```

use anyhow::{bail, Context, Result};
use aztec::config::AztecConfig;
use aztec::generate::{ArtifactGenerator, ArtifactKind, FileStatus, GeneratedFile, OverwritePolicy, TemplateStore};
use aztec::inspect::ModuleLocator;
use console::style;
use tracing::info;

use crate::output::print_files;

/// Write one bare model, controller, request or resource
#[derive(Debug, Clone)]
pub struct MakeArtifactCommand {
    kind: ArtifactKind,
    module: String,
    name: String,
    force: bool,
}

impl MakeArtifactCommand {
    /// Create a command writing class `name` of `kind` into `module`
    #[must_use]
    pub fn new(kind: ArtifactKind, module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            module: module.into(),
            name: name.into(),
            force: false,
        }
    }

    /// Replace the class if it already exists
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the module does not exist, the name is not a
    /// valid class path, the class already exists without `--force`, or the
    /// file cannot be written.
    pub fn execute(&self, config: &AztecConfig) -> Result<GeneratedFile> {
        let module_path = ModuleLocator::from_config(config)
            .locate(&self.module)
            .with_context(|| format!("Cannot create {} {}", self.kind, self.name))?;
        let templates = TemplateStore::from_config(config);
        let generator = ArtifactGenerator::new(self.kind, &module_path, &self.name, config, &templates)?;

        let file = generator
            .write(&OverwritePolicy::from(self.force))
            .with_context(|| format!("Failed to write {} {}", self.kind, self.name))?;
        if file.status == FileStatus::Skipped {
            bail!(
                "{} already exists: {} (use --force to replace it)",
                self.kind.label(),
                file.path.display()
            );
        }

        info!(
            kind = %self.kind,
            namespace = %generator.namespace(),
            path = %file.path.display(),
            "single file generated"
        );
        print_files([&file], &module_path);
        println!(
            "\n{}",
            style(format!("{} created successfully.", self.kind.label())).green().bold()
        );
        Ok(file)
    }
}
