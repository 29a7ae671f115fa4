//! Copy the embedded stubs out for customization

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use aztec::config::AztecConfig;
use aztec::generate::{GeneratedFile, OverwritePolicy, TemplateStore};
use console::style;
use tracing::info;

use crate::output::print_files;

/// Directory used when neither the command nor the config names one
pub const DEFAULT_STUBS_DIR: &str = "stubs/aztec";

/// Publish every embedded stub into an override directory
#[derive(Debug, Clone, Default)]
pub struct PublishStubsCommand {
    dir: Option<PathBuf>,
    force: bool,
}

impl PublishStubsCommand {
    /// Create a command publishing into `dir`, or the configured directory
    #[must_use]
    pub const fn new(dir: Option<PathBuf>) -> Self {
        Self { dir, force: false }
    }

    /// Replace stubs that were already published
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Destination: the explicit directory, then `stubs_path`, then
    /// [`DEFAULT_STUBS_DIR`]
    #[must_use]
    pub fn destination(&self, config: &AztecConfig) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| config.stubs_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STUBS_DIR))
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if a stub cannot be written.
    pub fn execute(&self, config: &AztecConfig) -> Result<Vec<GeneratedFile>> {
        let dir = self.destination(config);
        let files = TemplateStore::publish(&dir, &OverwritePolicy::from(self.force))
            .with_context(|| format!("Failed to publish stubs to {}", dir.display()))?;

        info!(path = %dir.display(), stubs = files.len(), "stubs published");
        println!(
            "{} {}",
            style("Published stubs to").cyan().bold(),
            style(dir.display()).green()
        );
        print_files(&files, &dir);
        if !uses_overrides(config, &dir) {
            println!(
                "\nSet {} in aztec.toml to use them.",
                style(format!("stubs_path = \"{}\"", dir.display())).yellow()
            );
        }
        Ok(files)
    }
}

fn uses_overrides(config: &AztecConfig, dir: &Path) -> bool {
    config.stubs_path.as_deref() == Some(dir)
}
