//! New module scaffolding command

use anyhow::{Context, Result};
use aztec::config::AztecConfig;
use aztec::generate::{GeneratedFile, Generator, ModuleGenerator, OverwritePolicy, TemplateStore};
use console::style;
use tracing::info;

use crate::output::print_files;
use crate::prompts::confirm_module_overwrite;

/// Scaffold a module under the configured modules root
#[derive(Debug, Clone)]
pub struct MakeModuleCommand {
    name: String,
    force: bool,
    interactive: bool,
}

impl MakeModuleCommand {
    /// Create a command for module `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            force: false,
            interactive: true,
        }
    }

    /// Overwrite an existing module without asking
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Whether to ask before overwriting an existing module
    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Execute the command
    ///
    /// An existing module is overwritten with `--force` or after
    /// confirmation; without either, existing files are kept and only
    /// missing ones are created. Returns `None` when the user cancels.
    ///
    /// # Errors
    ///
    /// Returns an error if a folder or file cannot be written, or the
    /// confirmation cannot be read.
    pub fn execute(&self, config: &AztecConfig) -> Result<Option<Vec<GeneratedFile>>> {
        let templates = TemplateStore::from_config(config);
        let generator = ModuleGenerator::new(&self.name, config, &templates);
        let root = generator.module_path();

        let policy = if self.force {
            OverwritePolicy::Always
        } else if root.exists() && self.interactive {
            if !confirm_module_overwrite(generator.name()).context("Failed to read confirmation")? {
                info!(module = generator.name(), "module overwrite cancelled");
                println!("{}", style("Action cancelled.").yellow());
                return Ok(None);
            }
            OverwritePolicy::Always
        } else {
            OverwritePolicy::Never
        };

        info!(
            module = generator.name(),
            path = %root.display(),
            overwrite = matches!(policy, OverwritePolicy::Always),
            "creating module"
        );
        println!(
            "{} {}...",
            style("Creating module:").cyan().bold(),
            style(generator.name()).green().bold()
        );

        let files = generator
            .generate(&policy)
            .with_context(|| format!("Failed to scaffold module {}", generator.name()))?;
        print_files(&files, &root);

        println!(
            "\n{}",
            style(format!("Module [{}] created successfully.", generator.name()))
                .green()
                .bold()
        );
        Ok(Some(files))
    }
}
