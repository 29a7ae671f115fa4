//! Layered CRUD generation for a module model
//!
//! # Example
//!
//! ```bash
//! aztec make-crud Blog Post --only controller,requests,resource
//! ```

use anyhow::{Context, Result};
use aztec::generate::OverwritePolicy;
use aztec::pipeline::{Augmenter, CrudPipeline, Layer, NoAugmentation, RunReport, UnknownLayer};
use console::style;
use tracing::{info, warn};

use crate::output::print_report;
use crate::prompts::{confirm_overwrite, PromptAugmenter};

/// Parse a comma-separated layer list, ignoring empty entries
///
/// # Errors
///
/// Returns [`UnknownLayer`] for the first name that is not a layer.
pub fn parse_layers(list: &str) -> Result<Vec<Layer>, UnknownLayer> {
    list.split(',')
        .filter(|name| !name.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Generate the CRUD layers of one model
#[derive(Debug, Clone)]
pub struct MakeCrudCommand {
    module: String,
    model: String,
    force: bool,
    only: Option<Vec<Layer>>,
    interactive: bool,
}

impl MakeCrudCommand {
    /// Create a command for `model` in `module`
    #[must_use]
    pub fn new(module: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            model: model.into(),
            force: false,
            only: None,
            interactive: true,
        }
    }

    /// Overwrite existing files without asking
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Generate only these layers instead of the configured ones
    #[must_use]
    pub fn only(mut self, layers: Option<Vec<Layer>>) -> Self {
        self.only = layers;
        self
    }

    /// Whether to prompt for augmentations and overwrites
    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    fn policy(&self) -> OverwritePolicy {
        if self.force {
            OverwritePolicy::Always
        } else if self.interactive {
            confirm_overwrite()
        } else {
            OverwritePolicy::Never
        }
    }

    /// Execute the command
    ///
    /// Layer failures are reported, not returned; check
    /// [`RunReport::failures`].
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be located or inspected, or if
    /// prompting fails.
    pub fn execute(&self, pipeline: &CrudPipeline) -> Result<RunReport> {
        println!(
            "{} module={} model={}",
            style("Aztec discovery:").cyan().bold(),
            style(&self.module).green(),
            style(&self.model).green()
        );

        let spec = pipeline
            .inspect(&self.module, &self.model)
            .with_context(|| format!("Failed to inspect {} in module {}", self.model, self.module))?;
        println!("Module path: {}", style(spec.module_path.display()).dim());
        println!("Model file: {}", style(spec.file_path.display()).dim());
        for note in &spec.metadata.notes {
            println!("  {} {note}", style("note:").yellow());
        }

        let layers = self
            .only
            .clone()
            .unwrap_or_else(|| pipeline.default_layers().to_vec());
        if layers.is_empty() {
            warn!(module = %self.module, model = %self.model, "no layers selected");
            println!(
                "{}",
                style("No layers to generate (check config or --only option).").yellow()
            );
            return Ok(RunReport::default());
        }

        let augmenter: Box<dyn Augmenter> = if self.interactive {
            Box::new(PromptAugmenter::new())
        } else {
            Box::new(NoAugmentation)
        };
        let spec = pipeline
            .augment(spec, &layers, augmenter.as_ref())
            .context("Failed to collect generation options")?;

        info!(
            module = %self.module,
            model = %spec.fqcn(),
            layers = ?layers,
            force = self.force,
            "generating crud"
        );
        println!("\n{}", style("Starting CRUD generation...").cyan().bold());
        let report = pipeline.run(&spec, &layers, &self.policy());
        print_report(&report, &spec.module_path);

        let failed = report.failures().count();
        if failed == 0 {
            println!("\n{}", style("CRUD generation completed.").green().bold());
        } else {
            warn!(model = %spec.fqcn(), failed, "crud generation finished with failed layers");
            println!(
                "\n{}",
                style(format!("CRUD generation finished with {failed} failed layer(s).")).red().bold()
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layers() {
        assert_eq!(
            parse_layers("controller, Requests,,routes,").unwrap(),
            vec![Layer::Controller, Layer::Requests, Layer::Routes]
        );
        assert!(parse_layers("").unwrap().is_empty());
        assert_eq!(parse_layers("controller,views").unwrap_err(), UnknownLayer("views".to_string()));
    }

    #[test]
    fn test_policy_follows_flags() {
        let command = MakeCrudCommand::new("Blog", "Post");
        assert!(matches!(command.clone().force(true).policy(), OverwritePolicy::Always));
        assert!(matches!(command.clone().interactive(false).policy(), OverwritePolicy::Never));
        assert!(matches!(command.policy(), OverwritePolicy::Ask(_)));
    }
}
