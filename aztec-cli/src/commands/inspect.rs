//! Model inspection command

use anyhow::{Context, Result};
use aztec::pipeline::CrudPipeline;
use tracing::debug;

/// Print what aztec discovers about a model, without generating anything
#[derive(Debug, Clone)]
pub struct InspectCommand {
    module: String,
    model: String,
}

impl InspectCommand {
    /// Create a command for `model` in `module`
    #[must_use]
    pub fn new(module: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            model: model.into(),
        }
    }

    /// The model spec as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be located or inspected.
    pub fn render(&self, pipeline: &CrudPipeline) -> Result<String> {
        let spec = pipeline
            .inspect(&self.module, &self.model)
            .with_context(|| format!("Failed to inspect {} in module {}", self.model, self.module))?;
        debug!(
            model = %spec.fqcn(),
            strategy = ?spec.metadata.strategy,
            notes = spec.metadata.notes.len(),
            "model inspected"
        );
        serde_json::to_string_pretty(&spec).context("Failed to serialize model spec")
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be located or inspected.
    pub fn execute(&self, pipeline: &CrudPipeline) -> Result<()> {
        println!("{}", self.render(pipeline)?);
        Ok(())
    }
}
