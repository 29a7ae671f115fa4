//! Interactive prompts
//!
//! [`PromptAugmenter`] asks the user to refine a model spec before
//! generation; [`confirm_overwrite`] builds the per-file overwrite question.

use std::io;
use std::path::Path;

use aztec::generate::OverwritePolicy;
use aztec::model_spec::{Filter, FilterType};
use aztec::pipeline::Augmenter;
use aztec::ModelSpec;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

/// Collects resource relations, filters and sync relations from the terminal
#[derive(Default)]
pub struct PromptAugmenter {
    theme: ColorfulTheme,
}

impl PromptAugmenter {
    /// Create a prompt augmenter with the colorful theme
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn pick_relations(&self, prompt: &str, relations: &[String], preselected: &[String]) -> io::Result<Vec<String>> {
        let defaults: Vec<bool> = relations.iter().map(|r| preselected.contains(r)).collect();
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(relations)
            .defaults(&defaults)
            .interact()
            .map_err(io::Error::other)?;

        Ok(picked.into_iter().map(|index| relations[index].clone()).collect())
    }
}

impl Augmenter for PromptAugmenter {
    fn resource_relations(&self, relations: &[String], defaults: &[String]) -> io::Result<Vec<String>> {
        println!("{} {}", style("Found relationships:").cyan(), relations.join(", "));
        self.pick_relations(
            "Select relations to include in the Resource (defaults to eager loaded ones)",
            relations,
            defaults,
        )
    }

    fn filters(&self, _spec: &ModelSpec) -> io::Result<Vec<Filter>> {
        println!("{}", style("Configuring Service Layer...").cyan());

        let wanted = Confirm::with_theme(&self.theme)
            .with_prompt("Do you want to add custom filters for the list method?")
            .default(true)
            .interact()
            .map_err(io::Error::other)?;
        if !wanted {
            return Ok(Vec::new());
        }

        let kinds = FilterType::ALL.map(FilterType::php_type);
        let mut filters = Vec::new();
        loop {
            let field: String = Input::with_theme(&self.theme)
                .with_prompt("Enter filter field name (leave empty to stop)")
                .allow_empty(true)
                .interact_text()
                .map_err(io::Error::other)?;
            let field = field.trim();
            if field.is_empty() {
                break;
            }

            let kind = Select::with_theme(&self.theme)
                .with_prompt(format!("Select type for filter '{field}'"))
                .items(kinds.as_slice())
                .default(0)
                .interact()
                .map_err(io::Error::other)?;

            upsert(&mut filters, Filter::new(field, FilterType::ALL[kind]));
        }

        Ok(filters)
    }

    fn sync_relations(&self, relations: &[String]) -> io::Result<Vec<String>> {
        self.pick_relations("Select relations to sync on create/update", relations, &[])
    }
}

/// Replace the filter on the same field, or append
fn upsert(filters: &mut Vec<Filter>, filter: Filter) {
    match filters.iter_mut().find(|existing| existing.field == filter.field) {
        Some(existing) => *existing = filter,
        None => filters.push(filter),
    }
}

/// Overwrite policy asking once per existing file; a failed prompt keeps the file
#[must_use]
pub fn confirm_overwrite() -> OverwritePolicy {
    OverwritePolicy::ask(|path: &Path| {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("File [{name}] already exists. Overwrite?"))
            .default(false)
            .interact()
            .unwrap_or(false)
    })
}

/// Ask whether an existing module may be overwritten
///
/// # Errors
///
/// Fails when the terminal cannot be read.
pub fn confirm_module_overwrite(name: &str) -> io::Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "Module [{name}] already exists. This will overwrite existing files. Do you want to continue?"
        ))
        .default(false)
        .interact()
        .map_err(io::Error::other)
}
