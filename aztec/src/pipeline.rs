//! CRUD generation pipeline
//!
//! Drives a run end to end: locate the module and model, introspect the
//! class into a [`ModelSpec`], let an [`Augmenter`] refine it, then run the
//! generator for each requested [`Layer`] in order.
//!
//! Introspection errors abort the run. Generation errors are confined to the
//! layer that raised them and collected in the [`RunReport`].
//!
//! # Example
//!
//! ```rust,no_run
//! use aztec::config::AztecConfig;
//! use aztec::generate::OverwritePolicy;
//! use aztec::pipeline::{CrudPipeline, NoAugmentation};
//!
//! # fn example() -> aztec::Result<()> {
//! let config = AztecConfig::load()?;
//! let pipeline = CrudPipeline::new(config);
//! let layers = pipeline.default_layers().to_vec();
//!
//! let spec = pipeline.inspect("Blog", "Post")?;
//! let spec = pipeline.augment(spec, &layers, &NoAugmentation)?;
//! let report = pipeline.run(&spec, &layers, &OverwritePolicy::Never);
//!
//! for (layer, err) in report.failures() {
//!     eprintln!("{layer}: {err}");
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::io;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AztecConfig;
use crate::error::{AztecError, Result};
use crate::generate::{
    ControllerGenerator, GeneratedFile, Generator, GeneratorContext, OverwritePolicy, RepositoryGenerator,
    RequestsGenerator, ResourceGenerator, RoutesGenerator, ServiceGenerator, TemplateStore,
};
use crate::inspect::{ClassResolver, ModelLocator, ModuleLocator, SourceResolver};
use crate::model_spec::{Filter, ModelSpec};

/// A generated CRUD layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// HTTP controller
    Controller,
    /// Store and update form requests
    Requests,
    /// API resource
    Resource,
    /// Repository interface, implementation and provider binding
    Repository,
    /// Service
    Service,
    /// Route group
    Routes,
}

impl Layer {
    /// Every layer, in generation order
    pub const ALL: [Self; 6] = [
        Self::Controller,
        Self::Requests,
        Self::Resource,
        Self::Repository,
        Self::Service,
        Self::Routes,
    ];

    /// Configuration name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Controller => "controller",
            Self::Requests => "requests",
            Self::Resource => "resource",
            Self::Repository => "repository",
            Self::Service => "service",
            Self::Routes => "routes",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A layer name that is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown layer '{0}' (expected one of: controller, requests, resource, repository, service, routes)")]
pub struct UnknownLayer(pub String);

impl FromStr for Layer {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|layer| layer.as_str() == name)
            .ok_or_else(|| UnknownLayer(s.to_string()))
    }
}

/// Supplies the user's refinements of a spec
///
/// Every method defaults to "nothing selected".
pub trait Augmenter {
    /// Relations the resource should include, chosen from `relations`
    ///
    /// `defaults` are the model's eager loads, used when nothing is chosen.
    ///
    /// # Errors
    ///
    /// Fails when input cannot be read.
    fn resource_relations(&self, _relations: &[String], _defaults: &[String]) -> io::Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Ad-hoc filters for the service's list method
    ///
    /// # Errors
    ///
    /// Fails when input cannot be read.
    fn filters(&self, _spec: &ModelSpec) -> io::Result<Vec<Filter>> {
        Ok(Vec::new())
    }

    /// Relations synchronized on create and update, chosen from `relations`
    ///
    /// # Errors
    ///
    /// Fails when input cannot be read.
    fn sync_relations(&self, _relations: &[String]) -> io::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Augmenter that selects nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAugmentation;

impl Augmenter for NoAugmentation {}

/// Result of one layer
#[derive(Debug)]
pub struct LayerOutcome {
    /// The layer
    pub layer: Layer,
    /// Files it produced, or why it failed
    pub result: Result<Vec<GeneratedFile>>,
}

/// Outcome of every requested layer, in order
#[derive(Debug, Default)]
pub struct RunReport {
    outcomes: Vec<LayerOutcome>,
}

impl RunReport {
    /// Per-layer outcomes
    #[must_use]
    pub fn outcomes(&self) -> &[LayerOutcome] {
        &self.outcomes
    }

    /// Whether no layer ran
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Layers that failed, with their errors
    pub fn failures(&self) -> impl Iterator<Item = (Layer, &AztecError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (outcome.layer, err)))
    }

    /// Every file touched by a successful layer
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .flatten()
    }
}

/// Orchestrates introspection and generation
#[derive(Debug)]
pub struct CrudPipeline {
    config: AztecConfig,
    templates: TemplateStore,
    resolver: ClassResolver,
}

impl CrudPipeline {
    /// Pipeline using the configured templates and introspection settings
    #[must_use]
    pub fn new(config: AztecConfig) -> Self {
        Self {
            templates: TemplateStore::from_config(&config),
            resolver: ClassResolver::from_config(&config),
            config,
        }
    }

    /// Replace the class resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: ClassResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the template store
    #[must_use]
    pub fn with_templates(mut self, templates: TemplateStore) -> Self {
        self.templates = templates;
        self
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &AztecConfig {
        &self.config
    }

    /// Layers generated when none are requested
    #[must_use]
    pub fn default_layers(&self) -> &[Layer] {
        &self.config.layers
    }

    /// Locate and introspect `model` in `module`
    ///
    /// # Errors
    ///
    /// Fails when the module or model cannot be found, or the model source
    /// cannot be read, parsed or resolved to a class.
    pub fn inspect(&self, module: &str, model: &str) -> Result<ModelSpec> {
        info!(module, model, "inspecting model");

        let module_path = ModuleLocator::from_config(&self.config).locate(module)?;
        debug!(path = %module_path.display(), "module located");

        let file_path = ModelLocator::locate(&module_path, model)?;
        debug!(path = %file_path.display(), "model located");

        let identity = SourceResolver::resolve(&file_path)?;
        let metadata = self.resolver.resolve(&identity.fqcn, &file_path)?;
        for note in &metadata.notes {
            debug!(fqcn = %metadata.fqcn, note, "introspection note");
        }

        Ok(ModelSpec::new(module, module_path, file_path, metadata))
    }

    /// Apply the augmenter's choices for the requested layers
    ///
    /// Relations are offered for the resource layer; filters and sync
    /// relations for the service layer. Relation prompts are skipped when the
    /// model has no relations.
    ///
    /// # Errors
    ///
    /// [`AztecError::Augment`] when the augmenter fails.
    pub fn augment(&self, mut spec: ModelSpec, layers: &[Layer], augmenter: &dyn Augmenter) -> Result<ModelSpec> {
        let relations: Vec<String> = spec.metadata.relations.iter().cloned().collect();

        if layers.contains(&Layer::Resource) && !relations.is_empty() {
            spec.resource_relations = augmenter
                .resource_relations(&relations, spec.metadata.eager_loads())
                .map_err(AztecError::Augment)?;
        }

        if layers.contains(&Layer::Service) {
            spec.filters = augmenter.filters(&spec).map_err(AztecError::Augment)?;
            if !relations.is_empty() {
                spec.sync_relations = augmenter.sync_relations(&relations).map_err(AztecError::Augment)?;
            }
        }

        Ok(spec)
    }

    /// Generate each layer in order
    ///
    /// A failing layer is recorded and the run continues with the next one.
    #[must_use]
    pub fn run(&self, spec: &ModelSpec, layers: &[Layer], policy: &OverwritePolicy) -> RunReport {
        if layers.is_empty() {
            warn!("no layers to generate");
            return RunReport::default();
        }

        let ctx = GeneratorContext::new(spec, &self.config, &self.templates);
        let outcomes = layers
            .iter()
            .map(|&layer| {
                let result = generator_for(layer, ctx).generate(policy);
                match &result {
                    Ok(files) => info!(%layer, files = files.len(), "layer generated"),
                    Err(err) => warn!(%layer, error = %err, "layer failed"),
                }
                LayerOutcome { layer, result }
            })
            .collect();

        RunReport { outcomes }
    }
}

fn generator_for(layer: Layer, ctx: GeneratorContext<'_>) -> Box<dyn Generator + '_> {
    match layer {
        Layer::Controller => Box::new(ControllerGenerator::new(ctx)),
        Layer::Requests => Box::new(RequestsGenerator::new(ctx)),
        Layer::Resource => Box::new(ResourceGenerator::new(ctx)),
        Layer::Repository => Box::new(RepositoryGenerator::new(ctx)),
        Layer::Service => Box::new(ServiceGenerator::new(ctx)),
        Layer::Routes => Box::new(RoutesGenerator::new(ctx)),
    }
}
