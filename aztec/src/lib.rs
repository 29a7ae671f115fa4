//! aztec: model introspection and layered CRUD generation for modular PHP
//! projects
//!
//! Given a module name and the bare name of an Eloquent model living in that
//! module, aztec recovers what the model declares and generates the layers
//! around it: controller, form requests, API resource, repository (bound in
//! the module's service provider), service and routes.
//!
//! # Design Principles
//!
//! 1. **Absence is not emptiness**: metadata that cannot be discovered stays
//!    `None`, never a guessed default
//! 2. **Graceful degradation**: runtime reflection when the model is loadable,
//!    static analysis of its source otherwise
//! 3. **Never clobber**: existing files are replaced only when the overwrite
//!    policy allows it; providers and route files are patched idempotently
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aztec::prelude::*;
//!
//! fn main() -> aztec::Result<()> {
//!     let pipeline = CrudPipeline::new(AztecConfig::load()?);
//!     let layers = pipeline.default_layers().to_vec();
//!
//!     let spec = pipeline.inspect("Blog", "Post")?;
//!     let report = pipeline.run(&spec, &layers, &OverwritePolicy::Never);
//!
//!     for file in report.files() {
//!         println!("{} {}", file.status, file.path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`php`]: lexer and declaration-level parser for model sources
//! - [`inspect`]: locators, source and class resolvers producing
//!   [`inspect::ModelMetadata`]
//! - [`model_spec`]: metadata plus user augmentations
//! - [`generate`]: templates, placeholder substitution, writers, patches and
//!   the layer generators
//! - [`pipeline`]: the orchestrator tying them together

pub mod config;
pub mod error;
pub mod generate;
pub mod inspect;
pub mod model_spec;
pub mod observability;
pub mod php;
pub mod pipeline;

pub use error::{AztecError, Result};
pub use model_spec::ModelSpec;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use aztec::prelude::*;
    //! ```

    // Configuration
    pub use crate::config::AztecConfig;

    // Error types
    pub use crate::error::{AztecError, Result};

    // Introspection
    pub use crate::inspect::{ClassResolver, ModelLocator, ModelMetadata, ModuleLocator, SourceResolver};

    // Spec
    pub use crate::model_spec::{Filter, FilterType, ModelSpec};

    // Generation
    pub use crate::generate::{
        ArtifactGenerator, ArtifactKind, FileStatus, GeneratedFile, Generator, GeneratorContext, ModuleGenerator,
        OverwritePolicy, TemplateStore,
    };

    // Orchestration
    pub use crate::pipeline::{Augmenter, CrudPipeline, Layer, NoAugmentation, RunReport};
}
