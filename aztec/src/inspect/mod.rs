//! Model introspection engine
//!
//! Turns a module name and a bare model name into a [`ModelMetadata`]
//! record:
//!
//! 1. [`ModuleLocator`] finds the module directory
//! 2. [`ModelLocator`] finds the model source file
//! 3. [`SourceResolver`] recovers the class identity and table
//! 4. [`ClassResolver`] reads the declarative properties (runtime reflection
//!    first, static analysis as fallback) and unions in relations found by
//!    scanning method bodies

mod class;
mod locator;
mod metadata;
mod source;

pub use class::{
    scan_relations, ClassResolver, Introspection, Introspector, RuntimeIntrospector,
    StaticIntrospector, Target, Unavailable, RELATION_CONSTRUCTORS,
};
pub use locator::{ucfirst, ModelLocator, ModuleLocator, MODEL_PATTERNS};
pub use metadata::{CastType, ModelMetadata, RelationTarget, Strategy};
pub use source::{first_class, parse_file, SourceIdentity, SourceResolver};
