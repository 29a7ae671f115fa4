//! Generation input: model metadata plus user augmentations

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::inspect::ModelMetadata;

/// Primitive type of an ad-hoc list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Passed through as received
    #[default]
    String,
    /// Parsed with `intval`
    Int,
    /// Parsed with `FILTER_VALIDATE_BOOLEAN`
    Bool,
    /// Passed through as received
    Array,
}

impl FilterType {
    /// Every filter type, in prompt order
    pub const ALL: [Self; 4] = [Self::String, Self::Int, Self::Bool, Self::Array];

    /// PHP parameter type name
    #[must_use]
    pub const fn php_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.php_type())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "int" | "integer" => Ok(Self::Int),
            "bool" | "boolean" => Ok(Self::Bool),
            "array" => Ok(Self::Array),
            other => Err(format!("unknown filter type '{other}' (expected string, int, bool or array)")),
        }
    }
}

/// An ad-hoc list filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Column / query parameter name
    pub field: String,
    /// Parameter type
    #[serde(rename = "type")]
    pub kind: FilterType,
}

impl Filter {
    /// Create a filter
    #[must_use]
    pub fn new(field: impl Into<String>, kind: FilterType) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

/// Everything a generator needs to know about one model
///
/// Built once per run from the inspection results, optionally augmented,
/// then shared read-only by every generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    /// Module name as requested
    pub module: String,
    /// Module directory
    pub module_path: PathBuf,
    /// Model source file
    pub file_path: PathBuf,
    /// Inspection results
    #[serde(flatten)]
    pub metadata: ModelMetadata,
    /// Relations exposed by the API resource (falls back to `with` when empty)
    pub resource_relations: Vec<String>,
    /// Ad-hoc list filters, in order
    pub filters: Vec<Filter>,
    /// Relations synchronized on create/update
    pub sync_relations: Vec<String>,
}

impl ModelSpec {
    /// Spec with no augmentations
    #[must_use]
    pub fn new(
        module: impl Into<String>,
        module_path: impl Into<PathBuf>,
        file_path: impl Into<PathBuf>,
        metadata: ModelMetadata,
    ) -> Self {
        Self {
            module: module.into(),
            module_path: module_path.into(),
            file_path: file_path.into(),
            metadata,
            resource_relations: Vec::new(),
            filters: Vec::new(),
            sync_relations: Vec::new(),
        }
    }

    /// Relations exposed by the API resource
    #[must_use]
    pub fn with_resource_relations(mut self, relations: Vec<String>) -> Self {
        self.resource_relations = relations;
        self
    }

    /// Append one list filter
    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, kind: FilterType) -> Self {
        self.filters.push(Filter::new(field, kind));
        self
    }

    /// Replace the list filters
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    /// Relations synchronized on write
    #[must_use]
    pub fn with_sync_relations(mut self, relations: Vec<String>) -> Self {
        self.sync_relations = relations;
        self
    }

    /// Simple class name
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.metadata.class_name
    }

    /// Namespace-qualified class name
    #[must_use]
    pub fn fqcn(&self) -> &str {
        &self.metadata.fqcn
    }

    /// Relations the resource should include: the user selection, else `with`
    #[must_use]
    pub fn exposed_relations(&self) -> &[String] {
        if self.resource_relations.is_empty() {
            self.metadata.eager_loads()
        } else {
            &self.resource_relations
        }
    }
}
