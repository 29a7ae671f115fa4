//! Model metadata record
//!
//! Every optional field is `None` when it could not be discovered. Callers
//! must read `None` as "unknown", never as "empty".

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Which introspection tier produced the property values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Reflection through a PHP subprocess
    Runtime,
    /// Syntax-tree analysis
    #[default]
    Static,
}

/// Related table and key of a relation, as reported by reflection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationTarget {
    /// Table of the related model
    pub table: String,
    /// Primary key of the related model
    pub key: String,
}

/// Semantic type of a cast declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastType {
    /// `int`, `integer`
    Integer,
    /// `float`, `double`, `decimal`, `real`
    Float,
    /// `bool`, `boolean`
    Boolean,
    /// `date`, `datetime` and their immutable/timestamp variants
    Date,
    /// `array`, `json`, `object`, `collection`
    Array,
    /// `string`
    String,
    /// Anything else (custom cast classes, `encrypted`, `text`...)
    Other(String),
}

impl CastType {
    /// Classify a raw cast string; parameters after `:` are ignored
    ///
    /// ```
    /// use aztec::inspect::CastType;
    ///
    /// assert_eq!(CastType::from_raw("decimal:2"), CastType::Float);
    /// assert_eq!(CastType::from_raw("datetime:Y-m-d"), CastType::Date);
    /// assert_eq!(CastType::from_raw("text"), CastType::Other("text".to_string()));
    /// ```
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let base = raw.split(':').next().unwrap_or(raw).trim().to_ascii_lowercase();
        match base.as_str() {
            "int" | "integer" => Self::Integer,
            "float" | "double" | "decimal" | "real" => Self::Float,
            "bool" | "boolean" => Self::Boolean,
            "date" | "datetime" | "immutable_date" | "immutable_datetime" | "timestamp" => {
                Self::Date
            }
            "array" | "json" | "object" | "collection" => Self::Array,
            "string" => Self::String,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Validation rules implied by the cast (after the required/sometimes rule)
    #[must_use]
    pub const fn validation_rules(&self) -> &'static [&'static str] {
        match self {
            Self::Integer => &["integer"],
            Self::Float => &["numeric"],
            Self::Boolean => &["boolean"],
            Self::Date => &["date"],
            Self::Array => &["array"],
            Self::String | Self::Other(_) => &["string", "max:255"],
        }
    }
}

/// Everything discovered about a model class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Namespace-qualified class name
    pub fqcn: String,
    /// Simple class name
    pub class_name: String,
    /// `$table`, when declared as a string literal
    pub table: Option<String>,
    /// `$casts`: field → raw cast string
    pub casts: Option<BTreeMap<String, String>>,
    /// `$fillable`
    pub fillable: Option<Vec<String>>,
    /// `$guarded`
    pub guarded: Option<Vec<String>>,
    /// `$hidden`
    pub hidden: Option<Vec<String>>,
    /// `$appends`
    pub appends: Option<Vec<String>>,
    /// `$with` (default eager loads)
    pub with: Option<Vec<String>>,
    /// `$connection`
    pub connection: Option<String>,
    /// `$translatable`
    pub translatable: Option<Vec<String>>,
    /// Relation method names from every discovery strategy
    pub relations: BTreeSet<String>,
    /// Related table/key per relation (runtime tier only)
    pub relation_targets: BTreeMap<String, RelationTarget>,
    /// Tier that produced the property values
    pub strategy: Strategy,
    /// Diagnostics collected while inspecting
    pub notes: Vec<String>,
}

impl ModelMetadata {
    /// Known fillable fields (empty when unknown)
    #[must_use]
    pub fn fillable_fields(&self) -> &[String] {
        self.fillable.as_deref().unwrap_or_default()
    }

    /// Known translatable fields (empty when unknown)
    #[must_use]
    pub fn translatable_fields(&self) -> &[String] {
        self.translatable.as_deref().unwrap_or_default()
    }

    /// Default eager-load relations (empty when unknown)
    #[must_use]
    pub fn eager_loads(&self) -> &[String] {
        self.with.as_deref().unwrap_or_default()
    }

    /// Whether `field` stores per-locale values
    #[must_use]
    pub fn is_translatable(&self, field: &str) -> bool {
        self.translatable_fields().iter().any(|f| f == field)
    }

    /// Cast declared for `field`
    #[must_use]
    pub fn cast_of(&self, field: &str) -> Option<CastType> {
        self.casts
            .as_ref()
            .and_then(|casts| casts.get(field))
            .map(|raw| CastType::from_raw(raw))
    }

    /// Namespace part of the class name (`Modules\Blog\Models`)
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.fqcn.rsplit_once('\\').map_or("", |(ns, _)| ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_classification() {
        assert_eq!(CastType::from_raw("int"), CastType::Integer);
        assert_eq!(CastType::from_raw("Boolean"), CastType::Boolean);
        assert_eq!(CastType::from_raw("immutable_datetime"), CastType::Date);
        assert_eq!(CastType::from_raw("json"), CastType::Array);
        assert_eq!(CastType::from_raw("string"), CastType::String);
        assert_eq!(
            CastType::from_raw(r"App\Casts\Money"),
            CastType::Other(r"App\Casts\Money".to_string())
        );
    }

    #[test]
    fn test_other_casts_use_string_rules() {
        assert_eq!(
            CastType::from_raw("text").validation_rules(),
            CastType::String.validation_rules()
        );
    }

    #[test]
    fn test_unknown_fields_read_as_empty_slices() {
        let metadata = ModelMetadata::default();
        assert!(metadata.fillable.is_none());
        assert!(metadata.fillable_fields().is_empty());
        assert!(!metadata.is_translatable("title"));
        assert!(metadata.cast_of("title").is_none());
    }

    #[test]
    fn test_namespace() {
        let metadata = ModelMetadata {
            fqcn: r"Modules\Blog\Models\Post".to_string(),
            ..ModelMetadata::default()
        };
        assert_eq!(metadata.namespace(), r"Modules\Blog\Models");

        let global = ModelMetadata {
            fqcn: "Post".to_string(),
            ..ModelMetadata::default()
        };
        assert_eq!(global.namespace(), "");
    }
}
