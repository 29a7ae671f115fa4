//! Template-driven generators
//!
//! Every layer generator renders one or more stubs with a set of
//! placeholders derived from the [`ModelSpec`] and writes the result under
//! the module's source root, honouring an [`OverwritePolicy`]. The
//! repository and routes generators additionally patch files that already
//! exist (see [`patch`]). [`ArtifactGenerator`] writes a single bare class
//! without a model spec.
//!
//! # Example
//!
//! ```rust,no_run
//! use aztec::config::AztecConfig;
//! use aztec::generate::{ControllerGenerator, Generator, GeneratorContext, OverwritePolicy, TemplateStore};
//! # fn example(spec: aztec::ModelSpec) -> aztec::Result<()> {
//! let config = AztecConfig::default();
//! let templates = TemplateStore::embedded();
//! let ctx = GeneratorContext::new(&spec, &config, &templates);
//!
//! for file in ControllerGenerator::new(ctx).generate(&OverwritePolicy::Never)? {
//!     println!("{} {}", file.status, file.path.display());
//! }
//! # Ok(())
//! # }
//! ```

mod artifact;
mod controller;
mod helpers;
mod module;
pub mod patch;
mod repository;
mod requests;
mod resource;
mod routes;
mod service;
pub mod stubs;
mod templates;
mod write;

use std::path::PathBuf;

pub use artifact::{ArtifactGenerator, ArtifactKind, UnknownArtifact};
pub use controller::ControllerGenerator;
pub use helpers::TemplateHelpers;
pub use module::ModuleGenerator;
pub use repository::RepositoryGenerator;
pub use requests::{related_table_from_source, RequestsGenerator, RuleSet, EMPTY_RULES_COMMENT};
pub use resource::ResourceGenerator;
pub use routes::RoutesGenerator;
pub use service::{heuristic_search_fields, ServiceGenerator, SEARCH_LOCALES};
pub use templates::TemplateStore;
pub use write::{write_file, write_patched, FileStatus, GeneratedFile, OverwritePolicy, OverwritePredicate};

use crate::config::AztecConfig;
use crate::error::Result;
use crate::model_spec::ModelSpec;

/// A layer generator
pub trait Generator {
    /// Render and write this layer's files
    ///
    /// # Errors
    ///
    /// Fails when a stub is missing or a file cannot be written.
    fn generate(&self, policy: &OverwritePolicy) -> Result<Vec<GeneratedFile>>;
}

/// Ordered placeholder → value mapping
///
/// Substitution happens in insertion order; inserting an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders(Vec<(String, String)>);

impl Placeholders {
    /// Empty mapping
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Set `key` to `value`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Merge `other` into `self`; its values win
    pub fn extend(&mut self, other: Self) {
        for (key, value) in other.0 {
            self.insert(key, value);
        }
    }

    /// Value for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate in substitution order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Replace every occurrence of each placeholder, in order
///
/// Literal and sequential: each key is replaced across the whole body in
/// insertion order, with no escaping and no partial-match protection.
/// Unknown tokens are left as they are.
///
/// ```
/// use aztec::generate::{substitute, Placeholders};
///
/// let placeholders = Placeholders::new().with("{{ model }}", "Post");
/// assert_eq!(substitute("class {{ model }} {{ other }}", &placeholders), "class Post {{ other }}");
/// ```
#[must_use]
pub fn substitute(body: &str, placeholders: &Placeholders) -> String {
    placeholders
        .iter()
        .fold(body.to_string(), |content, (key, value)| content.replace(key, value))
}

/// Everything a layer generator needs
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    /// The model being generated for
    pub spec: &'a ModelSpec,
    /// Active configuration
    pub config: &'a AztecConfig,
    /// Stub source
    pub templates: &'a TemplateStore,
}

impl<'a> GeneratorContext<'a> {
    /// Bundle the generation inputs
    #[must_use]
    pub const fn new(spec: &'a ModelSpec, config: &'a AztecConfig, templates: &'a TemplateStore) -> Self {
        Self {
            spec,
            config,
            templates,
        }
    }

    /// `Modules\Blog`
    #[must_use]
    pub fn module_namespace(&self) -> String {
        format!(
            "{}\\{}",
            self.config.namespace_root,
            TemplateHelpers::ucfirst(&self.spec.module)
        )
    }

    /// Placeholders shared by every layer stub
    #[must_use]
    pub fn common_placeholders(&self) -> Placeholders {
        let model = self.spec.class_name();
        let plural = TemplateHelpers::plural_studly(model);

        Placeholders::new()
            .with("{{ moduleNamespace }}", self.module_namespace())
            .with("{{ modelNamespace }}", self.spec.metadata.namespace())
            .with("{{ modelFqcn }}", self.spec.fqcn())
            .with("{{ model }}", model)
            .with("{{ modelVariable }}", TemplateHelpers::lcfirst(model))
            .with("{{ modelPlural }}", plural.clone())
            .with("{{ modelPluralLower }}", plural.to_lowercase())
            .with("{{ modelKebab }}", TemplateHelpers::to_kebab_case(model))
            .with("{{ modelPluralKebab }}", TemplateHelpers::to_kebab_case(&plural))
    }

    /// Source root of the module: `<module>/<source_dir>` when that
    /// directory exists, else the module directory itself
    #[must_use]
    pub fn module_root(&self) -> PathBuf {
        let app = self.spec.module_path.join(&self.config.source_dir);
        if app.is_dir() {
            app
        } else {
            self.spec.module_path.clone()
        }
    }

    /// Path under the module source root
    #[must_use]
    pub fn source_path(&self, relative: &str) -> PathBuf {
        self.module_root().join(relative)
    }

    /// Load `stub` and substitute the common placeholders plus `extra`
    ///
    /// # Errors
    ///
    /// [`crate::AztecError::TemplateMissing`] when the stub does not exist.
    pub fn render(&self, stub: &str, extra: Placeholders) -> Result<String> {
        let body = self.templates.load(stub)?;
        let mut placeholders = self.common_placeholders();
        placeholders.extend(extra);
        Ok(substitute(&body, &placeholders))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::inspect::ModelMetadata;
    use crate::model_spec::ModelSpec;
    use std::path::Path;

    /// `Blog` / `Post` spec rooted at `module_path`
    pub fn post_spec(module_path: &Path) -> ModelSpec {
        let metadata = ModelMetadata {
            fqcn: r"Modules\Blog\Models\Post".to_string(),
            class_name: "Post".to_string(),
            fillable: Some(vec![
                "title".to_string(),
                "body".to_string(),
                "author_id".to_string(),
            ]),
            casts: Some([("body".to_string(), "text".to_string())].into_iter().collect()),
            translatable: Some(Vec::new()),
            ..ModelMetadata::default()
        };
        ModelSpec::new(
            "Blog",
            module_path,
            module_path.join("app/Models/Post.php"),
            metadata,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::post_spec;
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_common_placeholders() {
        let dir = tempdir().unwrap();
        let spec = post_spec(dir.path());
        let config = AztecConfig::default();
        let templates = TemplateStore::embedded();
        let ctx = GeneratorContext::new(&spec, &config, &templates);

        let placeholders = ctx.common_placeholders();
        assert_eq!(placeholders.get("{{ moduleNamespace }}"), Some(r"Modules\Blog"));
        assert_eq!(placeholders.get("{{ modelNamespace }}"), Some(r"Modules\Blog\Models"));
        assert_eq!(placeholders.get("{{ modelVariable }}"), Some("post"));
        assert_eq!(placeholders.get("{{ modelPlural }}"), Some("Posts"));
        assert_eq!(placeholders.get("{{ modelPluralLower }}"), Some("posts"));
        assert_eq!(placeholders.get("{{ modelKebab }}"), Some("post"));
        assert_eq!(placeholders.get("{{ modelPluralKebab }}"), Some("posts"));
    }

    #[test]
    fn test_module_root_prefers_source_dir() {
        let dir = tempdir().unwrap();
        let spec = post_spec(dir.path());
        let config = AztecConfig::default();
        let templates = TemplateStore::embedded();
        let ctx = GeneratorContext::new(&spec, &config, &templates);

        assert_eq!(ctx.module_root(), dir.path());

        fs::create_dir(dir.path().join("app")).unwrap();
        assert_eq!(ctx.module_root(), dir.path().join("app"));
    }

    #[test]
    fn test_extend_overrides_in_place() {
        let mut placeholders = Placeholders::new().with("{{ a }}", "1").with("{{ b }}", "2");
        placeholders.extend(Placeholders::new().with("{{ a }}", "3").with("{{ c }}", "4"));

        let order: Vec<_> = placeholders.iter().collect();
        assert_eq!(order, vec![("{{ a }}", "3"), ("{{ b }}", "2"), ("{{ c }}", "4")]);
    }

    #[test]
    fn test_substitution_is_sequential() {
        let placeholders = Placeholders::new()
            .with("{{ b }}", "{{ a }}")
            .with("{{ a }}", "x");
        assert_eq!(substitute("{{ a }}{{ b }}", &placeholders), "xx");

        let reversed = Placeholders::new()
            .with("{{ a }}", "x")
            .with("{{ b }}", "{{ a }}");
        assert_eq!(substitute("{{ a }}{{ b }}", &reversed), "x{{ a }}");
    }
}
