//! Service layer generation

use super::{write_file, GeneratedFile, Generator, GeneratorContext, OverwritePolicy, Placeholders};
use crate::error::Result;

/// Locales queried for translatable search fields
pub const SEARCH_LOCALES: [&str; 2] = ["en", "ar"];

/// Field names searched when the model has them
const CONVENTIONAL_SEARCH_FIELDS: &[&str] = &["name", "title", "description", "email", "body", "content", "slug"];

const NO_SEARCH_FIELDS: &str = "// No searchable fields detected automatically";

/// Continuation indent of the search closure body
const SEARCH_INDENT: &str = "\n                      ";

/// Continuation indent of the query chain and method bodies
const BODY_INDENT: &str = "\n            ";

/// Fields the generated `list` search should match against
///
/// Fillable fields with a conventional textual name (`name`, `title`,
/// `description`, `email`, `body`, `content`, `slug`) in fillable order. When
/// none match, the first three fillable fields are used as a rough guess,
/// whatever their type.
///
/// ```
/// use aztec::generate::heuristic_search_fields;
///
/// let fillable = ["slug", "views", "title"].map(String::from);
/// assert_eq!(heuristic_search_fields(&fillable), ["slug", "title"]);
///
/// let fillable = ["sku", "price", "stock", "weight"].map(String::from);
/// assert_eq!(heuristic_search_fields(&fillable), ["sku", "price", "stock"]);
/// ```
#[must_use]
pub fn heuristic_search_fields(fillable: &[String]) -> Vec<&str> {
    let conventional: Vec<&str> = fillable
        .iter()
        .map(String::as_str)
        .filter(|field| CONVENTIONAL_SEARCH_FIELDS.contains(field))
        .collect();

    if conventional.is_empty() {
        fillable.iter().take(3).map(String::as_str).collect()
    } else {
        conventional
    }
}

/// Generates `Services/<Model>Service.php`
#[derive(Debug, Clone, Copy)]
pub struct ServiceGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> ServiceGenerator<'a> {
    /// Create a service generator
    #[must_use]
    pub const fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    /// Extra nullable parameters of `list`, one per filter
    #[must_use]
    pub fn filter_params(&self) -> String {
        self.ctx
            .spec
            .filters
            .iter()
            .map(|filter| format!(", ?{} ${} = null", filter.kind.php_type(), filter.field))
            .collect()
    }

    /// Clauses inside the search closure
    ///
    /// Translatable fields match any of [`SEARCH_LOCALES`] in their JSON
    /// value; other fields use a plain `LIKE`.
    #[must_use]
    pub fn search_logic(&self) -> String {
        let metadata = &self.ctx.spec.metadata;
        let fields = heuristic_search_fields(metadata.fillable_fields());
        if fields.is_empty() {
            return NO_SEARCH_FIELDS.to_string();
        }

        let mut clauses = Vec::new();
        for (index, field) in fields.into_iter().enumerate() {
            let first = index == 0;
            if metadata.is_translatable(field) {
                let method = if first { "whereRaw" } else { "orWhereRaw" };
                let locale_clauses = SEARCH_LOCALES
                    .iter()
                    .enumerate()
                    .map(|(n, locale)| {
                        let call = if n == 0 { method } else { "orWhereRaw" };
                        let receiver = if n == 0 { "$q" } else { "" };
                        format!(
                            "{receiver}->{call}(\"LOWER(JSON_UNQUOTE(JSON_EXTRACT({field}, '$.{locale}'))) LIKE LOWER(?)\", [$like])"
                        )
                    })
                    .collect::<Vec<_>>();
                clauses.push(format!("{};", locale_clauses.join(SEARCH_INDENT)));
            } else {
                let method = if first { "where" } else { "orWhere" };
                clauses.push(format!("$q->{method}('{field}', 'LIKE', $like);"));
            }
        }

        clauses.join(SEARCH_INDENT)
    }

    /// One `->when(...)` per filter on the list query
    #[must_use]
    pub fn filter_logic(&self) -> String {
        self.ctx
            .spec
            .filters
            .iter()
            .map(|filter| {
                let field = &filter.field;
                [
                    format!("->when(${field}, function ($query, $value) {{"),
                    format!("    $query->where('{field}', $value);"),
                    "})".to_string(),
                ]
                .join(BODY_INDENT)
            })
            .collect::<Vec<_>>()
            .join(BODY_INDENT)
    }

    /// Guarded `sync()` calls for the relations kept in step on write
    #[must_use]
    pub fn sync_relations(&self) -> String {
        self.ctx
            .spec
            .sync_relations
            .iter()
            .map(|relation| {
                [
                    format!("if (isset($data['{relation}'])) {{"),
                    format!("    $model->{relation}()->sync($data['{relation}']);"),
                    "}".to_string(),
                ]
                .join(BODY_INDENT)
            })
            .collect::<Vec<_>>()
            .join(BODY_INDENT)
    }
}

impl Generator for ServiceGenerator<'_> {
    fn generate(&self, policy: &OverwritePolicy) -> Result<Vec<GeneratedFile>> {
        let model = self.ctx.spec.class_name();
        let module_namespace = self.ctx.module_namespace();
        let sync = self.sync_relations();

        let content = self.ctx.render(
            "service.stub",
            Placeholders::new()
                .with("{{ serviceNamespace }}", format!("{module_namespace}\\Services"))
                .with("{{ serviceClass }}", format!("{model}Service"))
                .with(
                    "{{ repositoryInterfaceNamespace }}",
                    format!("{module_namespace}\\Repositories\\Interfaces"),
                )
                .with("{{ repositoryInterface }}", format!("{model}RepositoryInterface"))
                .with("{{ modelName }}", model)
                .with("{{ filterParams }}", self.filter_params())
                .with("{{ searchLogic }}", self.search_logic())
                .with("{{ filterLogic }}", self.filter_logic())
                .with("{{ syncRelationsCreate }}", sync.clone())
                .with("{{ syncRelationsUpdate }}", sync),
        )?;

        let path = self.ctx.source_path(&format!("Services/{model}Service.php"));
        Ok(vec![write_file(&path, &content, policy, "Service")?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AztecConfig;
    use crate::generate::test_support::post_spec;
    use crate::generate::TemplateStore;
    use crate::model_spec::{FilterType, ModelSpec};
    use std::fs;
    use tempfile::tempdir;

    fn generator<'a>(spec: &'a ModelSpec, config: &'a AztecConfig, templates: &'a TemplateStore) -> ServiceGenerator<'a> {
        ServiceGenerator::new(GeneratorContext::new(spec, config, templates))
    }

    #[test]
    fn test_search_over_conventional_fields() {
        let dir = tempdir().unwrap();
        let spec = post_spec(dir.path());
        let (config, templates) = (AztecConfig::default(), TemplateStore::embedded());

        assert_eq!(
            generator(&spec, &config, &templates).search_logic(),
            "$q->where('title', 'LIKE', $like);\n                      $q->orWhere('body', 'LIKE', $like);"
        );
    }

    #[test]
    fn test_translatable_search_queries_both_locales() {
        let dir = tempdir().unwrap();
        let mut spec = post_spec(dir.path());
        spec.metadata.translatable = Some(vec!["title".to_string()]);
        let (config, templates) = (AztecConfig::default(), TemplateStore::embedded());

        let logic = generator(&spec, &config, &templates).search_logic();
        assert!(logic.starts_with(
            "$q->whereRaw(\"LOWER(JSON_UNQUOTE(JSON_EXTRACT(title, '$.en'))) LIKE LOWER(?)\", [$like])\n                      ->orWhereRaw(\"LOWER(JSON_UNQUOTE(JSON_EXTRACT(title, '$.ar'))) LIKE LOWER(?)\", [$like]);\n"
        ));
        assert!(logic.ends_with("$q->orWhere('body', 'LIKE', $like);"));
    }

    #[test]
    fn test_no_fillable_means_no_search() {
        let dir = tempdir().unwrap();
        let mut spec = post_spec(dir.path());
        spec.metadata.fillable = None;
        let (config, templates) = (AztecConfig::default(), TemplateStore::embedded());

        assert_eq!(generator(&spec, &config, &templates).search_logic(), NO_SEARCH_FIELDS);
    }

    #[test]
    fn test_filter_params_and_logic() {
        let dir = tempdir().unwrap();
        let spec = post_spec(dir.path())
            .with_filter("status", FilterType::String)
            .with_filter("category_id", FilterType::Int);
        let (config, templates) = (AztecConfig::default(), TemplateStore::embedded());
        let service = generator(&spec, &config, &templates);

        assert_eq!(service.filter_params(), ", ?string $status = null, ?int $category_id = null");
        assert_eq!(
            service.filter_logic(),
            "->when($status, function ($query, $value) {\n                $query->where('status', $value);\n            })\n            ->when($category_id, function ($query, $value) {\n                $query->where('category_id', $value);\n            })"
        );
    }

    #[test]
    fn test_sync_relations() {
        let dir = tempdir().unwrap();
        let spec = post_spec(dir.path()).with_sync_relations(vec!["tags".to_string()]);
        let (config, templates) = (AztecConfig::default(), TemplateStore::embedded());

        assert_eq!(
            generator(&spec, &config, &templates).sync_relations(),
            "if (isset($data['tags'])) {\n                $model->tags()->sync($data['tags']);\n            }"
        );
    }

    #[test]
    fn test_generated_service() {
        let dir = tempdir().unwrap();
        let spec = post_spec(dir.path()).with_filter("published", FilterType::Bool);
        let (config, templates) = (AztecConfig::default(), TemplateStore::embedded());

        let files = generator(&spec, &config, &templates)
            .generate(&OverwritePolicy::Never)
            .unwrap();

        assert!(files[0].path.ends_with("Services/PostService.php"));
        let content = fs::read_to_string(&files[0].path).unwrap();
        assert!(content.contains(r"use Modules\Blog\Repositories\Interfaces\PostRepositoryInterface;"));
        assert!(content.contains("int|string|null $perPage = 15, ?bool $published = null, ?Builder $query = null"));
        assert!(content.contains("public function findOrFail(int|string $id): Post"));
        assert!(!content.contains("{{"));
    }
}
