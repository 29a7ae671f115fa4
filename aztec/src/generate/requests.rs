//! Store/update form request generation

use std::fs;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{write_file, GeneratedFile, Generator, GeneratorContext, OverwritePolicy, Placeholders, TemplateHelpers};
use crate::error::Result;
use crate::inspect::CastType;

/// Rendered in place of the rules when the model has no known fillable fields
pub const EMPTY_RULES_COMMENT: &str =
    "            // No fillable fields detected on the model. Define validation rules manually.";

/// How far past the relation method signature to look for its related class
const RELATION_BODY_WINDOW: usize = 500;

static BELONGS_TO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"belongsTo\(\s*([a-zA-Z0-9_\\]+)::class").expect("Invalid regex"));

/// `(key, rules)` pairs in output order
pub type RuleSet = Vec<(String, Vec<String>)>;

/// Which request is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Store,
    Update,
}

impl Variant {
    const fn presence(self) -> &'static str {
        match self {
            Self::Store => "required",
            Self::Update => "sometimes",
        }
    }
}

/// Generates `<Model>StoreRequest` and `<Model>UpdateRequest`
#[derive(Debug, Clone, Copy)]
pub struct RequestsGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> RequestsGenerator<'a> {
    /// Create a requests generator
    #[must_use]
    pub const fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    /// Rules for the store request
    #[must_use]
    pub fn store_rules(&self) -> RuleSet {
        self.rules(Variant::Store)
    }

    /// Rules for the update request
    #[must_use]
    pub fn update_rules(&self) -> RuleSet {
        self.rules(Variant::Update)
    }

    fn rules(&self, variant: Variant) -> RuleSet {
        let metadata = &self.ctx.spec.metadata;
        let mut rules = Vec::new();

        for field in metadata.fillable_fields() {
            if metadata.is_translatable(field) {
                rules.push((field.clone(), vec![variant.presence().to_string(), "array".to_string()]));
                for locale in &self.ctx.config.locales {
                    rules.push((
                        format!("{field}.{locale}"),
                        vec![variant.presence().to_string(), "string".to_string()],
                    ));
                }
            } else {
                rules.push((field.clone(), self.field_rules(field, variant)));
            }
        }

        rules
    }

    fn field_rules(&self, field: &str, variant: Variant) -> Vec<String> {
        let mut rules = vec![variant.presence().to_string()];

        if let Some(stem) = field.strip_suffix("_id") {
            rules.push("integer".to_string());
            if let Some(exists) = self.exists_rule(&TemplateHelpers::to_camel_case(stem)) {
                rules.push(exists);
            }
            return rules;
        }

        let cast = self
            .ctx
            .spec
            .metadata
            .cast_of(field)
            .unwrap_or_else(|| CastType::Other(String::new()));
        rules.extend(cast.validation_rules().iter().map(ToString::to_string));

        match field {
            "email" => rules.push("email".to_string()),
            "password" => {
                rules.push("confirmed".to_string());
                if variant == Variant::Store {
                    rules.push("min:8".to_string());
                }
            }
            _ => {}
        }

        rules
    }

    /// `exists:<table>,<key>` for the relation behind a foreign key field
    ///
    /// Prefers the table and key reported by runtime introspection, then
    /// falls back to scanning the model source.
    fn exists_rule(&self, relation: &str) -> Option<String> {
        if let Some(target) = self.ctx.spec.metadata.relation_targets.get(relation) {
            return Some(format!("exists:{},{}", target.table, target.key));
        }

        let source = fs::read_to_string(&self.ctx.spec.file_path).ok()?;
        let table = related_table_from_source(&source, relation);
        debug!(relation, ?table, "foreign key target from source scan");
        table.map(|table| format!("exists:{table},id"))
    }

    fn render(&self, stub: &str, variant: Variant) -> Result<String> {
        self.ctx.render(
            stub,
            Placeholders::new()
                .with(
                    "{{ requestsNamespace }}",
                    format!("{}\\Http\\Requests", self.ctx.module_namespace()),
                )
                .with("{{ model }}", self.ctx.spec.class_name())
                .with("{{ rules }}", format_rules(&self.rules(variant))),
        )
    }
}

/// Guess the table a `belongsTo` relation points at from raw source
///
/// Approximate by nature: finds `public function <relation>()` and looks in
/// the next 500 bytes for `belongsTo(Related::class`, returning the plural
/// snake-case table of `Related`. Runtime introspection reports the real
/// table when the model is loadable.
///
/// ```
/// use aztec::generate::related_table_from_source;
///
/// let source = r"
///     public function author()
///     {
///         return $this->belongsTo(\App\Models\User::class);
///     }
/// ";
/// assert_eq!(related_table_from_source(source, "author").as_deref(), Some("users"));
/// assert_eq!(related_table_from_source(source, "editor"), None);
/// ```
#[must_use]
pub fn related_table_from_source(source: &str, relation: &str) -> Option<String> {
    let signature = Regex::new(&format!(
        r"public\s+function\s+{}\s*\(\s*\)",
        regex::escape(relation)
    ))
    .ok()?;
    let start = signature.find(source)?.start();

    let mut end = (start + RELATION_BODY_WINDOW).min(source.len());
    while !source.is_char_boundary(end) {
        end -= 1;
    }

    let captures = BELONGS_TO.captures(&source[start..end])?;
    let related = TemplateHelpers::class_basename(captures.get(1)?.as_str());
    Some(TemplateHelpers::to_table_name(related))
}

fn format_rules(rules: &[(String, Vec<String>)]) -> String {
    if rules.is_empty() {
        return EMPTY_RULES_COMMENT.to_string();
    }
    rules
        .iter()
        .map(|(field, field_rules)| format!("            '{field}' => ['{}'],", field_rules.join("', '")))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Generator for RequestsGenerator<'_> {
    fn generate(&self, policy: &OverwritePolicy) -> Result<Vec<GeneratedFile>> {
        let model = self.ctx.spec.class_name();
        debug!(model, fields = self.ctx.spec.metadata.fillable_fields().len(), "rendering requests");

        let store = self.render("store-request.stub", Variant::Store)?;
        let update = self.render("update-request.stub", Variant::Update)?;

        Ok(vec![
            write_file(
                &self.ctx.source_path(&format!("Http/Requests/{model}StoreRequest.php")),
                &store,
                policy,
                "Store request",
            )?,
            write_file(
                &self.ctx.source_path(&format!("Http/Requests/{model}UpdateRequest.php")),
                &update,
                policy,
                "Update request",
            )?,
        ])
    }
}
