//! API resource generation

use super::{write_file, GeneratedFile, Generator, GeneratorContext, OverwritePolicy, Placeholders};
use crate::error::Result;

const PASS_THROUGH: &str = r"    public function toArray($request): array
    {
        return parent::toArray($request);
    }";

/// Generates `Http/Resources/<Model>Resource.php`
#[derive(Debug, Clone, Copy)]
pub struct ResourceGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> ResourceGenerator<'a> {
    /// Create a resource generator
    #[must_use]
    pub const fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    /// The `toArray` method body
    ///
    /// Relations are included only when loaded; translatable fields are
    /// rendered in the current locale. With neither, the parent
    /// representation is returned unchanged.
    #[must_use]
    pub fn to_array_method(&self) -> String {
        let relations = self
            .ctx
            .spec
            .exposed_relations()
            .iter()
            .map(|relation| format!("            '{relation}' => $this->whenLoaded('{relation}'),"));
        let translations = self
            .ctx
            .spec
            .metadata
            .translatable_fields()
            .iter()
            .map(|field| {
                format!("            '{field}' => $this->getTranslation('{field}', app()->getLocale()),")
            });
        let extras: Vec<String> = relations.chain(translations).collect();

        if extras.is_empty() {
            return PASS_THROUGH.to_string();
        }

        format!(
            "    public function toArray($request): array\n    {{\n        return array_merge(parent::toArray($request), [\n{}\n        ]);\n    }}",
            extras.join("\n")
        )
    }
}

impl Generator for ResourceGenerator<'_> {
    fn generate(&self, policy: &OverwritePolicy) -> Result<Vec<GeneratedFile>> {
        let model = self.ctx.spec.class_name();
        let content = self.ctx.render(
            "resource.stub",
            Placeholders::new()
                .with(
                    "{{ resourcesNamespace }}",
                    format!("{}\\Http\\Resources", self.ctx.module_namespace()),
                )
                .with("{{ resourceClass }}", format!("{model}Resource"))
                .with("{{ toArrayMethod }}", self.to_array_method()),
        )?;

        let path = self.ctx.source_path(&format!("Http/Resources/{model}Resource.php"));
        Ok(vec![write_file(&path, &content, policy, "Resource")?])
    }
}
