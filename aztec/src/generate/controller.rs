//! HTTP controller generation

use tracing::debug;

use super::{write_file, GeneratedFile, Generator, GeneratorContext, OverwritePolicy, Placeholders};
use crate::error::Result;
use crate::model_spec::{Filter, FilterType};

/// Generates `Http/Controllers/<Model>Controller.php`
#[derive(Debug, Clone, Copy)]
pub struct ControllerGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> ControllerGenerator<'a> {
    /// Create a controller generator
    #[must_use]
    pub const fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    /// Named arguments passed from the `index` action to the service's
    /// `list` method
    ///
    /// Search and page size are always present. Int and bool filters are
    /// parsed and null-guarded; string and array filters pass the raw query
    /// value through.
    #[must_use]
    pub fn list_method_args(&self) -> String {
        let mut args = vec![
            "search: $request->query('q')".to_string(),
            "perPage: $request->query('per_page', 15)".to_string(),
        ];
        args.extend(self.ctx.spec.filters.iter().map(filter_argument));
        args.join(",\n            ")
    }

    /// `->with([...])` for the list query and `->loadMissing([...])` for a
    /// single model, both empty without default eager loads
    #[must_use]
    pub fn eager_load_clauses(&self) -> (String, String) {
        let with = self.ctx.spec.metadata.eager_loads();
        if with.is_empty() {
            return (String::new(), String::new());
        }
        let list = format!("['{}']", with.join("', '"));
        (format!("->with({list})"), format!("->loadMissing({list})"))
    }
}

fn filter_argument(filter: &Filter) -> String {
    let field = &filter.field;
    let raw = format!("$request->query('{field}')");
    match filter.kind {
        FilterType::Int => format!("{field}: $request->has('{field}') ? intval({raw}) : null"),
        FilterType::Bool => format!(
            "{field}: $request->has('{field}') ? filter_var({raw}, FILTER_VALIDATE_BOOLEAN) : null"
        ),
        FilterType::String | FilterType::Array => format!("{field}: {raw}"),
    }
}

impl Generator for ControllerGenerator<'_> {
    fn generate(&self, policy: &OverwritePolicy) -> Result<Vec<GeneratedFile>> {
        let model = self.ctx.spec.class_name();
        let module_namespace = self.ctx.module_namespace();
        let (eager_index, eager_show) = self.eager_load_clauses();
        debug!(model, filters = self.ctx.spec.filters.len(), "rendering controller");

        let content = self.ctx.render(
            "controller.stub",
            Placeholders::new()
                .with("{{ controllerNamespace }}", format!("{module_namespace}\\Http\\Controllers"))
                .with("{{ controllerClass }}", format!("{model}Controller"))
                .with("{{ requestsNamespace }}", format!("{module_namespace}\\Http\\Requests"))
                .with("{{ resourcesNamespace }}", format!("{module_namespace}\\Http\\Resources"))
                .with("{{ serviceNamespace }}", format!("{module_namespace}\\Services"))
                .with("{{ serviceClass }}", format!("{model}Service"))
                .with("{{ listMethodArgs }}", self.list_method_args())
                .with("{{ storeRequest }}", format!("{model}StoreRequest"))
                .with("{{ updateRequest }}", format!("{model}UpdateRequest"))
                .with("{{ resourceClass }}", format!("{model}Resource"))
                .with("{{ eagerLoadIndex }}", eager_index)
                .with("{{ eagerLoadShow }}", eager_show),
        )?;

        let path = self
            .ctx
            .source_path(&format!("Http/Controllers/{model}Controller.php"));
        Ok(vec![write_file(&path, &content, policy, "Controller")?])
    }
}
