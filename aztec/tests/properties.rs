//! Property tests for rule derivation, substitution and file patching

use aztec::config::AztecConfig;
use aztec::generate::patch::{append_route_block, patch_provider_binding, ProviderPatch, RouteMeta, RoutePatch};
use aztec::generate::{heuristic_search_fields, substitute, GeneratorContext, Placeholders, RequestsGenerator, TemplateStore};
use aztec::inspect::ModelMetadata;
use aztec::ModelSpec;
use proptest::prelude::*;

const PROVIDER: &str = r"<?php

namespace Modules\Blog\Providers;

use Illuminate\Support\ServiceProvider;

class BlogServiceProvider extends ServiceProvider
{
    public function register(): void
    {
        $this->app->register(RouteServiceProvider::class);
    }
}
";

fn arb_fields() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,6}(_[a-z]{1,6})?", 0..6).prop_map(|set| set.into_iter().collect())
}

fn arb_class() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}"
}

fn spec_with(fillable: Vec<String>) -> ModelSpec {
    let metadata = ModelMetadata {
        fqcn: r"Modules\Blog\Models\Post".to_string(),
        class_name: "Post".to_string(),
        fillable: Some(fillable),
        ..ModelMetadata::default()
    };
    ModelSpec::new("Blog", "/nonexistent/Blog", "/nonexistent/Blog/app/Models/Post.php", metadata)
}

proptest! {
    #[test]
    fn password_minimum_length_only_on_store(fields in arb_fields(), at in 0usize..6) {
        let mut fillable = fields;
        let index = at.min(fillable.len());
        fillable.insert(index, "password".to_string());

        let spec = spec_with(fillable.clone());
        let config = AztecConfig::default();
        let templates = TemplateStore::embedded();
        let generator = RequestsGenerator::new(GeneratorContext::new(&spec, &config, &templates));

        let store = generator.store_rules();
        let update = generator.update_rules();
        prop_assert_eq!(store.len(), fillable.len());
        prop_assert_eq!(update.len(), fillable.len());

        for ((field, store_rules), (_, update_rules)) in store.iter().zip(&update) {
            prop_assert_eq!(store_rules[0].as_str(), "required");
            prop_assert_eq!(update_rules[0].as_str(), "sometimes");
            if field == "password" {
                prop_assert!(store_rules.iter().any(|r| r == "min:8"));
                prop_assert!(!update_rules.iter().any(|r| r == "min:8"));
                prop_assert!(update_rules.iter().any(|r| r == "confirmed"));
            } else {
                prop_assert_eq!(&store_rules[1..], &update_rules[1..]);
            }
        }
    }

    #[test]
    fn unknown_tokens_survive_substitution(token in "[a-z]{1,10}", value in "[A-Za-z0-9 ]{0,12}") {
        let body = format!("{{{{ {token}X }}}} / {{{{ modelName }}}}");
        let placeholders = Placeholders::new().with("{{ modelName }}", value.clone());

        let rendered = substitute(&body, &placeholders);
        prop_assert_eq!(rendered, format!("{{{{ {token}X }}}} / {value}"));
    }

    #[test]
    fn provider_binding_is_idempotent(model in arb_class()) {
        let interface = format!(r"Modules\Blog\Repositories\Interfaces\{model}RepositoryInterface");
        let implementation = format!(r"Modules\Blog\Repositories\Eloquent{model}Repository");

        let ProviderPatch::Patched(once) = patch_provider_binding(PROVIDER, &interface, &implementation) else {
            return Err(TestCaseError::fail("first patch did not apply"));
        };
        prop_assert_eq!(once.matches("$this->app->bind(").count(), 1);
        prop_assert_eq!(
            patch_provider_binding(&once, &interface, &implementation),
            ProviderPatch::Unchanged
        );
    }

    #[test]
    fn route_block_is_appended_once(module in "[a-z]{1,8}", model in arb_class()) {
        let controller = format!(r"Modules\Shop\Http\Controllers\{model}Controller");
        let meta = RouteMeta::new(&module, &model);
        let header = "<?php\n\nuse Illuminate\\Support\\Facades\\Route;\n";

        let RoutePatch::Updated(once) = append_route_block(header, &controller, &meta) else {
            return Err(TestCaseError::fail("route block not appended"));
        };
        let prefix = format!("Route::prefix('{module}')");
        prop_assert_eq!(once.matches(prefix.as_str()).count(), 1);
        prop_assert_eq!(append_route_block(&once, &controller, &meta), RoutePatch::Unchanged);
    }

    #[test]
    fn search_fields_preserve_fillable_order(fields in arb_fields()) {
        let chosen = heuristic_search_fields(&fields);
        let positions: Vec<usize> = chosen
            .iter()
            .map(|field| fields.iter().position(|f| f == field).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
