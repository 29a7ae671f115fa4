//! Integration tests for full CRUD generation runs

mod common;

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use aztec::generate::{FileStatus, Generator, ModuleGenerator, OverwritePolicy, TemplateStore};
use aztec::model_spec::{Filter, FilterType};
use aztec::pipeline::{Augmenter, CrudPipeline, Layer, NoAugmentation};
use aztec::{AztecError, ModelSpec};
use common::Project;

const GENERATED: &[&str] = &[
    "Modules/Blog/app/Http/Controllers/PostController.php",
    "Modules/Blog/app/Http/Requests/PostStoreRequest.php",
    "Modules/Blog/app/Http/Requests/PostUpdateRequest.php",
    "Modules/Blog/app/Http/Resources/PostResource.php",
    "Modules/Blog/app/Repositories/Interfaces/PostRepositoryInterface.php",
    "Modules/Blog/app/Repositories/EloquentPostRepository.php",
    "Modules/Blog/app/Services/PostService.php",
    "Modules/Blog/routes/web.php",
];

const PROVIDER: &str = "Modules/Blog/app/Providers/BlogServiceProvider.php";

/// Picks fixed answers, as a user at the prompts would
struct Scripted;

impl Augmenter for Scripted {
    fn resource_relations(&self, _relations: &[String], _defaults: &[String]) -> io::Result<Vec<String>> {
        Ok(vec!["author".to_string()])
    }

    fn filters(&self, _spec: &ModelSpec) -> io::Result<Vec<Filter>> {
        Ok(vec![Filter::new("published", FilterType::Bool)])
    }

    fn sync_relations(&self, _relations: &[String]) -> io::Result<Vec<String>> {
        Ok(vec!["tags".to_string()])
    }
}

fn generate_all(project: &Project, policy: &OverwritePolicy) -> aztec::pipeline::RunReport {
    let pipeline = project.pipeline();
    let spec = pipeline.inspect("blog", "Post").unwrap();
    pipeline.run(&spec, &Layer::ALL, policy)
}

#[test]
fn test_full_run_writes_every_layer() {
    let project = Project::blog();
    let report = generate_all(&project, &OverwritePolicy::Never);

    assert_eq!(report.outcomes().len(), 6);
    assert_eq!(report.failures().count(), 0);
    for relative in GENERATED {
        assert!(project.root().join(relative).is_file(), "{relative} missing");
    }

    let store = project.read("Modules/Blog/app/Http/Requests/PostStoreRequest.php");
    assert!(store.contains("'author_id' => ['required', 'integer', 'exists:users,id'],"));
    assert!(store.contains("'title' => ['required', 'array'],"));
    assert!(store.contains("'title.en' => ['required', 'string'],"));
    assert!(store.contains("'published' => ['required', 'boolean'],"));
    assert!(store.contains("'confirmed', 'min:8'],"));

    let update = project.read("Modules/Blog/app/Http/Requests/PostUpdateRequest.php");
    assert!(update.contains("'password' => ['sometimes', 'string', 'max:255', 'confirmed'],"));

    let provider = project.read(PROVIDER);
    assert!(provider.contains(r"use Modules\Blog\Repositories\Interfaces\PostRepositoryInterface;"));
    assert!(provider.contains(r"use Modules\Blog\Repositories\EloquentPostRepository;"));
    assert!(provider.contains("PostRepositoryInterface::class,\n            EloquentPostRepository::class"));

    let routes = project.read("Modules/Blog/routes/web.php");
    assert!(routes.contains("Route::prefix('blog')->group(function () {"));
}

#[test]
fn test_second_run_does_not_duplicate_patches() {
    let project = Project::blog();
    generate_all(&project, &OverwritePolicy::Never);
    let provider = project.read(PROVIDER);
    let routes = project.read("Modules/Blog/routes/web.php");

    let report = generate_all(&project, &OverwritePolicy::Never);

    assert_eq!(project.read(PROVIDER), provider);
    assert_eq!(project.read("Modules/Blog/routes/web.php"), routes);
    assert_eq!(provider.matches("$this->app->bind(").count(), 1);
    assert_eq!(routes.matches("Route::controller(PostController::class)").count(), 1);

    for file in report.files() {
        let expected = if file.path.ends_with("BlogServiceProvider.php") || file.path.ends_with("web.php") {
            FileStatus::Unchanged
        } else {
            FileStatus::Skipped
        };
        assert_eq!(file.status, expected, "{}", file.path.display());
    }
}

#[test]
fn test_never_policy_keeps_customised_files() {
    let project = Project::blog();
    generate_all(&project, &OverwritePolicy::Never);
    project.write("Modules/Blog/app/Services/PostService.php", "<?php // hand written");

    generate_all(&project, &OverwritePolicy::Never);
    assert_eq!(
        project.read("Modules/Blog/app/Services/PostService.php"),
        "<?php // hand written"
    );

    generate_all(&project, &OverwritePolicy::Always);
    assert!(project
        .read("Modules/Blog/app/Services/PostService.php")
        .contains("class PostService"));
}

#[test]
fn test_ask_policy_consults_predicate_per_existing_file() {
    let project = Project::blog();
    generate_all(&project, &OverwritePolicy::Never);

    let asked: Rc<RefCell<Vec<PathBuf>>> = Rc::default();
    let seen = Rc::clone(&asked);
    let policy = OverwritePolicy::ask(move |path| {
        seen.borrow_mut().push(path.to_path_buf());
        path.ends_with("PostController.php")
    });

    let report = generate_all(&project, &policy);

    // Patched files are never offered to the predicate
    assert_eq!(asked.borrow().len(), 7);
    for file in report.files() {
        if file.path.ends_with("PostController.php") {
            assert_eq!(file.status, FileStatus::Overwritten);
        } else if file.path.ends_with("PostResource.php") {
            assert_eq!(file.status, FileStatus::Skipped);
        }
    }
}

#[test]
fn test_augmented_choices_reach_generated_code() {
    let project = Project::blog();
    let pipeline = project.pipeline();
    let spec = pipeline.inspect("Blog", "Post").unwrap();
    let spec = pipeline.augment(spec, &Layer::ALL, &Scripted).unwrap();

    let report = pipeline.run(&spec, &[Layer::Resource, Layer::Service], &OverwritePolicy::Never);
    assert_eq!(report.failures().count(), 0);

    let resource = project.read("Modules/Blog/app/Http/Resources/PostResource.php");
    assert!(resource.contains("'author' => $this->whenLoaded('author'),"));
    assert!(!resource.contains("whenLoaded('tags')"));

    let service = project.read("Modules/Blog/app/Services/PostService.php");
    assert!(service.contains("?bool $published = null"));
    assert!(service.contains("$model->tags()->sync($data['tags']);"));
}

#[test]
fn test_no_augmentation_exposes_eager_loads() {
    let project = Project::blog();
    let pipeline = project.pipeline();
    let spec = pipeline.inspect("Blog", "Post").unwrap();
    let spec = pipeline.augment(spec, &Layer::ALL, &NoAugmentation).unwrap();

    assert!(spec.resource_relations.is_empty());
    assert_eq!(spec.exposed_relations(), ["author"]);
}

#[test]
fn test_missing_templates_fail_only_their_layers() {
    let project = Project::blog();
    let empty = tempfile::tempdir().unwrap();
    let pipeline = project
        .pipeline()
        .with_templates(TemplateStore::directory_only(empty.path()));
    let spec = pipeline.inspect("Blog", "Post").unwrap();

    let report = pipeline.run(&spec, &Layer::ALL, &OverwritePolicy::Never);

    let failed: Vec<Layer> = report.failures().map(|(layer, _)| layer).collect();
    assert_eq!(failed.len(), 5);
    assert!(!failed.contains(&Layer::Routes));
    assert!(report
        .failures()
        .all(|(_, err)| matches!(err, AztecError::TemplateMissing { .. })));
    assert!(project.root().join("Modules/Blog/routes/web.php").is_file());
}

#[test]
fn test_scaffolded_module_accepts_crud() {
    let project = Project::empty();
    let config = project.config();
    let templates = TemplateStore::embedded();
    ModuleGenerator::new("shop", &config, &templates)
        .generate(&OverwritePolicy::Never)
        .unwrap();

    project.write(
        "Modules/Shop/app/Models/Product.php",
        "<?php\n\nnamespace Modules\\Shop\\Models;\n\nclass Product extends Model\n{\n    protected $fillable = ['name', 'price'];\n}\n",
    );

    let pipeline = CrudPipeline::new(config).with_resolver(aztec::inspect::ClassResolver::static_only());
    let spec = pipeline.inspect("Shop", "Product").unwrap();
    let report = pipeline.run(&spec, &Layer::ALL, &OverwritePolicy::Never);
    assert_eq!(report.failures().count(), 0);

    let provider = project.read("Modules/Shop/app/Providers/ShopServiceProvider.php");
    assert_eq!(provider.matches("ProductRepositoryInterface::class,").count(), 1);

    let routes = project.read("Modules/Shop/routes/web.php");
    assert!(routes.contains("Route::prefix('shop')->group(function () {"));
    assert!(routes.contains(r"use Modules\Shop\Http\Controllers\ProductController;"));
}
