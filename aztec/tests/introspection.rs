//! Integration tests for locating and introspecting models

mod common;

use std::collections::BTreeSet;

use aztec::inspect::Strategy;
use aztec::AztecError;
use common::Project;

#[test]
fn test_static_introspection_of_blog_post() {
    let project = Project::blog();
    let spec = project.pipeline().inspect("blog", "Post").unwrap();
    let metadata = &spec.metadata;

    assert_eq!(spec.module, "blog");
    assert_eq!(spec.module_path, project.module());
    assert_eq!(spec.file_path, project.module().join("app/Models/Post.php"));

    assert_eq!(metadata.fqcn, r"Modules\Blog\Models\Post");
    assert_eq!(metadata.class_name, "Post");
    assert_eq!(metadata.table.as_deref(), Some("blog_posts"));
    assert_eq!(
        metadata.fillable_fields(),
        ["title", "body", "author_id", "password", "published"]
    );
    assert_eq!(metadata.translatable_fields(), ["title"]);
    assert_eq!(metadata.eager_loads(), ["author"]);
    assert_eq!(
        metadata.casts.as_ref().unwrap().get("published").map(String::as_str),
        Some("boolean")
    );

    // Undeclared properties are unknown, not empty
    assert_eq!(metadata.guarded, None);
    assert_eq!(metadata.hidden, None);
    assert_eq!(metadata.connection, None);

    let expected: BTreeSet<String> = ["author", "tags"].into_iter().map(String::from).collect();
    assert_eq!(metadata.relations, expected);

    assert_eq!(metadata.strategy, Strategy::Static);
    assert!(metadata
        .notes
        .iter()
        .any(|note| note.starts_with("runtime introspection unavailable")));
}

#[test]
fn test_non_literal_defaults_become_notes() {
    let project = Project::blog();
    project.write(
        "Modules/Blog/app/Models/Tag.php",
        r"<?php

namespace Modules\Blog\Models;

class Tag extends Model
{
    protected $table = self::TABLE;

    protected $fillable = ['name', self::SLUG];

    protected $hidden = parent::HIDDEN;
}
",
    );

    let spec = project.pipeline().inspect("Blog", "Tag").unwrap();
    let metadata = &spec.metadata;

    assert_eq!(metadata.table, None);
    assert_eq!(metadata.fillable_fields(), ["name"]);
    assert_eq!(metadata.hidden, None);
    assert!(metadata.notes.iter().any(|n| n.contains("table property has a non-literal default")));
    assert!(metadata.notes.iter().any(|n| n.contains("hidden property has a non-literal default")));
    assert!(metadata.notes.iter().any(|n| n.contains("fillable property")));
}

#[test]
fn test_interpolated_strings_are_not_literals() {
    let project = Project::blog();
    project.write(
        "Modules/Blog/app/Models/Draft.php",
        r#"<?php

namespace Modules\Blog\Models;

class Draft extends Model
{
    protected $table = "posts_$suffix";

    protected $fillable = ["title", "{$prefix}_body", "price_\$usd"];
}
"#,
    );

    let spec = project.pipeline().inspect("Blog", "Draft").unwrap();
    let metadata = &spec.metadata;

    assert_eq!(metadata.table, None);
    assert_eq!(metadata.fillable_fields(), ["title", "price_$usd"]);
    assert!(metadata.notes.iter().any(|n| n.contains("table property has a non-literal default")));
    assert!(metadata
        .notes
        .iter()
        .any(|n| n == "fillable property: 1 non-literal element(s) dropped"));
}

#[test]
fn test_model_found_by_recursive_scan() {
    let project = Project::blog();
    project.write(
        "Modules/Blog/src/Domain/Article.php",
        "<?php\n\nnamespace Blog\\Domain;\n\nclass Article\n{\n}\n",
    );

    let spec = project.pipeline().inspect("Blog", "article").unwrap();
    assert_eq!(spec.metadata.fqcn, r"Blog\Domain\Article");
    assert!(spec.metadata.relations.is_empty());
}

#[test]
fn test_unknown_module_lists_candidates() {
    let project = Project::blog();
    let err = project.pipeline().inspect("shop", "Product").unwrap_err();

    match err {
        AztecError::ModuleNotFound { module, tried, .. } => {
            assert_eq!(module, "shop");
            assert_eq!(tried.len(), 2);
            assert!(tried[1].ends_with("Shop"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_model_lists_patterns() {
    let project = Project::blog();
    let err = project.pipeline().inspect("Blog", "Comment").unwrap_err();

    assert!(matches!(err, AztecError::ModelNotFound { ref model, .. } if model == "Comment"));
    assert!(err.to_string().contains("Comment"));
}

#[test]
fn test_parse_error_aborts_with_file_name() {
    let project = Project::blog();
    project.write(
        "Modules/Blog/app/Models/Broken.php",
        "<?php\n\nclass Broken\n{\n    public function x()\n    {\n",
    );

    let err = project.pipeline().inspect("Blog", "Broken").unwrap_err();
    assert!(matches!(err, AztecError::Parse { .. }));
    assert!(err.is_fatal_to_run());
    assert!(err.to_string().contains("Broken.php"));
}

#[test]
fn test_file_without_class() {
    let project = Project::blog();
    project.write("Modules/Blog/app/Models/Helpers.php", "<?php\n\nfunction helper() {}\n");

    let err = project.pipeline().inspect("Blog", "Helpers").unwrap_err();
    assert!(matches!(err, AztecError::NoClass { .. }));
}
