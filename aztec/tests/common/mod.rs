//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use aztec::config::AztecConfig;
use aztec::inspect::ClassResolver;
use aztec::pipeline::CrudPipeline;
use tempfile::TempDir;

/// `Blog/Post` model with fillable fields, casts, translations and relations
pub const POST_MODEL: &str = r#"<?php

namespace Modules\Blog\Models;

use Illuminate\Database\Eloquent\Model;
use Illuminate\Database\Eloquent\Relations\BelongsTo;
use Spatie\Translatable\HasTranslations;

class Post extends Model
{
    use HasTranslations;

    protected $table = 'blog_posts';

    protected $fillable = ['title', 'body', 'author_id', 'password', 'published'];

    protected $casts = [
        'body' => 'text',
        'published' => 'boolean',
    ];

    public $translatable = ['title'];

    protected $with = ['author'];

    public function author(): BelongsTo
    {
        return $this->belongsTo(\Modules\Users\Models\User::class, 'author_id');
    }

    public function tags()
    {
        return $this->belongsToMany(Tag::class)->withTimestamps();
    }

    public function scopePublished($query)
    {
        return $query->where('published', true);
    }
}
"#;

/// Main provider as the module scaffold writes it
pub const BLOG_PROVIDER: &str = r"<?php

namespace Modules\Blog\Providers;

use Illuminate\Support\ServiceProvider;

class BlogServiceProvider extends ServiceProvider
{
    public function boot(): void
    {
    }

    public function register(): void
    {
        $this->app->register(RouteServiceProvider::class);
    }
}
";

/// A scratch project holding `Modules/Blog`
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// Project with the Blog module, its Post model and provider
    pub fn blog() -> Self {
        let project = Self::empty();
        project.write("Modules/Blog/app/Models/Post.php", POST_MODEL);
        project.write("Modules/Blog/app/Providers/BlogServiceProvider.php", BLOG_PROVIDER);
        project
    }

    /// Project with an empty `Modules` directory
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Modules")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn module(&self) -> PathBuf {
        self.root().join("Modules/Blog").canonicalize().unwrap()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative)).unwrap()
    }

    pub fn config(&self) -> AztecConfig {
        AztecConfig {
            modules_path: self.root().join("Modules"),
            ..AztecConfig::default()
        }
    }

    /// Pipeline that never spawns PHP
    pub fn pipeline(&self) -> CrudPipeline {
        CrudPipeline::new(self.config()).with_resolver(ClassResolver::static_only())
    }
}
