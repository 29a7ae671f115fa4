//! Repository generation and provider binding

use std::fs;

use tracing::{debug, warn};

use super::patch::{patch_provider_binding, ProviderPatch};
use super::{
    write_file, write_patched, FileStatus, GeneratedFile, Generator, GeneratorContext, OverwritePolicy,
    Placeholders, TemplateHelpers,
};
use crate::error::{AztecError, Result};

/// Generates the repository interface, its Eloquent implementation, and binds
/// the two in the module's service provider
#[derive(Debug, Clone, Copy)]
pub struct RepositoryGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> RepositoryGenerator<'a> {
    /// Create a repository generator
    #[must_use]
    pub const fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    fn repository_namespace(&self) -> String {
        format!("{}\\Repositories", self.ctx.module_namespace())
    }

    fn interface_class(&self) -> String {
        format!("{}RepositoryInterface", self.ctx.spec.class_name())
    }

    fn repository_class(&self) -> String {
        format!("Eloquent{}Repository", self.ctx.spec.class_name())
    }

    fn placeholders(&self) -> Placeholders {
        Placeholders::new()
            .with("{{ repositoryNamespace }}", self.repository_namespace())
            .with("{{ interfaceClass }}", self.interface_class())
            .with("{{ repositoryClass }}", self.repository_class())
    }

    /// Bind the interface to the implementation in
    /// `Providers/<Module>ServiceProvider.php`
    ///
    /// A missing or unconventional provider is reported as skipped, never as
    /// an error.
    fn bind(&self) -> Result<GeneratedFile> {
        let provider = format!("{}ServiceProvider", TemplateHelpers::ucfirst(&self.ctx.spec.module));
        let path = self.ctx.source_path(&format!("Providers/{provider}.php"));
        let description = format!("{provider} binding");

        if !path.is_file() {
            debug!(path = %path.display(), "no module provider; binding skipped");
            return Ok(GeneratedFile::untouched(
                path,
                FileStatus::Skipped,
                format!("{description} (provider not found)"),
            ));
        }

        let content = fs::read_to_string(&path).map_err(|source| AztecError::Read {
            path: path.clone(),
            source,
        })?;
        let interface = format!("{}\\Interfaces\\{}", self.repository_namespace(), self.interface_class());
        let implementation = format!("{}\\{}", self.repository_namespace(), self.repository_class());

        match patch_provider_binding(&content, &interface, &implementation) {
            ProviderPatch::Patched(patched) => write_patched(&path, &patched, description),
            ProviderPatch::Unchanged => Ok(GeneratedFile::untouched(path, FileStatus::Unchanged, description)),
            ProviderPatch::Skipped(reason) => {
                warn!(path = %path.display(), %reason, "provider binding skipped");
                Ok(GeneratedFile::untouched(
                    path,
                    FileStatus::Skipped,
                    format!("{description} ({reason})"),
                ))
            }
        }
    }
}

impl Generator for RepositoryGenerator<'_> {
    fn generate(&self, policy: &OverwritePolicy) -> Result<Vec<GeneratedFile>> {
        let model = self.ctx.spec.class_name();

        let interface = self.ctx.render("repository-interface.stub", self.placeholders())?;
        let repository = self.ctx.render("repository.stub", self.placeholders())?;

        Ok(vec![
            write_file(
                &self
                    .ctx
                    .source_path(&format!("Repositories/Interfaces/{model}RepositoryInterface.php")),
                &interface,
                policy,
                "Repository interface",
            )?,
            write_file(
                &self.ctx.source_path(&format!("Repositories/Eloquent{model}Repository.php")),
                &repository,
                policy,
                "Eloquent repository",
            )?,
            self.bind()?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AztecConfig;
    use crate::generate::stubs;
    use crate::generate::test_support::post_spec;
    use crate::generate::TemplateStore;
    use tempfile::tempdir;

    fn write_provider(root: &std::path::Path, content: &str) -> std::path::PathBuf {
        let path = root.join("app/Providers/BlogServiceProvider.php");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn scaffold_provider() -> String {
        stubs::MODULE_PROVIDER
            .replace("$MODULE_NAMESPACE$", "Modules")
            .replace("$STUDLY_NAME$", "Blog")
            .replace("$LOWER_NAME$", "blog")
    }

    #[test]
    fn test_generates_interface_and_implementation() {
        let dir = tempdir().unwrap();
        let spec = post_spec(dir.path());
        let config = AztecConfig::default();
        let templates = TemplateStore::embedded();

        let files = RepositoryGenerator::new(GeneratorContext::new(&spec, &config, &templates))
            .generate(&OverwritePolicy::Never)
            .unwrap();

        assert_eq!(files.len(), 3);
        assert!(files[0].path.ends_with("Repositories/Interfaces/PostRepositoryInterface.php"));
        assert!(files[1].path.ends_with("Repositories/EloquentPostRepository.php"));
        assert_eq!(files[2].status, FileStatus::Skipped);

        let interface = fs::read_to_string(&files[0].path).unwrap();
        assert!(interface.contains(r"namespace Modules\Blog\Repositories\Interfaces;"));
        assert!(interface.contains("public function update(Post $post, array $data): Post;"));

        let repository = fs::read_to_string(&files[1].path).unwrap();
        assert!(repository.contains("class EloquentPostRepository implements PostRepositoryInterface"));
    }

    #[test]
    fn test_binding_written_exactly_once() {
        let dir = tempdir().unwrap();
        let provider = write_provider(dir.path(), &scaffold_provider());
        let spec = post_spec(dir.path());
        let config = AztecConfig::default();
        let templates = TemplateStore::embedded();
        let generator = RepositoryGenerator::new(GeneratorContext::new(&spec, &config, &templates));

        let first = generator.generate(&OverwritePolicy::Never).unwrap();
        assert_eq!(first[2].status, FileStatus::Updated);
        assert_eq!(first[2].path, provider);

        let second = generator.generate(&OverwritePolicy::Always).unwrap();
        assert_eq!(second[2].status, FileStatus::Unchanged);

        let content = fs::read_to_string(&provider).unwrap();
        assert_eq!(content.matches("PostRepositoryInterface::class").count(), 1);
        assert_eq!(
            content.matches(r"use Modules\Blog\Repositories\EloquentPostRepository;").count(),
            1
        );
    }

    #[test]
    fn test_unconventional_provider_is_left_alone() {
        let dir = tempdir().unwrap();
        let original = "<?php\n\nclass BlogServiceProvider\n{\n}\n";
        let provider = write_provider(dir.path(), original);
        let spec = post_spec(dir.path());
        let config = AztecConfig::default();
        let templates = TemplateStore::embedded();

        let files = RepositoryGenerator::new(GeneratorContext::new(&spec, &config, &templates))
            .generate(&OverwritePolicy::Never)
            .unwrap();

        assert_eq!(files[2].status, FileStatus::Skipped);
        assert!(files[2].description.contains("no register() method found"));
        assert_eq!(fs::read_to_string(provider).unwrap(), original);
    }
}
