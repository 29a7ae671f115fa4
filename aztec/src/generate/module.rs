//! New module scaffold
//!
//! Creates the folder skeleton of a module and seeds it with a manifest,
//! composer file, config, providers, a landing controller, routes, views and
//! an asset build configuration. The main provider carries a `register()`
//! method that [`super::RepositoryGenerator`] later patches, and is itself
//! registered in the application's `bootstrap/providers.php` when that file
//! exists.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::patch::{register_module_provider, ProviderPatch};
use super::{
    write_file, write_patched, FileStatus, GeneratedFile, Generator, OverwritePolicy, TemplateHelpers, TemplateStore,
};
use crate::config::AztecConfig;
use crate::error::{AztecError, Result};

/// Folders created under `<source_dir>`
const SOURCE_FOLDERS: &[&str] = &[
    "Http/Controllers",
    "Http/Requests",
    "Models",
    "Providers",
    "Repositories/Interfaces",
    "Services",
];

/// Folders created under the module root
const MODULE_FOLDERS: &[&str] = &[
    "config",
    "database/factories",
    "database/migrations",
    "database/seeders",
    "resources/assets/js",
    "resources/assets/sass",
    "resources/views/components/layouts",
    "routes",
    "tests/Feature",
    "tests/Unit",
];

/// Empty asset entry points
const ASSETS: &[&str] = &["resources/assets/js/app.js", "resources/assets/sass/app.scss"];

/// Scaffolds `<modules_path>/<Name>`
#[derive(Debug)]
pub struct ModuleGenerator<'a> {
    name: String,
    config: &'a AztecConfig,
    templates: &'a TemplateStore,
}

impl<'a> ModuleGenerator<'a> {
    /// Create a module generator for `name`
    #[must_use]
    pub fn new(name: &str, config: &'a AztecConfig, templates: &'a TemplateStore) -> Self {
        Self {
            name: TemplateHelpers::to_studly_case(name),
            config,
            templates,
        }
    }

    /// Studly module name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root directory of the new module
    #[must_use]
    pub fn module_path(&self) -> PathBuf {
        self.config.modules_path.join(&self.name)
    }

    /// Stub name → destination relative to the module root
    fn files(&self) -> Vec<(&'static str, String)> {
        let name = &self.name;
        let src = &self.config.source_dir;
        vec![
            ("module/module.stub", "module.json".to_string()),
            ("module/composer.stub", "composer.json".to_string()),
            ("module/config.stub", "config/config.php".to_string()),
            ("module/provider.stub", format!("{src}/Providers/{name}ServiceProvider.php")),
            ("module/route-provider.stub", format!("{src}/Providers/RouteServiceProvider.php")),
            ("module/event-provider.stub", format!("{src}/Providers/EventServiceProvider.php")),
            ("module/seeder.stub", format!("database/seeders/{name}DatabaseSeeder.php")),
            ("module/controller.stub", format!("{src}/Http/Controllers/{name}Controller.php")),
            ("module/routes-web.stub", "routes/web.php".to_string()),
            ("module/routes-api.stub", "routes/api.php".to_string()),
            ("module/vite.stub", "vite.config.js".to_string()),
            (
                "module/view-master.stub",
                "resources/views/components/layouts/master.blade.php".to_string(),
            ),
            ("module/view-index.stub", "resources/views/index.blade.php".to_string()),
        ]
    }

    fn substitute(&self, body: &str) -> String {
        let namespace = &self.config.namespace_root;
        [
            ("$STUDLY_NAME$", self.name.clone()),
            ("$LOWER_NAME$", self.name.to_lowercase()),
            ("$MODULE_NAMESPACE$", namespace.clone()),
            ("$VENDOR$", namespace.to_lowercase()),
            ("$SOURCE_DIR$", self.config.source_dir.clone()),
            ("$AUTHOR_NAME$", String::new()),
            ("$AUTHOR_EMAIL$", String::new()),
        ]
        .iter()
        .fold(body.to_string(), |content, (token, value)| content.replace(token, value))
    }

    /// Application provider list, next to the modules root
    #[must_use]
    pub fn providers_file(&self) -> PathBuf {
        self.config
            .modules_path
            .parent()
            .map_or_else(PathBuf::new, PathBuf::from)
            .join("bootstrap/providers.php")
    }

    /// Add the module's main provider to the application provider list
    ///
    /// Returns `None` when the application has no provider list.
    ///
    /// # Errors
    ///
    /// [`AztecError::Read`] or [`AztecError::Write`] when the list cannot be
    /// read or rewritten.
    pub fn register_provider(&self) -> Result<Option<GeneratedFile>> {
        let path = self.providers_file();
        if !path.is_file() {
            debug!(path = %path.display(), "no application provider list");
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|source| AztecError::Read {
            path: path.clone(),
            source,
        })?;
        let provider = format!(
            "{}\\{name}\\Providers\\{name}ServiceProvider",
            self.config.namespace_root,
            name = self.name
        );
        let description = "Provider registration";

        let file = match register_module_provider(&content, &provider) {
            ProviderPatch::Patched(patched) => write_patched(&path, &patched, description)?,
            ProviderPatch::Unchanged => GeneratedFile::untouched(path, FileStatus::Unchanged, description),
            ProviderPatch::Skipped(reason) => {
                warn!(path = %path.display(), %reason, "provider not registered");
                GeneratedFile::untouched(path, FileStatus::Skipped, format!("{description} ({reason})"))
            }
        };
        Ok(Some(file))
    }

    fn create_folders(&self) -> Result<()> {
        let root = self.module_path();
        let source = root.join(&self.config.source_dir);
        let folders = SOURCE_FOLDERS
            .iter()
            .map(|folder| source.join(folder))
            .chain(MODULE_FOLDERS.iter().map(|folder| root.join(folder)));

        for folder in folders {
            fs::create_dir_all(&folder).map_err(|source| AztecError::Write { path: folder, source })?;
        }
        Ok(())
    }
}

impl Generator for ModuleGenerator<'_> {
    fn generate(&self, policy: &OverwritePolicy) -> Result<Vec<GeneratedFile>> {
        let root = self.module_path();
        info!(module = %self.name, path = %root.display(), "scaffolding module");
        self.create_folders()?;

        let mut generated = Vec::new();
        for (stub, destination) in self.files() {
            let content = self.substitute(&self.templates.load(stub)?);
            generated.push(write_file(&root.join(&destination), &content, policy, destination)?);
        }
        for asset in ASSETS {
            generated.push(write_file(&root.join(asset), "", policy, *asset)?);
        }
        generated.extend(self.register_provider()?);

        Ok(generated)
    }
}
