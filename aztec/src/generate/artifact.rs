//! Single-file generation
//!
//! Writes one bare class (model, controller, request or resource) into an
//! existing module. The class name may carry a sub-path (`Admin/Post` or
//! `Admin\Post`), which becomes both sub-directories and a sub-namespace.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use super::{substitute, write_file, GeneratedFile, Generator, OverwritePolicy, Placeholders, TemplateStore};
use crate::config::AztecConfig;
use crate::error::{AztecError, Result};

/// Kind of class written by [`ArtifactGenerator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Eloquent model under `Models`
    Model,
    /// Controller under `Http/Controllers`
    Controller,
    /// Form request under `Http/Requests`
    Request,
    /// API resource under `Http/Resources`
    Resource,
}

impl ArtifactKind {
    /// Every kind
    pub const ALL: [Self; 4] = [Self::Model, Self::Controller, Self::Request, Self::Resource];

    /// Command-line name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Controller => "controller",
            Self::Request => "request",
            Self::Resource => "resource",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Model => "Model",
            Self::Controller => "Controller",
            Self::Request => "Request",
            Self::Resource => "Resource",
        }
    }

    /// Stub rendered for this kind
    #[must_use]
    pub const fn stub(self) -> &'static str {
        match self {
            Self::Model => "files/model.stub",
            Self::Controller => "files/controller.stub",
            Self::Request => "files/request.stub",
            Self::Resource => "files/resource.stub",
        }
    }

    /// Directory under the module source root, `/`-separated
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Model => "Models",
            Self::Controller => "Http/Controllers",
            Self::Request => "Http/Requests",
            Self::Resource => "Http/Resources",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An artifact kind that is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown kind '{0}' (expected one of: model, controller, request, resource)")]
pub struct UnknownArtifact(pub String);

impl FromStr for ArtifactKind {
    type Err = UnknownArtifact;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| UnknownArtifact(s.to_string()))
    }
}

/// Writes `<source root>/<kind directory>/<name>.php`
#[derive(Debug)]
pub struct ArtifactGenerator<'a> {
    kind: ArtifactKind,
    module: String,
    module_path: PathBuf,
    segments: Vec<String>,
    config: &'a AztecConfig,
    templates: &'a TemplateStore,
}

impl<'a> ArtifactGenerator<'a> {
    /// Create a generator for `name` inside the module at `module_path`
    ///
    /// The module name is taken from the directory name.
    ///
    /// # Errors
    ///
    /// [`AztecError::InvalidName`] when `name` is empty or has an empty,
    /// `.` or `..` segment.
    pub fn new(
        kind: ArtifactKind,
        module_path: impl Into<PathBuf>,
        name: &str,
        config: &'a AztecConfig,
        templates: &'a TemplateStore,
    ) -> Result<Self> {
        let module_path = module_path.into();
        let module = module_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            kind,
            module,
            module_path,
            segments: split_name(name)?,
            config,
            templates,
        })
    }

    /// Kind being generated
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Short class name, the last segment of the name
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// `Modules\Blog\Http\Controllers\Admin`
    #[must_use]
    pub fn namespace(&self) -> String {
        let mut parts = vec![self.config.namespace_root.clone(), self.module.clone()];
        parts.extend(self.kind.directory().split('/').map(str::to_string));
        if let Some((_, parents)) = self.segments.split_last() {
            parts.extend(parents.iter().cloned());
        }
        parts.join("\\")
    }

    /// Source root of the module: `<module>/<source_dir>` when that
    /// directory exists, else the module directory itself
    fn module_root(&self) -> PathBuf {
        let app = self.module_path.join(&self.config.source_dir);
        if app.is_dir() {
            app
        } else {
            self.module_path.clone()
        }
    }

    /// File the class is written to
    #[must_use]
    pub fn destination(&self) -> PathBuf {
        let mut path = self.module_root().join(self.kind.directory());
        if let Some((class, parents)) = self.segments.split_last() {
            path.extend(parents);
            path.push(format!("{class}.php"));
        }
        path
    }

    /// Values for `$NAMESPACE$`, `$CLASS$`, `$MODULE$` and `$MODULE_LOWER$`
    #[must_use]
    pub fn placeholders(&self) -> Placeholders {
        Placeholders::new()
            .with("$NAMESPACE$", self.namespace())
            .with("$CLASS$", self.class_name())
            .with("$MODULE$", self.module.clone())
            .with("$MODULE_LOWER$", self.module.to_lowercase())
    }

    /// Render and write the class
    ///
    /// # Errors
    ///
    /// [`AztecError::TemplateMissing`] when the stub does not exist,
    /// [`AztecError::Write`] when the file cannot be written.
    pub fn write(&self, policy: &OverwritePolicy) -> Result<GeneratedFile> {
        let body = self.templates.load(self.kind.stub())?;
        let path = self.destination();
        debug!(kind = %self.kind, path = %path.display(), "rendering single file");
        write_file(&path, &substitute(&body, &self.placeholders()), policy, self.kind.label())
    }

    /// Module directory the class is written into
    #[must_use]
    pub fn module_path(&self) -> &Path {
        &self.module_path
    }
}

impl Generator for ArtifactGenerator<'_> {
    fn generate(&self, policy: &OverwritePolicy) -> Result<Vec<GeneratedFile>> {
        Ok(vec![self.write(policy)?])
    }
}

fn split_name(name: &str) -> Result<Vec<String>> {
    let invalid = |reason: &'static str| AztecError::InvalidName {
        name: name.to_string(),
        reason,
    };

    let trimmed = name.trim().trim_matches(['/', '\\']);
    if trimmed.is_empty() {
        return Err(invalid("name is empty"));
    }

    trimmed
        .split(['/', '\\'])
        .map(|segment| match segment {
            "" => Err(invalid("empty path segment")),
            "." | ".." => Err(invalid("relative path segment")),
            _ => Ok(segment.to_string()),
        })
        .collect()
}
