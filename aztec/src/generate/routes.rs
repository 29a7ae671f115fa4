//! Route registration

use std::fs;

use tracing::debug;

use super::patch::{append_route_block, RouteMeta, RoutePatch};
use super::{write_file, write_patched, FileStatus, GeneratedFile, Generator, GeneratorContext, OverwritePolicy};
use crate::error::{AztecError, Result};

/// Header of a freshly created route file
const ROUTE_FILE_HEADER: &str = "<?php\n\nuse Illuminate\\Support\\Facades\\Route;";

/// Appends a REST route group for the model's controller to
/// `<module>/routes/web.php`
#[derive(Debug, Clone, Copy)]
pub struct RoutesGenerator<'a> {
    ctx: GeneratorContext<'a>,
}

impl<'a> RoutesGenerator<'a> {
    /// Create a routes generator
    #[must_use]
    pub const fn new(ctx: GeneratorContext<'a>) -> Self {
        Self { ctx }
    }
}

impl Generator for RoutesGenerator<'_> {
    /// The route file is patched, never replaced, so the overwrite policy
    /// does not apply
    fn generate(&self, _policy: &OverwritePolicy) -> Result<Vec<GeneratedFile>> {
        let path = self.ctx.spec.module_path.join("routes/web.php");
        let existed = path.is_file();
        let content = if existed {
            fs::read_to_string(&path).map_err(|source| AztecError::Read {
                path: path.clone(),
                source,
            })?
        } else {
            ROUTE_FILE_HEADER.to_string()
        };

        let model = self.ctx.spec.class_name();
        let controller = format!("{}\\Http\\Controllers\\{model}Controller", self.ctx.module_namespace());
        let meta = RouteMeta::new(&self.ctx.spec.module, model);

        match append_route_block(&content, &controller, &meta) {
            RoutePatch::Updated(patched) if existed => Ok(vec![write_patched(&path, &patched, "Routes")?]),
            RoutePatch::Updated(patched) => Ok(vec![write_file(&path, &patched, &OverwritePolicy::Always, "Routes")?]),
            RoutePatch::Unchanged => {
                debug!(path = %path.display(), "routes already registered");
                Ok(vec![GeneratedFile::untouched(path, FileStatus::Unchanged, "Routes")])
            }
        }
    }
}
