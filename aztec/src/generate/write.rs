//! Overwrite-protected file writes

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{AztecError, Result};

/// Predicate deciding whether an existing file may be replaced
pub type OverwritePredicate = Box<dyn Fn(&Path) -> bool>;

/// Whether existing destination files may be replaced
pub enum OverwritePolicy {
    /// Replace existing files
    Always,
    /// Never touch existing files
    Never,
    /// Ask the predicate, once per existing destination
    Ask(OverwritePredicate),
}

impl OverwritePolicy {
    /// Policy backed by a predicate
    #[must_use]
    pub fn ask(predicate: impl Fn(&Path) -> bool + 'static) -> Self {
        Self::Ask(Box::new(predicate))
    }

    /// Whether `path` (which exists) may be overwritten
    #[must_use]
    pub fn allows(&self, path: &Path) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Ask(predicate) => predicate(path),
        }
    }
}

impl From<bool> for OverwritePolicy {
    fn from(force: bool) -> Self {
        if force {
            Self::Always
        } else {
            Self::Never
        }
    }
}

impl fmt::Debug for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::Never => f.write_str("Never"),
            Self::Ask(_) => f.write_str("Ask(..)"),
        }
    }
}

/// What happened to a destination file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Did not exist, written
    Created,
    /// Existed, replaced
    Overwritten,
    /// Existed, left alone by the overwrite policy
    Skipped,
    /// Existing file patched in place
    Updated,
    /// Existing file already up to date
    Unchanged,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Overwritten => "overwritten",
            Self::Skipped => "skipped",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        };
        f.pad(label)
    }
}

/// Generated file information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Destination path
    pub path: PathBuf,
    /// Outcome
    pub status: FileStatus,
    /// Description of the file
    pub description: String,
}

impl GeneratedFile {
    /// Record for a path that was not written
    #[must_use]
    pub fn untouched(path: impl Into<PathBuf>, status: FileStatus, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status,
            description: description.into(),
        }
    }
}

/// Write `content` to `path` unless it exists and `policy` refuses
///
/// Parent directories are created first. A skipped file is neither read nor
/// modified.
///
/// # Errors
///
/// [`AztecError::Write`] if a directory or the file cannot be written.
pub fn write_file(
    path: &Path,
    content: &str,
    policy: &OverwritePolicy,
    description: impl Into<String>,
) -> Result<GeneratedFile> {
    let description = description.into();
    let exists = path.exists();

    if exists && !policy.allows(path) {
        info!(path = %path.display(), "skipped existing file");
        return Ok(GeneratedFile::untouched(path, FileStatus::Skipped, description));
    }

    put(path, content)?;

    let status = if exists {
        FileStatus::Overwritten
    } else {
        FileStatus::Created
    };
    info!(path = %path.display(), %status, "wrote file");

    Ok(GeneratedFile {
        path: path.to_path_buf(),
        status,
        description,
    })
}

/// Replace an existing file with patched content
///
/// # Errors
///
/// [`AztecError::Write`] if the file cannot be written.
pub fn write_patched(path: &Path, content: &str, description: impl Into<String>) -> Result<GeneratedFile> {
    put(path, content)?;
    info!(path = %path.display(), "patched file");
    Ok(GeneratedFile::untouched(path, FileStatus::Updated, description))
}

fn put(path: &Path, content: &str) -> Result<()> {
    let to_write_error = |source| AztecError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_write_error)?;
    }
    fs::write(path, content).map_err(to_write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::tempdir;

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Http/Controllers/PostController.php");

        let file = write_file(&path, "<?php", &OverwritePolicy::Never, "Controller").unwrap();

        assert_eq!(file.status, FileStatus::Created);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<?php");
    }

    #[test]
    fn test_never_leaves_existing_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Post.php");
        fs::write(&path, "original").unwrap();
        let modified = fs::metadata(&path).unwrap().modified().unwrap();

        let file = write_file(&path, "replacement", &false.into(), "Model").unwrap();

        assert_eq!(file.status, FileStatus::Skipped);
        assert_eq!(file.path, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn test_predicate_only_asked_for_existing_files() {
        let dir = tempdir().unwrap();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let policy = OverwritePolicy::ask(move |_| {
            counter.set(counter.get() + 1);
            true
        });

        let path = dir.path().join("Post.php");
        let first = write_file(&path, "one", &policy, "Model").unwrap();
        assert_eq!(first.status, FileStatus::Created);
        assert_eq!(calls.get(), 0);

        let second = write_file(&path, "two", &policy, "Model").unwrap();
        assert_eq!(second.status, FileStatus::Overwritten);
        assert_eq!(calls.get(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_policy_from_bool() {
        assert!(OverwritePolicy::from(true).allows(Path::new("x")));
        assert!(!OverwritePolicy::from(false).allows(Path::new("x")));
    }
}
