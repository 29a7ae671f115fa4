//! Class identity from a source file

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AztecError, Result};
use crate::php::{self, ClassDecl, Expr, SourceFile};

/// Namespace-qualified identity of the first class in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceIdentity {
    /// `Namespace\Class`, or just `Class` without a namespace
    pub fqcn: String,
    /// Simple class name
    pub class_name: String,
    /// Enclosing namespace (empty when none)
    pub namespace: String,
    /// `$table` when declared as a string literal
    pub table: Option<String>,
    /// Diagnostics
    pub notes: Vec<String>,
}

/// Reads and parses a PHP file, mapping failures onto [`AztecError`]
///
/// # Errors
///
/// [`AztecError::Read`] when the file is missing or unreadable,
/// [`AztecError::Parse`] when it is not valid enough to inspect.
pub fn parse_file(path: &Path) -> Result<SourceFile> {
    let source = fs::read_to_string(path).map_err(|source| AztecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    php::parse(&source).map_err(|err| AztecError::Parse {
        path: path.to_path_buf(),
        line: err.line,
        message: err.message,
    })
}

/// Recovers class identity and storage table from source
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceResolver;

impl SourceResolver {
    /// Parse `path` and identify its first class
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable or malformed, when it
    /// declares no class, or when the class has no name.
    pub fn resolve(path: &Path) -> Result<SourceIdentity> {
        let file = parse_file(path)?;
        let class = first_class(&file, path)?;
        Self::identify(class, path)
    }

    /// Identity of an already parsed class
    ///
    /// # Errors
    ///
    /// [`AztecError::UnnamedClass`] when the declaration has no name.
    pub fn identify(class: &ClassDecl, path: &Path) -> Result<SourceIdentity> {
        let class_name = class.name.clone().ok_or_else(|| AztecError::UnnamedClass {
            path: path.to_path_buf(),
        })?;
        let namespace = class.namespace.clone().unwrap_or_default();
        let fqcn = class.fqcn().unwrap_or_else(|| class_name.clone());

        let mut notes = Vec::new();
        let table = match class.property("table") {
            None => None,
            Some(property) => match &property.default {
                Some(Expr::String(table)) => Some(table.clone()),
                _ => {
                    notes.push("table property has a non-literal default; table left unset".to_string());
                    None
                }
            },
        };

        Ok(SourceIdentity {
            fqcn,
            class_name,
            namespace,
            table,
            notes,
        })
    }
}

/// First class declared in `file`
///
/// # Errors
///
/// [`AztecError::NoClass`] when the file declares none.
pub fn first_class<'a>(file: &'a SourceFile, path: &Path) -> Result<&'a ClassDecl> {
    file.first_class().ok_or_else(|| AztecError::NoClass {
        path: PathBuf::from(path),
    })
}
