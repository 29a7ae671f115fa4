//! Configuration management for aztec
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `AZTEC_` prefix, `__` for nesting)
//! 2. `./aztec.toml` (project-local)
//! 3. `~/.config/aztec/config.toml` (user config, XDG)
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # aztec.toml
//! modules_path = "Modules"
//! namespace_root = "Modules"
//! source_dir = "app"
//! layers = ["controller", "requests", "resource", "repository", "service", "routes"]
//! locales = ["en", "ar"]
//! stubs_path = "stubs/aztec"
//!
//! [introspection]
//! runtime_enabled = true
//! php_binary = "php"
//! autoload_path = "vendor/autoload.php"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use aztec::config::AztecConfig;
//!
//! # fn example() -> aztec::Result<()> {
//! let config = AztecConfig::load()?;
//! let locales = &config.locales;
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::Layer;

/// Runtime-introspection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntrospectionSettings {
    /// Try runtime reflection through the PHP binary before falling back to static analysis
    pub runtime_enabled: bool,

    /// PHP executable used for runtime reflection
    pub php_binary: PathBuf,

    /// Composer autoloader; when unset, `<modules_path>/../vendor/autoload.php` is used
    pub autoload_path: Option<PathBuf>,
}

impl Default for IntrospectionSettings {
    fn default() -> Self {
        Self {
            runtime_enabled: true,
            php_binary: PathBuf::from("php"),
            autoload_path: None,
        }
    }
}

/// Complete aztec configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AztecConfig {
    /// Directory holding one sub-directory per module
    pub modules_path: PathBuf,

    /// Root namespace of every module (`Modules\Blog\...`)
    pub namespace_root: String,

    /// Conventional source sub-directory inside a module
    pub source_dir: String,

    /// Layers generated when none are requested explicitly
    pub layers: Vec<Layer>,

    /// Locales used for translatable-field validation rules
    pub locales: Vec<String>,

    /// Directory whose stubs override the embedded ones
    pub stubs_path: Option<PathBuf>,

    /// Runtime-introspection settings
    pub introspection: IntrospectionSettings,
}

impl Default for AztecConfig {
    fn default() -> Self {
        Self {
            modules_path: PathBuf::from("Modules"),
            namespace_root: "Modules".to_string(),
            source_dir: "app".to_string(),
            layers: Layer::ALL.to_vec(),
            locales: vec!["en".to_string()],
            stubs_path: None,
            introspection: IntrospectionSettings::default(),
        }
    }
}

impl AztecConfig {
    /// Load configuration from the standard locations
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be parsed, or
    /// if a value has the wrong type.
    pub fn load() -> crate::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(user_config) = Self::recommended_path() {
            if user_config.exists() {
                figment = figment.merge(Toml::file(&user_config));
            }
        }

        let local_config = PathBuf::from("./aztec.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        figment = figment.merge(Env::prefixed("AZTEC_").split("__").lowercase(true));

        Ok(figment.extract()?)
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or a value has the
    /// wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> crate::Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("AZTEC_").split("__").lowercase(true))
            .extract()?;

        Ok(config)
    }

    /// Get the recommended XDG config path
    ///
    /// Returns `~/.config/aztec/config.toml` on Linux.
    #[must_use]
    pub fn recommended_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aztec").join("config.toml"))
    }

    /// Composer autoloader used by runtime introspection
    #[must_use]
    pub fn autoload_path(&self) -> PathBuf {
        self.introspection.autoload_path.clone().unwrap_or_else(|| {
            self.modules_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("vendor")
                .join("autoload.php")
        })
    }
}
