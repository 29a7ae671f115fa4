//! Observability (structured logging)
//!
//! The library only emits `tracing` events; binaries decide how to render
//! them by calling [`init`] once at startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging stack
///
/// Sets up:
/// - Environment-based log level filtering (`RUST_LOG`)
/// - Pretty output in debug builds, JSON output in release builds (or when
///   [`ObservabilityConfig::json`] is set)
/// - Logs go to stderr so generated output on stdout stays clean
///
/// # Example
///
/// ```rust,no_run
/// use aztec::observability::{self, ObservabilityConfig};
///
/// observability::init(&ObservabilityConfig::default());
/// tracing::info!("generator started");
/// ```
pub fn init(config: &ObservabilityConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new(format!("info,{}=debug", config.service_name))
        } else {
            EnvFilter::new("warn")
        }
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    // `try_init` so a second call (tests, embedding) is harmless
    let result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Crate name used as the default filter target
    pub service_name: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "aztec".to_string(),
            json: !cfg!(debug_assertions),
        }
    }
}

impl ObservabilityConfig {
    /// Create new observability config
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Force JSON output
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}
