//! `javelin.toml` loading and tracing setup.

use std::path::Path;
use std::sync::Once;

use javelin_types::TypeSystemOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::prelude::*;

mod schema;

pub use schema::{json_schema, json_schema_string};

/// Top-level analyzer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct JavelinConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Switches for the semantic type model.
    #[serde(default)]
    pub types: TypeSystemOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level, or a full `EnvFilter` directive string
    /// (e.g. `info,javelin.types.capture=trace`).
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr. When disabled no subscriber output is produced.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    /// `level` as `EnvFilter` directives. Bare level names are matched case-insensitively and
    /// `warning` is accepted for `warn`; anything else passes through trimmed.
    pub(crate) fn directives(&self) -> String {
        const LEVEL_NAMES: [(&str, &str); 7] = [
            ("trace", "trace"),
            ("debug", "debug"),
            ("info", "info"),
            ("warn", "warn"),
            ("warning", "warn"),
            ("error", "error"),
            ("off", "off"),
        ];

        let level = self.level.trim();
        if level.is_empty() {
            return Self::default_level();
        }
        LEVEL_NAMES
            .iter()
            .find(|(name, _)| level.eq_ignore_ascii_case(name))
            .map_or_else(|| level.to_owned(), |(_, canonical)| (*canonical).to_owned())
    }

    /// The effective filter: the configured level, with `RUST_LOG` directives appended when set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let rust_log = std::env::var("RUST_LOG").ok();
        self.filter_with_overrides(rust_log.as_deref())
    }

    /// Tries `level,overrides`, then `overrides` alone, then `level` alone. Falls back to `info`
    /// when none of them parse.
    fn filter_with_overrides(&self, overrides: Option<&str>) -> tracing_subscriber::EnvFilter {
        use tracing_subscriber::filter::LevelFilter;
        use tracing_subscriber::EnvFilter;

        let base = self.directives();
        let mut candidates = Vec::with_capacity(3);
        if let Some(overrides) = overrides.map(str::trim).filter(|o| !o.is_empty()) {
            candidates.push(format!("{base},{overrides}"));
            candidates.push(overrides.to_owned());
        }
        candidates.push(base);

        candidates
            .into_iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` embeds a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl JavelinConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Options to hand to `TypeSystem::with_options`.
    pub fn type_system_options(&self) -> TypeSystemOptions {
        self.types.clone()
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber described by `config`.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        if !config.stderr {
            return;
        }
        let filter = config.env_filter();

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            // Another subscriber (e.g. from a test harness) already owns the global slot.
            return;
        }
        tracing::debug!(target: "javelin.config", level = %config.level, "tracing initialized");
    });
}
