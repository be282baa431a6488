//! Configuration System
//!
//! Layered configuration built with the `config` crate. Precedence, lowest to
//! highest: built-in defaults, an optional TOML file, then environment
//! variables prefixed `LOADTREE__` (nested keys separated by `__`, e.g.
//! `LOADTREE__TRACKER__IN_FLIGHT_WARN_THRESHOLD=500`).

use crate::error::TrackerError;
use crate::logging::LoggingConfig;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadtreeConfig {
    #[serde(default)]
    pub tracker: TrackerSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tracker behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Warn once when this many loads are in flight at the same time. Loads
    /// that never receive a finish or failure notification are never
    /// reclaimed, so a steadily growing count points at a backend that drops
    /// completions. 0 disables the warning.
    #[serde(default = "default_in_flight_warn_threshold")]
    pub in_flight_warn_threshold: usize,
}

fn default_in_flight_warn_threshold() -> usize {
    10_000
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            in_flight_warn_threshold: default_in_flight_warn_threshold(),
        }
    }
}

impl LoadtreeConfig {
    pub fn validate(&self) -> Result<(), TrackerError> {
        self.logging
            .validate()
            .map_err(|e| TrackerError::Config(format!("logging: {}", e)))
    }
}

/// Loads `LoadtreeConfig` from defaults, file, and environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults plus environment overrides.
    pub fn load() -> Result<LoadtreeConfig, TrackerError> {
        Self::finish(Self::builder_with_defaults()?)
    }

    /// Defaults, then the TOML file at `path` (which must exist), then
    /// environment overrides.
    pub fn load_from_file(path: &Path) -> Result<LoadtreeConfig, TrackerError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| TrackerError::Config(format!("Non UTF-8 config path: {:?}", path)))?;
        let builder = Self::builder_with_defaults()?
            .add_source(File::new(path_str, FileFormat::Toml).required(true));
        Self::finish(builder)
    }

    /// Defaults, then an inline TOML document, then environment overrides.
    pub fn load_from_str(toml: &str) -> Result<LoadtreeConfig, TrackerError> {
        let builder =
            Self::builder_with_defaults()?.add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    fn builder_with_defaults(
    ) -> Result<ConfigBuilder<config::builder::DefaultState>, TrackerError> {
        let defaults = LoadtreeConfig::default();
        let builder = Config::builder()
            .set_default(
                "tracker.in_flight_warn_threshold",
                defaults.tracker.in_flight_warn_threshold as i64,
            )?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("logging.output", defaults.logging.output)?;
        Ok(builder)
    }

    fn finish(
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<LoadtreeConfig, TrackerError> {
        let config: LoadtreeConfig = builder
            .add_source(
                Environment::with_prefix("LOADTREE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
