//! Configuration System
//!
//! Layered configuration: built-in defaults, then an optional TOML file, then
//! `CANOPY_*` environment variables (`__` separates nested keys, e.g.
//! `CANOPY_RENDER__MAX_DEPTH=64`).

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanopyConfig {
    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Deepest node depth a render may mount before failing
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Escape text and attribute values in HTML output
    #[serde(default = "default_true")]
    pub escape_text: bool,
}

fn default_max_depth() -> usize {
    512
}

fn default_true() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            escape_text: default_true(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be at least 1".to_string());
        }
        Ok(())
    }
}

impl CanopyConfig {
    /// Load configuration, layering `path` (if given) and the environment
    /// over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("render.max_depth", default_max_depth() as i64)?
            .set_default("render.escape_text", default_true())?;

        if let Some(path) = path {
            debug!(config_path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("CANOPY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: CanopyConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.render
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("render: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("logging: {}", e)))
    }
}
