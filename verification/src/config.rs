//! Engine configuration with TOML file support.

use idv_imaging::QualityThresholds;
use idv_types::{ConfigError, PolicyConfig};
use idv_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for a [`crate::VerificationEngine`].
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on a single collaborator call, in milliseconds.
    #[serde(default = "default_signal_timeout_ms")]
    pub signal_timeout_ms: u64,

    /// Smallest accepted width or height, in pixels.
    #[serde(default = "default_min_image_dimension")]
    pub min_image_dimension: u32,

    /// Largest accepted width or height, in pixels.
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Gate thresholds, signal weights and decision tiers.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Limits for capture-quality advisories.
    #[serde(default)]
    pub quality: QualityThresholds,
}

fn default_signal_timeout_ms() -> u64 {
    30_000
}

fn default_min_image_dimension() -> u32 {
    100
}

fn default_max_image_dimension() -> u32 {
    4096
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    /// Load configuration from a TOML file. The result is validated.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string. The result is validated.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn signal_timeout(&self) -> Duration {
        Duration::from_millis(self.signal_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signal_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "signal_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.min_image_dimension == 0 || self.min_image_dimension > self.max_image_dimension {
            return Err(ConfigError::Invalid(format!(
                "image dimension limits must satisfy 0 < min ({}) <= max ({})",
                self.min_image_dimension, self.max_image_dimension
            )));
        }
        self.policy.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            signal_timeout_ms: default_signal_timeout_ms(),
            min_image_dimension: default_min_image_dimension(),
            max_image_dimension: default_max_image_dimension(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            policy: PolicyConfig::default(),
            quality: QualityThresholds::default(),
        }
    }
}
