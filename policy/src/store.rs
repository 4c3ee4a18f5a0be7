//! The process-wide policy, swapped atomically.

use arc_swap::ArcSwap;
use idv_types::{ConfigError, PolicyConfig};
use std::sync::Arc;
use tracing::info;

/// Holds the current [`PolicyConfig`].
///
/// Readers take one snapshot per evaluation with [`PolicyStore::load`];
/// retuning replaces the whole value, so an evaluation never sees a mix of
/// old and new fields.
pub struct PolicyStore {
    current: ArcSwap<PolicyConfig>,
}

impl PolicyStore {
    /// Fails if `config` does not validate.
    pub fn new(config: PolicyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            current: ArcSwap::from_pointee(config),
        })
    }

    pub fn load(&self) -> Arc<PolicyConfig> {
        self.current.load_full()
    }

    /// Validate and install `config`, returning the one it replaced. An
    /// invalid config leaves the current one in place.
    pub fn replace(&self, config: PolicyConfig) -> Result<Arc<PolicyConfig>, ConfigError> {
        config.validate()?;
        let previous = self.current.swap(Arc::new(config));
        info!("policy config replaced");
        Ok(previous)
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self {
            current: ArcSwap::from_pointee(PolicyConfig::default()),
        }
    }
}
