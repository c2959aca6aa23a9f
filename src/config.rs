use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::vector::{Vector, DEFAULT_CAPACITY, DEFAULT_MULTIPLIER, MAX_CAPACITY};

/// Initial sizing for a [`Vector`], loadable from TOML.
///
/// ```toml
/// capacity = 64
/// multiplier = 2
/// ```
///
/// Missing keys fall back to the defaults used by [`Vector::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VectorConfig {
    pub capacity: usize,
    pub multiplier: usize,
}

impl Default for VectorConfig {
    fn default() -> Self {
        VectorConfig {
            capacity: DEFAULT_CAPACITY,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl VectorConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: VectorConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects a zero multiplier and a capacity above [`MAX_CAPACITY`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::InvalidValue {
                field: "capacity",
                reason: format!("must be at most {}", MAX_CAPACITY),
            });
        }
        if self.multiplier == 0 {
            return Err(ConfigError::InvalidValue {
                field: "multiplier",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Vector {
    pub fn from_config(config: &VectorConfig) -> Self {
        Vector::with_capacity(config.capacity, config.multiplier)
    }
}
