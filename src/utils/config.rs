//! Tracker configuration and file round-trip

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arbiter::{ArbiterPolicy, PolicyError};

/// Session-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Arbitration thresholds
    pub policy: ArbiterPolicy,
    /// Offer each source's last known fix to the arbiter on start
    pub seed_from_last_known: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            policy: ArbiterPolicy::default(),
            seed_from_last_known: true,
        }
    }
}

impl TrackerConfig {
    /// Validate all parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate()?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: TrackerConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A parameter failed validation
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

impl From<PolicyError> for ConfigError {
    fn from(error: PolicyError) -> Self {
        ConfigError::InvalidParameter {
            parameter: error.parameter.to_string(),
            value: error.value,
            reason: error.reason.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter {} = {}: {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => {
                write!(f, "{}", message)
            }
            ConfigError::SerializationError { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
