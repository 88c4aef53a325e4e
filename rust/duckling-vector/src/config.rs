//! Decoding limits and options.

use duckling_common::{Result, error::Error, verify_arg};
use serde::{Deserialize, Serialize};

/// Row capacity of a standard engine vector.
pub const STANDARD_VECTOR_SIZE: usize = 2048;

/// Nesting depth beyond which a logical type is rejected.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Configuration of the vector factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Maximum nesting depth of a decoded type, counting the column itself.
    pub max_nesting_depth: usize,
    /// Maximum number of rows in a chunk.
    pub vector_size: usize,
    /// Check every list entry against its child vector when the list vector
    /// is created, instead of on access.
    pub eager_list_validation: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            vector_size: STANDARD_VECTOR_SIZE,
            eager_list_validation: false,
        }
    }
}

impl DecodeConfig {
    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        verify_arg!(max_nesting_depth, self.max_nesting_depth > 0);
        verify_arg!(vector_size, self.vector_size > 0);
        Ok(())
    }

    /// Parses and validates a JSON-encoded configuration. Missing fields
    /// take their default values.
    pub fn from_json(json: &str) -> Result<DecodeConfig> {
        let config: DecodeConfig =
            serde_json::from_str(json).map_err(|e| Error::invalid_arg("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecodeConfig::default();
        assert_eq!(config.vector_size, 2048);
        assert_eq!(config.max_nesting_depth, 64);
        assert!(!config.eager_list_validation);
        config.validate().unwrap();
    }

    #[test]
    fn test_from_json() {
        let config = DecodeConfig::from_json(r#"{ "eager_list_validation": true }"#).unwrap();
        assert!(config.eager_list_validation);
        assert_eq!(config.vector_size, STANDARD_VECTOR_SIZE);

        assert!(DecodeConfig::from_json(r#"{ "max_nesting_depth": 0 }"#).is_err());
        assert!(DecodeConfig::from_json("not json").is_err());
    }
}
