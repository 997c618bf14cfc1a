//! Engine configuration
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default key holding the collection of records in a batch request
pub const DEFAULT_COLLECTION_KEY: &str = "applicantDetails";

/// Default key the transformed records are written under
pub const DEFAULT_OUTPUT_KEY: &str = "applicants";

/// Default number of bytes read per chunk when streaming from a reader
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Settings shared by the batch and streaming engines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub batch: BatchConfig,
    pub stream: StreamConfig,
}

/// Batch (whole-document) behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Whether a document holding `collection_key` is treated as a batch
    pub enabled: bool,
    /// Key whose array elements are transformed one by one
    pub collection_key: String,
    /// Key the transformed array is written under
    pub output_key: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            output_key: DEFAULT_OUTPUT_KEY.to_string(),
        }
    }
}

/// Streaming behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Bytes read per chunk by the reader-driven helpers
    pub chunk_size: usize,
    /// Upper bound on the encoded size of a single key or top-level value
    pub max_value_bytes: Option<usize>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_value_bytes: None,
        }
    }
}

impl EngineConfig {
    /// Check the configuration for values the engines cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.batch.enabled {
            if self.batch.collection_key.is_empty() {
                return Err(Error::configuration("batch.collection_key must not be empty"));
            }
            if self.batch.output_key.is_empty() {
                return Err(Error::configuration("batch.output_key must not be empty"));
            }
        }
        if self.stream.chunk_size == 0 {
            return Err(Error::configuration("stream.chunk_size must be greater than zero"));
        }
        if self.stream.max_value_bytes == Some(0) {
            return Err(Error::configuration(
                "stream.max_value_bytes must be greater than zero when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.batch.enabled);
        assert_eq!(config.batch.collection_key, "applicantDetails");
        assert_eq!(config.batch.output_key, "applicants");
        assert_eq!(config.stream.chunk_size, 8192);
        assert_eq!(config.stream.max_value_bytes, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"batch": {"collection_key": "people"}}"#).unwrap();
        assert_eq!(config.batch.collection_key, "people");
        assert_eq!(config.batch.output_key, "applicants");
        assert_eq!(config.stream, StreamConfig::default());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = EngineConfig::default();
        config.stream.chunk_size = 0;
        assert!(matches!(config.validate(), Err(Error::Configuration { .. })));

        let mut config = EngineConfig::default();
        config.batch.output_key.clear();
        assert!(config.validate().is_err());

        // keys are irrelevant when batching is off
        config.batch.enabled = false;
        assert!(config.validate().is_ok());

        let mut config = EngineConfig::default();
        config.stream.max_value_bytes = Some(0);
        assert!(config.validate().is_err());
    }
}
