//! Configuration for the encoding policy.

use serde::{Deserialize, Serialize};

use crate::codec::{BloscAlgorithm, CodecSpec, ShuffleMode};

/// Codec configuration applied to every compressible variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Blosc backend compressor.
    pub algorithm: BloscAlgorithm,

    /// Compression level (1-9).
    pub level: u8,

    /// Byte-reordering pre-filter.
    pub shuffle: ShuffleMode,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            algorithm: BloscAlgorithm::Zstd,
            level: 6,
            shuffle: ShuffleMode::Byte,
        }
    }
}

impl EncodingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CHUNK_CODEC") {
            if let Some(alg) = BloscAlgorithm::parse(&val) {
                config.algorithm = alg;
            }
        }

        if let Ok(val) = std::env::var("CHUNK_CODEC_LEVEL") {
            if let Ok(level) = val.parse() {
                config.level = level;
            }
        }

        if let Ok(val) = std::env::var("CHUNK_CODEC_SHUFFLE") {
            if let Some(shuffle) = ShuffleMode::parse(&val) {
                config.shuffle = shuffle;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.level == 0 || self.level > 9 {
            return Err("level must be 1-9".to_string());
        }

        Ok(())
    }

    /// The codec this configuration describes.
    pub fn codec_spec(&self) -> CodecSpec {
        CodecSpec {
            algorithm: self.algorithm,
            level: self.level,
            shuffle: self.shuffle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncodingConfig::default();
        assert_eq!(config.algorithm, BloscAlgorithm::Zstd);
        assert_eq!(config.level, 6);
        assert_eq!(config.shuffle, ShuffleMode::Byte);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EncodingConfig::default();
        config.level = 0;
        assert!(config.validate().is_err());

        config.level = 10;
        assert!(config.validate().is_err());

        config.level = 9;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_codec_spec_matches_config() {
        let config = EncodingConfig {
            algorithm: BloscAlgorithm::Lz4,
            level: 5,
            shuffle: ShuffleMode::None,
        };
        let codec = config.codec_spec();
        assert_eq!(codec.algorithm, BloscAlgorithm::Lz4);
        assert_eq!(codec.level, 5);
        assert_eq!(codec.shuffle, ShuffleMode::None);
    }
}
