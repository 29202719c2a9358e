//! Compression codec selection.
//!
//! Every compressible variable in a dataset gets the same Blosc
//! configuration; variable-length text is stored uncompressed because the
//! codec configuration does not cover it. That fallback is policy, not an
//! error.
//!
//! The stores produced downstream are referenced by content hash, so the
//! compressed bytes of a chunk must not depend on the machine or on
//! available parallelism. Blosc splits its input into blocks per thread,
//! which makes multi-threaded output differ for identical logical input.
//! The [`CompressionEngine`] handle therefore pins the per-chunk thread
//! count to one at construction and offers no way to change it.

use serde::{Deserialize, Serialize};

use crate::dataset::Variable;

/// Blosc backend compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BloscAlgorithm {
    BloscLz,
    Lz4,
    Lz4Hc,
    Zlib,
    Zstd,
}

impl Default for BloscAlgorithm {
    fn default() -> Self {
        Self::Zstd
    }
}

impl BloscAlgorithm {
    /// Get the codec name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BloscLz => "blosclz",
            Self::Lz4 => "lz4",
            Self::Lz4Hc => "lz4hc",
            Self::Zlib => "zlib",
            Self::Zstd => "zstd",
        }
    }

    /// Parse from string (case-insensitive). Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blosclz" => Some(Self::BloscLz),
            "lz4" => Some(Self::Lz4),
            "lz4hc" => Some(Self::Lz4Hc),
            "zlib" => Some(Self::Zlib),
            "zstd" => Some(Self::Zstd),
            _ => None,
        }
    }
}

impl std::fmt::Display for BloscAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Byte-reordering pre-filter applied before compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    None,
    /// Byte shuffle; groups the n-th byte of each element together.
    Byte,
    /// Bit shuffle.
    Bit,
}

impl Default for ShuffleMode {
    fn default() -> Self {
        Self::Byte
    }
}

impl ShuffleMode {
    /// The integer code used in store metadata (0 = none, 1 = byte, 2 = bit).
    pub fn code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Byte => 1,
            Self::Bit => 2,
        }
    }

    /// Parse from string (case-insensitive). Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "noshuffle" | "0" => Some(Self::None),
            "byte" | "shuffle" | "1" => Some(Self::Byte),
            "bit" | "bitshuffle" | "2" => Some(Self::Bit),
            _ => None,
        }
    }
}

/// A concrete compression configuration for chunk payloads.
///
/// The thread count is deliberately not a field here; it is the
/// [`CompressionEngine`]'s invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecSpec {
    pub algorithm: BloscAlgorithm,
    /// Compression level, 1-9.
    pub level: u8,
    pub shuffle: ShuffleMode,
}

impl Default for CodecSpec {
    fn default() -> Self {
        Self {
            algorithm: BloscAlgorithm::Zstd,
            level: 6,
            shuffle: ShuffleMode::Byte,
        }
    }
}

/// Number of threads a compression call may use. Fixed for the life of
/// the process so re-encoding the same data yields the same bytes.
pub const COMPRESSION_THREADS: u32 = 1;

/// Handle to the configured compression backend.
///
/// Created once at startup from the dataset's codec configuration and
/// passed by reference wherever codecs are selected. Because the handle is
/// immutable and the thread count is a constant, the determinism invariant
/// cannot be broken mid-build, and independent handles in tests cannot
/// interfere with one another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionEngine {
    codec: CodecSpec,
}

impl CompressionEngine {
    pub fn new(codec: CodecSpec) -> Self {
        Self { codec }
    }

    /// The codec applied to compressible variables.
    pub fn codec(&self) -> CodecSpec {
        self.codec
    }

    /// Threads per compression call. Always one.
    pub fn threads(&self) -> u32 {
        COMPRESSION_THREADS
    }

    /// Select the codec for one variable.
    ///
    /// Variable-length text is never compressed; everything else gets the
    /// configured codec.
    pub fn codec_for(&self, variable: &Variable) -> Option<CodecSpec> {
        if variable.dtype.is_text() {
            None
        } else {
            Some(self.codec)
        }
    }
}

impl Default for CompressionEngine {
    fn default() -> Self {
        Self::new(CodecSpec::default())
    }
}
