//! Deterministic chunk-layout and compression policy for labeled
//! multidimensional datasets.
//!
//! Datasets converted for content-addressed storage must compress to the
//! same bytes on every machine, every time: the store reference is a hash
//! of those bytes. This crate decides, per variable, a chunk shape and a
//! compression configuration such that re-encoding the same logical data
//! always produces the same output. It never touches the data itself.
//!
//! # Architecture
//!
//! - A [`rules::RuleTable`] classifies each variable's ordered dimension
//!   names against an ordered rule list (first match wins, no implicit
//!   default) and resolves a concrete chunk shape, clamped to the actual
//!   extents.
//! - A [`codec::CompressionEngine`] selects the Blosc configuration, with
//!   the per-chunk thread count pinned to one, and leaves variable-length
//!   text uncompressed.
//! - [`encoding::build_encoding_map`] composes both over a whole
//!   [`dataset::Dataset`], failing fast on any unrecognized shape.
//!
//! Chunk targets are hand-tuned per dataset family, so rule tables are
//! data: build them in code or load them from YAML.

pub mod chunks;
pub mod codec;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod rules;

// Re-exports
pub use chunks::{AxisSizing, ChunkSpec};
pub use codec::{BloscAlgorithm, CodecSpec, CompressionEngine, ShuffleMode, COMPRESSION_THREADS};
pub use config::EncodingConfig;
pub use dataset::{DataType, Dataset, Dimension, Variable, VariableRole};
pub use encoding::{
    all_variables, build_encoding_map, data_variables_only, EncodingDescriptor, EncodingMap,
};
pub use error::{EncodingError, Result};
pub use rules::{DimMatcher, RuleTable, ShapeRule};
