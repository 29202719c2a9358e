//! Translation of encoding descriptors into Zarr store metadata.
//!
//! The policy engine in `chunk-policy` is store-agnostic; this crate maps
//! its [`EncodingMap`](chunk_policy::EncodingMap) onto what a Zarr store
//! actually consumes:
//!
//! - numcodecs-style per-variable metadata for Zarr V2 stores
//!   ([`metadata`]), and
//! - `zarrs` chunk grids and Blosc codec chains for Zarr V3 arrays
//!   ([`codecs`]).
//!
//! The translation never touches array values; writing chunks is the
//! store writer's job.

pub mod codecs;
pub mod error;
pub mod metadata;

// Re-exports
pub use codecs::{bytes_to_bytes_codecs, chunk_grid};
pub use error::{Result, ZarrEncodingError};
pub use metadata::{compressor_metadata, encoding_metadata, variable_metadata};
