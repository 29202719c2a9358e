//! Error types for the store boundary.

use thiserror::Error;

/// Errors that can occur while translating descriptors for a Zarr store.
#[derive(Error, Debug)]
pub enum ZarrEncodingError {
    /// The compression level is outside what the store codec accepts.
    #[error("invalid compression level: {0}")]
    InvalidLevel(u8),

    /// Codec construction was rejected by the store library.
    #[error("codec construction failed: {0}")]
    Codec(String),

    /// The chunk shape was rejected as a chunk grid.
    #[error("invalid chunk grid: {0}")]
    ChunkGrid(String),
}

/// Result type for store boundary operations.
pub type Result<T> = std::result::Result<T, ZarrEncodingError>;
