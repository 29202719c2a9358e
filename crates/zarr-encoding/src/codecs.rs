//! Zarr V3 codec chains via `zarrs`.

use std::sync::Arc;

use chunk_policy::{BloscAlgorithm, DataType, EncodingDescriptor, ShuffleMode};
use zarrs::array::codec::bytes_to_bytes::blosc::{
    BloscCodec, BloscCompressionLevel, BloscCompressor, BloscShuffleMode,
};
use zarrs::array::codec::BytesToBytesCodecTraits;
use zarrs::array::ChunkGrid;

use crate::error::{Result, ZarrEncodingError};

fn blosc_compressor(algorithm: BloscAlgorithm) -> BloscCompressor {
    match algorithm {
        BloscAlgorithm::BloscLz => BloscCompressor::BloscLZ,
        BloscAlgorithm::Lz4 => BloscCompressor::LZ4,
        BloscAlgorithm::Lz4Hc => BloscCompressor::LZ4HC,
        BloscAlgorithm::Zlib => BloscCompressor::Zlib,
        BloscAlgorithm::Zstd => BloscCompressor::Zstd,
    }
}

fn blosc_shuffle(shuffle: ShuffleMode) -> BloscShuffleMode {
    match shuffle {
        ShuffleMode::None => BloscShuffleMode::NoShuffle,
        ShuffleMode::Byte => BloscShuffleMode::Shuffle,
        ShuffleMode::Bit => BloscShuffleMode::BitShuffle,
    }
}

/// Build the bytes-to-bytes codec chain for one variable.
///
/// Uncompressed variables get an empty chain. The element size is passed
/// through as the Blosc typesize when a shuffle pre-filter is configured.
pub fn bytes_to_bytes_codecs(
    descriptor: &EncodingDescriptor,
    dtype: DataType,
) -> Result<Vec<Arc<dyn BytesToBytesCodecTraits>>> {
    let Some(codec) = descriptor.compressor else {
        return Ok(Vec::new());
    };

    let level = BloscCompressionLevel::try_from(codec.level)
        .map_err(|_| ZarrEncodingError::InvalidLevel(codec.level))?;

    let shuffle = blosc_shuffle(codec.shuffle);

    // typesize is required when shuffle is enabled
    let typesize = if codec.shuffle != ShuffleMode::None {
        dtype.size_bytes()
    } else {
        None
    };

    let blosc = BloscCodec::new(blosc_compressor(codec.algorithm), level, None, shuffle, typesize)
        .map_err(|e| ZarrEncodingError::Codec(e.to_string()))?;

    Ok(vec![Arc::new(blosc)])
}

/// Build the regular chunk grid for one variable's resolved chunk shape.
pub fn chunk_grid(descriptor: &EncodingDescriptor) -> Result<ChunkGrid> {
    let shape: Vec<u64> = descriptor.chunks.iter().collect();
    shape
        .try_into()
        .map_err(|e| ZarrEncodingError::ChunkGrid(format!("{e:?}")))
}
