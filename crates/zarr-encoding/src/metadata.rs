//! numcodecs-style encoding metadata (Zarr V2).
//!
//! The stores the campaign converters target describe each variable's
//! compressor as a numcodecs configuration object inside `.zarray`. This
//! module renders [`CodecSpec`]s and whole encoding maps in that schema.

use chunk_policy::{CodecSpec, EncodingDescriptor, EncodingMap};
use serde_json::{json, Value};

/// numcodecs Blosc configuration object for one codec.
pub fn compressor_metadata(codec: &CodecSpec) -> Value {
    json!({
        "id": "blosc",
        "cname": codec.algorithm.as_str(),
        "clevel": codec.level,
        "shuffle": codec.shuffle.code(),
        "blocksize": 0,
    })
}

/// Per-variable encoding block: chunk shape, compressor, filters.
///
/// An uncompressed variable gets an explicit `null` compressor, which is
/// how the store spells "no compression".
pub fn variable_metadata(descriptor: &EncodingDescriptor) -> Value {
    json!({
        "chunks": descriptor.chunks.as_slice(),
        "compressor": descriptor
            .compressor
            .as_ref()
            .map(compressor_metadata)
            .unwrap_or(Value::Null),
        "filters": Value::Null,
    })
}

/// Encoding metadata for a whole dataset, keyed by variable name.
pub fn encoding_metadata(map: &EncodingMap) -> Value {
    Value::Object(
        map.iter()
            .map(|(name, desc)| (name.to_string(), variable_metadata(desc)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunk_policy::{
        all_variables, build_encoding_map, CompressionEngine, DataType, Dataset, RuleTable,
        Variable,
    };

    #[test]
    fn test_compressor_metadata_shape() {
        let value = compressor_metadata(&CodecSpec::default());
        assert_eq!(
            value,
            json!({
                "id": "blosc",
                "cname": "zstd",
                "clevel": 6,
                "shuffle": 1,
                "blocksize": 0,
            })
        );
    }

    #[test]
    fn test_variable_metadata_for_text_has_null_compressor() {
        let ds = Dataset::from_variables([Variable::data(
            "station",
            [("time", 1000)],
            DataType::String,
        )]);
        let map = build_encoding_map(
            &ds,
            &RuleTable::default(),
            &CompressionEngine::default(),
            all_variables,
        )
        .expect("build");

        let value = variable_metadata(map.get("station").expect("station"));
        assert_eq!(value["compressor"], Value::Null);
        assert_eq!(value["chunks"], json!([1000]));
        assert_eq!(value["filters"], Value::Null);
    }

    #[test]
    fn test_encoding_metadata_is_keyed_by_variable() {
        let ds = Dataset::from_variables([
            Variable::data("ta", [("time", 500_000)], DataType::Float32),
            Variable::data("height", [("height", 100)], DataType::Float32),
        ]);
        let map = build_encoding_map(
            &ds,
            &RuleTable::default(),
            &CompressionEngine::default(),
            all_variables,
        )
        .expect("build");

        let value = encoding_metadata(&map);
        assert_eq!(value["ta"]["chunks"], json!([262_144]));
        assert_eq!(value["height"]["chunks"], json!([100]));
        assert_eq!(value["ta"]["compressor"]["cname"], json!("zstd"));
    }
}
