//! Encoding map assembly.
//!
//! Walks a dataset's variables, classifies each dimension signature,
//! resolves the chunk shape, selects the codec, and collects one
//! [`EncodingDescriptor`] per included variable. Any classification or
//! resolution failure aborts the whole build; a partial map is never
//! returned.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::chunks::ChunkSpec;
use crate::codec::{CodecSpec, CompressionEngine};
use crate::dataset::{Dataset, Variable, VariableRole};
use crate::error::Result;
use crate::rules::RuleTable;

/// Chunk layout and codec for one variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodingDescriptor {
    pub chunks: ChunkSpec,
    /// `None` means the variable is stored uncompressed.
    pub compressor: Option<CodecSpec>,
}

/// Per-variable encoding descriptors for a dataset, keyed by variable
/// name.
///
/// Iteration and serialization are in name order, so two maps built from
/// the same schema are identical byte for byte regardless of how either
/// dataset was assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EncodingMap(BTreeMap<String, EncodingDescriptor>);

impl EncodingMap {
    pub fn get(&self, variable: &str) -> Option<&EncodingDescriptor> {
        self.0.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EncodingDescriptor)> {
        self.0.iter().map(|(name, desc)| (name.as_str(), desc))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Inclusion policy keeping every variable.
pub fn all_variables(_: &Variable) -> bool {
    true
}

/// Inclusion policy dropping coordinate variables, which the store
/// encodes with its own defaults.
pub fn data_variables_only(variable: &Variable) -> bool {
    variable.role != VariableRole::Coordinate
}

/// Build the encoding map for a dataset.
///
/// `include` selects which variables receive descriptors; see
/// [`all_variables`] and [`data_variables_only`]. Every included variable
/// is classified against `rules` and paired with the codec `engine`
/// selects for its type. The first error aborts the build.
pub fn build_encoding_map(
    dataset: &Dataset,
    rules: &RuleTable,
    engine: &CompressionEngine,
    include: impl Fn(&Variable) -> bool,
) -> Result<EncodingMap> {
    let mut map = BTreeMap::new();
    for variable in dataset.variables().filter(|v| include(v)) {
        let chunks = rules.resolve(variable)?;
        let compressor = engine.codec_for(variable);
        debug!(
            "variable {:?}: chunks {:?}, compressor {}",
            variable.name,
            chunks.as_slice(),
            compressor.map_or("none".to_string(), |c| c.algorithm.to_string()),
        );
        map.insert(
            variable.name.clone(),
            EncodingDescriptor { chunks, compressor },
        );
    }
    Ok(EncodingMap(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::AxisSizing;
    use crate::dataset::DataType;
    use crate::error::EncodingError;
    use crate::rules::ShapeRule;

    fn test_dataset() -> Dataset {
        Dataset::from_variables([
            Variable::data("ta", [("time", 200_000)], DataType::Float32),
            Variable::data(
                "lwp",
                [("time", 200_000), ("height", 100)],
                DataType::Float64,
            ),
            Variable::coordinate("time", [("time", 200_000)], DataType::Int64),
        ])
    }

    #[test]
    fn test_build_covers_all_included_variables() {
        let map = build_encoding_map(
            &test_dataset(),
            &RuleTable::default(),
            &CompressionEngine::default(),
            all_variables,
        )
        .expect("build");

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("ta").expect("ta").chunks.as_slice(), &[200_000]);
        assert_eq!(
            map.get("lwp").expect("lwp").chunks.as_slice(),
            &[4096, 64]
        );
        assert_eq!(map.get("time").expect("time").chunks.as_slice(), &[200_000]);
    }

    #[test]
    fn test_coordinate_exclusion_policy() {
        let map = build_encoding_map(
            &test_dataset(),
            &RuleTable::default(),
            &CompressionEngine::default(),
            data_variables_only,
        )
        .expect("build");

        assert_eq!(map.len(), 2);
        assert!(map.get("time").is_none());
    }

    #[test]
    fn test_error_aborts_whole_build() {
        let mut ds = test_dataset();
        ds.insert(Variable::data(
            "odd",
            [("foo", 3), ("bar", 4)],
            DataType::Float32,
        ));

        let err = build_encoding_map(
            &ds,
            &RuleTable::default(),
            &CompressionEngine::default(),
            all_variables,
        )
        .expect_err("unclassified shape");
        assert!(matches!(err, EncodingError::UnclassifiedShape { .. }));
    }

    #[test]
    fn test_text_gets_no_compressor_but_normal_chunks() {
        let ds = Dataset::from_variables([Variable::data(
            "station",
            [("time", 1000)],
            DataType::String,
        )]);
        let rules = RuleTable::new(vec![ShapeRule::exact(
            "time_series",
            [("time", AxisSizing::Elements(1 << 18))],
        )]);

        let map = build_encoding_map(
            &ds,
            &rules,
            &CompressionEngine::default(),
            all_variables,
        )
        .expect("build");

        let desc = map.get("station").expect("station");
        assert_eq!(desc.compressor, None);
        assert_eq!(desc.chunks.as_slice(), &[1000]);
    }
}
