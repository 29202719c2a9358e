//! Chunk sizing primitives.
//!
//! An [`AxisSizing`] states how one axis of a variable is split into
//! chunks; a [`ChunkSpec`] is the resolved result, one concrete chunk
//! length per dimension in order.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Chunk sizing directive for a single axis.
///
/// In rule tables supplied as data, a literal target is written as a
/// positive integer and the whole-axis directive as `-1` or `full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSizing {
    /// Target chunk length along the axis, clamped to the extent.
    Elements(u64),
    /// One chunk spanning the whole axis.
    FullExtent,
}

impl AxisSizing {
    /// Resolve against the actual extent of the axis.
    ///
    /// Literal targets larger than the extent collapse to a single chunk
    /// of the full extent; a chunk longer than the axis is never produced.
    pub fn resolve(&self, extent: u64) -> u64 {
        match self {
            Self::Elements(n) => (*n).min(extent),
            Self::FullExtent => extent,
        }
    }
}

impl Serialize for AxisSizing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Elements(n) => serializer.serialize_u64(*n),
            Self::FullExtent => serializer.serialize_i64(-1),
        }
    }
}

impl<'de> Deserialize<'de> for AxisSizing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) if n > 0 => Ok(Self::Elements(n as u64)),
            Raw::Int(-1) => Ok(Self::FullExtent),
            Raw::Int(n) => Err(D::Error::custom(format!(
                "chunk sizing must be a positive integer, -1, or \"full\", got {n}"
            ))),
            Raw::Str(s) if s.eq_ignore_ascii_case("full") => Ok(Self::FullExtent),
            Raw::Str(s) => Err(D::Error::custom(format!(
                "chunk sizing must be a positive integer, -1, or \"full\", got {s:?}"
            ))),
        }
    }
}

/// Concrete chunk lengths for one variable, in dimension order.
///
/// Empty for scalar variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkSpec(Vec<u64>);

impl ChunkSpec {
    /// The empty chunk shape of a scalar variable.
    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    pub fn new(sizes: Vec<u64>) -> Self {
        Self(sizes)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u64>> for ChunkSpec {
    fn from(sizes: Vec<u64>) -> Self {
        Self(sizes)
    }
}
