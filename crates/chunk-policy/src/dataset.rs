//! Read-only description of a dataset's variables and dimensions.
//!
//! This is the view the policy engine consumes: per variable, its ordered
//! dimension names, their extents, and its element type. Values are never
//! part of the model — the engine decides layout from the schema alone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Element type of a variable's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    /// Variable-length text.
    String,
}

impl DataType {
    /// Fixed element size in bytes, or `None` for variable-length text.
    pub fn size_bytes(&self) -> Option<usize> {
        match self {
            Self::Int8 | Self::Uint8 => Some(1),
            Self::Int16 | Self::Uint16 => Some(2),
            Self::Int32 | Self::Uint32 | Self::Float32 => Some(4),
            Self::Int64 | Self::Uint64 | Self::Float64 => Some(8),
            Self::String => None,
        }
    }

    /// Whether this is a floating-point type.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Whether this is variable-length text.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::String)
    }

    /// Get the type tag as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
        }
    }

    /// Parse from string (case-insensitive). Returns `None` for unknown tags.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "int8" | "i1" => Some(Self::Int8),
            "int16" | "i2" => Some(Self::Int16),
            "int32" | "i4" => Some(Self::Int32),
            "int64" | "i8" => Some(Self::Int64),
            "uint8" | "u1" => Some(Self::Uint8),
            "uint16" | "u2" => Some(Self::Uint16),
            "uint32" | "u4" => Some(Self::Uint32),
            "uint64" | "u8" => Some(Self::Uint64),
            "float32" | "f4" => Some(Self::Float32),
            "float64" | "f8" => Some(Self::Float64),
            "string" | "str" => Some(Self::String),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of a variable within its dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableRole {
    /// Ordinary data variable.
    Data,
    /// Labels a dimension (time stamps, level heights) rather than holding
    /// measured data.
    Coordinate,
}

/// A named axis with its extent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub size: u64,
}

impl Dimension {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Description of one array variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// Ordered dimensions; empty for scalars.
    pub dimensions: Vec<Dimension>,
    pub dtype: DataType,
    pub role: VariableRole,
}

impl Variable {
    /// Create a data variable from (name, extent) pairs.
    pub fn data(
        name: impl Into<String>,
        dims: impl IntoIterator<Item = (impl Into<String>, u64)>,
        dtype: DataType,
    ) -> Self {
        Self {
            name: name.into(),
            dimensions: dims
                .into_iter()
                .map(|(n, s)| Dimension::new(n, s))
                .collect(),
            dtype,
            role: VariableRole::Data,
        }
    }

    /// Create a coordinate variable from (name, extent) pairs.
    pub fn coordinate(
        name: impl Into<String>,
        dims: impl IntoIterator<Item = (impl Into<String>, u64)>,
        dtype: DataType,
    ) -> Self {
        Self {
            role: VariableRole::Coordinate,
            ..Self::data(name, dims, dtype)
        }
    }

    /// Ordered dimension names.
    pub fn dim_names(&self) -> Vec<&str> {
        self.dimensions.iter().map(|d| d.name.as_str()).collect()
    }

    /// Whether the variable has no dimensions.
    pub fn is_scalar(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// An immutable schema view of a dataset: variables keyed by name.
///
/// Iteration is in name order, so anything derived from a walk over the
/// dataset is independent of construction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    variables: BTreeMap<String, Variable>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from a collection of variables.
    pub fn from_variables(vars: impl IntoIterator<Item = Variable>) -> Self {
        let mut ds = Self::new();
        for v in vars {
            ds.insert(v);
        }
        ds
    }

    /// Insert a variable, replacing any previous one with the same name.
    pub fn insert(&mut self, variable: Variable) {
        self.variables.insert(variable.name.clone(), variable);
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Iterate variables in name order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
