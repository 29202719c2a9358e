//! Dimension-signature rules.
//!
//! A [`RuleTable`] is an ordered list of [`ShapeRule`]s evaluated top to
//! bottom; the first rule whose pattern matches a variable's dimension
//! names wins and supplies the per-axis chunk sizing. There is no implicit
//! default: a variable no rule matches is an error, because a guessed
//! chunking silently degenerates into one-chunk-per-array layouts.
//!
//! Tables are plain data. They can be built in code or loaded from YAML:
//!
//! ```yaml
//! rules:
//!   - name: time_series
//!     match: { exact: [time] }
//!     chunks: { time: 262144 }
//!   - name: time_ancillary
//!     match: { prefix: [time] }
//!     chunks: { time: 262144 }
//!     rest: full
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chunks::{AxisSizing, ChunkSpec};
use crate::dataset::Variable;
use crate::error::{EncodingError, Result};

/// Pattern matched against a variable's ordered dimension names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimMatcher {
    /// Exact ordered sequence of dimension names.
    Exact(Vec<String>),
    /// Fixed leading names; any trailing dimensions are accepted.
    Prefix(Vec<String>),
    /// Any single dimension, whatever its name.
    AnySingle,
}

impl DimMatcher {
    /// Whether the ordered dimension names satisfy this pattern.
    pub fn matches(&self, dims: &[&str]) -> bool {
        match self {
            Self::Exact(names) => {
                names.len() == dims.len() && names.iter().zip(dims).all(|(a, b)| a == b)
            }
            Self::Prefix(names) => {
                dims.len() >= names.len() && names.iter().zip(dims).all(|(a, b)| a == b)
            }
            Self::AnySingle => dims.len() == 1,
        }
    }
}

/// A named shape pattern together with its chunk sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRule {
    name: String,
    #[serde(rename = "match")]
    matcher: DimMatcher,
    /// Sizing per dimension name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    chunks: BTreeMap<String, AxisSizing>,
    /// Sizing for dimensions `chunks` does not name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rest: Option<AxisSizing>,
}

impl ShapeRule {
    /// Rule matching an exact dimension tuple, sized per dimension.
    ///
    /// The matcher is built from the pair order, so
    /// `ShapeRule::exact("th", [("time", ...), ("height", ...)])` matches
    /// `("time", "height")` and nothing else.
    pub fn exact(
        name: impl Into<String>,
        sizing: impl IntoIterator<Item = (impl Into<String>, AxisSizing)>,
    ) -> Self {
        let mut dims = Vec::new();
        let mut chunks = BTreeMap::new();
        for (dim, s) in sizing {
            let dim = dim.into();
            dims.push(dim.clone());
            chunks.insert(dim, s);
        }
        Self {
            name: name.into(),
            matcher: DimMatcher::Exact(dims),
            chunks,
            rest: None,
        }
    }

    /// Rule matching a fixed dimension prefix with arbitrary trailing axes.
    ///
    /// `sizing` may name trailing dimensions beyond the prefix; anything
    /// it does not name falls back to the `rest` sizing, if set.
    pub fn prefix(
        name: impl Into<String>,
        prefix: impl IntoIterator<Item = impl Into<String>>,
        sizing: impl IntoIterator<Item = (impl Into<String>, AxisSizing)>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: DimMatcher::Prefix(prefix.into_iter().map(Into::into).collect()),
            chunks: sizing
                .into_iter()
                .map(|(dim, s)| (dim.into(), s))
                .collect(),
            rest: None,
        }
    }

    /// Rule matching any one-dimensional variable regardless of its
    /// dimension name.
    pub fn any_single(name: impl Into<String>, sizing: AxisSizing) -> Self {
        Self {
            name: name.into(),
            matcher: DimMatcher::AnySingle,
            chunks: BTreeMap::new(),
            rest: Some(sizing),
        }
    }

    /// Set the sizing used for dimensions the sizing map does not name.
    pub fn with_rest(mut self, sizing: AxisSizing) -> Self {
        self.rest = Some(sizing);
        self
    }

    /// Pattern identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matcher(&self) -> &DimMatcher {
        &self.matcher
    }

    /// Whether this rule matches the variable's dimension signature.
    pub fn matches(&self, variable: &Variable) -> bool {
        self.matcher.matches(&variable.dim_names())
    }

    /// Compute the concrete chunk shape for a variable this rule matched.
    ///
    /// Literal targets are clamped to each dimension's extent. A dimension
    /// with neither a named sizing nor a `rest` fallback is a rule-table
    /// gap and fails with the dimension spelled out.
    pub fn resolve(&self, variable: &Variable) -> Result<ChunkSpec> {
        let mut sizes = Vec::with_capacity(variable.dimensions.len());
        for dim in &variable.dimensions {
            let sizing = self.chunks.get(&dim.name).copied().or(self.rest).ok_or_else(|| {
                EncodingError::MissingAxisSizing {
                    variable: variable.name.clone(),
                    dimension: dim.name.clone(),
                    pattern: self.name.clone(),
                }
            })?;

            let size = sizing.resolve(dim.size);
            if size == 0 {
                return Err(EncodingError::InvalidChunkSize {
                    variable: variable.name.clone(),
                    dimension: dim.name.clone(),
                    pattern: self.name.clone(),
                    size,
                });
            }
            sizes.push(size);
        }
        Ok(ChunkSpec::new(sizes))
    }
}

/// Ordered, first-match-wins table of shape rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    rules: Vec<ShapeRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<ShapeRule>) -> Self {
        Self { rules }
    }

    /// Parse a table from YAML and validate it.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let table: Self = serde_yaml::from_str(text)
            .map_err(|e| EncodingError::RuleTableLoad(e.to_string()))?;
        table.validate()?;
        debug!("loaded rule table with {} rules", table.rules.len());
        Ok(table)
    }

    /// Load a table from a YAML file and validate it.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            EncodingError::RuleTableLoad(format!("{}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Check the table for defects that would only surface mid-build:
    /// duplicate pattern names, zero-valued literal sizings, and exact
    /// rules that cannot size one of their own dimensions.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::BTreeSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name.as_str()) {
                return Err(EncodingError::InvalidRuleTable(format!(
                    "duplicate pattern name {:?}",
                    rule.name
                )));
            }

            let zero = rule
                .chunks
                .iter()
                .find(|(_, s)| **s == AxisSizing::Elements(0))
                .map(|(dim, _)| dim.clone())
                .or_else(|| {
                    (rule.rest == Some(AxisSizing::Elements(0))).then(|| "rest".to_string())
                });
            if let Some(dim) = zero {
                return Err(EncodingError::InvalidRuleTable(format!(
                    "rule {:?} sizes {dim:?} at zero elements",
                    rule.name
                )));
            }

            if let DimMatcher::Exact(dims) = &rule.matcher {
                if rule.rest.is_none() {
                    if let Some(dim) = dims.iter().find(|d| !rule.chunks.contains_key(*d)) {
                        return Err(EncodingError::InvalidRuleTable(format!(
                            "rule {:?} matches dimension {dim:?} but has no sizing for it",
                            rule.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Find the first rule matching the variable's dimension signature.
    ///
    /// Fails with the variable name and its full dimension tuple when no
    /// rule matches, so the table can be extended for the new signature.
    pub fn classify(&self, variable: &Variable) -> Result<&ShapeRule> {
        let dims = variable.dim_names();
        for rule in &self.rules {
            if rule.matcher.matches(&dims) {
                debug!(
                    "variable {:?} with dimensions {:?} matches pattern {:?}",
                    variable.name, dims, rule.name
                );
                return Ok(rule);
            }
        }
        Err(EncodingError::UnclassifiedShape {
            variable: variable.name.clone(),
            dims: dims.into_iter().map(String::from).collect(),
        })
    }

    /// Classify and resolve in one step.
    ///
    /// Scalar variables resolve to the empty chunk shape without
    /// consulting the table.
    pub fn resolve(&self, variable: &Variable) -> Result<ChunkSpec> {
        if variable.is_scalar() {
            return Ok(ChunkSpec::scalar());
        }
        self.classify(variable)?.resolve(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    /// The sizing shared by most of the campaign converters: long
    /// time-series axes split at 2^18 samples, time-by-height profiles at
    /// 2^12 by 64, and any other single bounded axis kept as one chunk.
    fn default() -> Self {
        Self::new(vec![
            ShapeRule::exact("time_series", [("time", AxisSizing::Elements(1 << 18))]),
            ShapeRule::exact(
                "time_height",
                [
                    ("time", AxisSizing::Elements(1 << 12)),
                    ("height", AxisSizing::Elements(1 << 6)),
                ],
            ),
            ShapeRule::any_single("single_axis", AxisSizing::FullExtent),
        ])
    }
}
