//! Error types for the encoding policy.

use thiserror::Error;

/// Errors that can occur while deciding a dataset's encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// No rule in the table matches the variable's dimension signature.
    ///
    /// The message carries the full dimension tuple so an operator can
    /// extend the rule table instead of guessing what was rejected.
    #[error("no chunking rule matches variable {variable:?} with dimensions {dims:?}")]
    UnclassifiedShape {
        variable: String,
        dims: Vec<String>,
    },

    /// A rule resolved a chunk size of zero along some dimension.
    #[error(
        "rule {pattern:?} resolved chunk size {size} for variable {variable:?} along dimension {dimension:?}"
    )]
    InvalidChunkSize {
        variable: String,
        dimension: String,
        pattern: String,
        size: u64,
    },

    /// A rule matched but names no sizing for one of the variable's dimensions.
    #[error(
        "rule {pattern:?} has no chunk sizing for dimension {dimension:?} of variable {variable:?}"
    )]
    MissingAxisSizing {
        variable: String,
        dimension: String,
        pattern: String,
    },

    /// The rule table itself is malformed.
    #[error("invalid rule table: {0}")]
    InvalidRuleTable(String),

    /// Failed to read or parse a rule table supplied as data.
    #[error("failed to load rule table: {0}")]
    RuleTableLoad(String),
}

/// Result type for encoding policy operations.
pub type Result<T> = std::result::Result<T, EncodingError>;
