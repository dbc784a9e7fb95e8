//! Error types for the rules crate.
//!
//! Evaluation itself never fails; errors only come from parsing persisted
//! rule groups, filter modes and query strings.

use thiserror::Error;

/// Errors that can occur when loading filters.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The rule group JSON could not be parsed.
    #[error("invalid rule group JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A filter mode other than `and`, `or` or `single`.
    #[error("unknown filter mode '{0}'")]
    UnknownFilterMode(String),

    /// A facet dimension key that no dimension answers to.
    #[error("unknown facet field '{0}'")]
    UnknownFacetField(String),
}

/// Result type for rules operations.
pub type Result<T> = std::result::Result<T, RulesError>;
