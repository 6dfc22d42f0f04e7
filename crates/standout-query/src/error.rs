//! Error types for the query crate.
//!
//! Only strict compilation and JSON parsing produce errors. The lenient entry
//! points degrade malformed input into non-matching predicates instead.

use thiserror::Error;

/// Errors that can occur when compiling a condition in strict mode.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid regular expression pattern in a `$match` operand.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A logical operator was given something other than a sequence.
    #[error("'{key}' expects a sequence of conditions, got {found}")]
    ExpectedSequence {
        key: &'static str,
        found: &'static str,
    },

    /// A logical operator branch is not a condition document.
    #[error("'{key}' branch {index} is not a condition document, got {found}")]
    InvalidBranch {
        key: &'static str,
        index: usize,
        found: &'static str,
    },

    /// The condition itself is not a record.
    #[error("condition must be a record, got {found}")]
    InvalidCondition { found: &'static str },

    /// Operand has the wrong shape for its operator.
    #[error("operator '{op}' expects {expected}, got {found}")]
    InvalidOperand {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A `$`-prefixed key inside an operator condition is not a known operator.
    #[error("unknown operator '{key}'")]
    UnknownOperator { key: String },

    /// Condition or item text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
