//! Error types for filter and sort compilation.
//!
//! All errors are returned to the immediate caller; the compiler never logs
//! and swallows a failure. Missing parameters, empty `IN` lists and
//! malformed dates are silent skips, not errors (see the builder modules).

use crate::criteria::Criteria;
use std::fmt;

/// Error type for filter/sort compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The model schema declaration is invalid (builder time)
    Schema { message: String },
    /// A BETWEEN value did not split into exactly two non-empty parts
    MalformedRange { field: String },
    /// An unrecognized criteria token was supplied
    UnknownCriteria { token: String, field: String },
    /// A column is not declared by the model schema (emitter allow-list)
    UnknownColumn { column: String },
    /// A map entry's value shape does not match its criteria
    ValueShape { column: String, criteria: Criteria },
}

impl FilterError {
    /// Whether this error was caused by request input, as opposed to a
    /// misdeclared schema or a hand-assembled map that bypassed it.
    ///
    /// HTTP handlers use this to pick between a 400 and a 500 response.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FilterError::MalformedRange { .. } | FilterError::UnknownCriteria { .. }
        )
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Schema { message } => {
                write!(f, "Invalid model schema: {message}")
            }
            FilterError::MalformedRange { field } => {
                write!(
                    f,
                    "BETWEEN filter requires two values separated by '-' for field {field}"
                )
            }
            FilterError::UnknownCriteria { token, field } => {
                write!(f, "Unknown filter criteria '{token}' for field {field}")
            }
            FilterError::UnknownColumn { column } => {
                write!(f, "Column not declared by the model schema: {column}")
            }
            FilterError::ValueShape { column, criteria } => {
                write!(
                    f,
                    "Filter value for column {column} does not match criteria {}",
                    criteria.as_token()
                )
            }
        }
    }
}

impl std::error::Error for FilterError {}
