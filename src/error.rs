//! Error types for pattern profiling

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by [`Profiler::profile`](crate::Profiler::profile) and
/// its dynamic-input adapter.
///
/// Validation happens before any pattern is synthesized; a failure here
/// means no partial profile was constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileError {
    /// No values were provided
    #[error("no values provided for profiling")]
    EmptyInput,

    /// The dynamic input contained elements that are not strings
    #[error("input contains non-string values")]
    NonStringValues,

    /// The dynamic input is not a list of values
    #[error("input is not a list of values")]
    NotAList,
}

/// Errors surfaced by [`Profile::validate`](crate::Profile::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidateError {
    /// The value matched none of the discovered patterns
    #[error("value does not match any discovered pattern")]
    NoMatch,
}
