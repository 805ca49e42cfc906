//! Error types for the occurrence filter.

use thiserror::Error;

/// Failures raised while extracting or evaluating an event.
///
/// None of these ever leave the filter: the fail-open wrapper turns every
/// variant into an allowed verdict carrying an error label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Retry cadence resolved to zero or a negative number.
    #[error("Configuration error: retry cadence must be positive, got {cadence}")]
    Configuration { cadence: i64 },

    /// Input field could not be coerced to an integer.
    #[error("Data error: {0}")]
    Data(String),

    /// Anything else, including a panic caught inside the rule.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
