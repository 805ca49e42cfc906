//! Retry occurrences filter implementation.

use serde_json::Value;
use tracing::{debug, warn};

use super::Filter;
use crate::domain::extract::extract;
use crate::domain::rule::evaluate;
use crate::domain::{Decision, FilterError};

pub const FILTER_NAME: &str = "check_retry_occurrences";

pub const FILTER_DESCRIPTION: &str = "Evaluates the event 'occurrences' field against a check's \
    'occurrences' or 'retry_occurrences' fields. Allows the event if its occurrences equal the \
    check's 'occurrences' or are divisible by 'retry_occurrences' (falling back to the check's \
    'occurrences' when no retry cadence is set).";

/// Filter notifying on the first qualifying occurrence and on the retry cadence.
pub struct RetryOccurrencesFilter {
    warn_missing_fields: bool,
}

impl RetryOccurrencesFilter {
    /// Create a new filter.
    ///
    /// With `warn_missing_fields`, counters absent from the event are logged
    /// as data-quality warnings before being treated as zero.
    pub fn new(warn_missing_fields: bool) -> Self {
        Self {
            warn_missing_fields,
        }
    }
}

impl Default for RetryOccurrencesFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Filter for RetryOccurrencesFilter {
    fn name(&self) -> &'static str {
        FILTER_NAME
    }

    fn description(&self) -> &'static str {
        FILTER_DESCRIPTION
    }

    fn evaluate(&self, event: &Value) -> Result<(Decision, String), FilterError> {
        let extracted = extract(event)?;

        if self.warn_missing_fields && !extracted.missing.is_empty() {
            warn!(
                missing = ?extracted.missing,
                "Occurrence fields missing from event, treating as 0"
            );
        }

        let occurrences = extracted.occurrences;
        let (decision, reason) = evaluate(&occurrences)?;

        debug!(
            event = occurrences.event,
            check = occurrences.check,
            retry = occurrences.retry,
            decision = decision.code(),
            "Evaluated retry occurrences"
        );

        Ok((decision, reason.to_string()))
    }
}
