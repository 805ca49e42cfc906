//! Retry occurrence decision rule.

use super::error::FilterError;
use super::types::{Decision, Occurrences};

pub const REASON_MATCHES_CHECK: &str = "event occurrences matches check occurrences";
pub const REASON_MATCHES_RETRY: &str = "event occurrences matches retry occurrences";
pub const REASON_NO_MATCH: &str = "event occurrences does not match check or retry occurrences";

/// Cadence used once the first notification has gone out.
///
/// Falls back to the check threshold when no positive retry cadence is set.
pub fn effective_cadence(occurrences: &Occurrences) -> i64 {
    if occurrences.retry > 0 {
        occurrences.retry
    } else {
        occurrences.check
    }
}

/// Decide whether an event reaches the handlers.
///
/// The check threshold is tested before the cadence, so the first
/// notification is allowed even when it is not a multiple of the cadence.
pub fn evaluate(occurrences: &Occurrences) -> Result<(Decision, &'static str), FilterError> {
    if occurrences.event == occurrences.check {
        return Ok((Decision::Allow, REASON_MATCHES_CHECK));
    }

    let cadence = effective_cadence(occurrences);
    if cadence <= 0 {
        return Err(FilterError::Configuration { cadence });
    }

    if occurrences.event % cadence == 0 {
        Ok((Decision::Allow, REASON_MATCHES_RETRY))
    } else {
        Ok((Decision::Suppress, REASON_NO_MATCH))
    }
}
