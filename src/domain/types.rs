//! Core domain types for occurrence filtering.

use serde::Serialize;

/// Error label attached to every fail-open verdict.
pub const FILTER_ERROR_LABEL: &str = "check_retry_occurrences filter error";

/// Occurrence counters extracted from an event and its check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Occurrences {
    /// How many consecutive times the condition has been observed
    pub event: i64,

    /// Threshold of the first notification
    pub check: i64,

    /// Re-notification cadence (zero means "use `check`")
    pub retry: i64,
}

impl Occurrences {
    pub fn new(event: i64, check: i64, retry: i64) -> Self {
        Self {
            event,
            check,
            retry,
        }
    }
}

/// Filtering decision.
///
/// The numeric codes are a stable contract with the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Stop processing the event
    Suppress,
    /// Pass the event on to the handlers
    Allow,
}

impl Decision {
    /// Get the dispatcher code for this decision.
    ///
    /// - Suppress: 0
    /// - Allow: 1
    pub fn code(self) -> i32 {
        match self {
            Decision::Suppress => 0,
            Decision::Allow => 1,
        }
    }
}

/// Result of running the filter on one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,
    pub reason: String,
    /// Present only when the filter failed open
    pub error: Option<String>,
}

impl Verdict {
    /// Verdict produced by the decision rule.
    pub fn decided(decision: Decision, reason: impl Into<String>) -> Self {
        Self {
            decision,
            reason: reason.into(),
            error: None,
        }
    }

    /// Fallback verdict used when the filter itself failed.
    pub fn fail_open(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Allow,
            reason: reason.into(),
            error: Some(FILTER_ERROR_LABEL.to_string()),
        }
    }

    pub fn is_fail_open(&self) -> bool {
        self.error.is_some()
    }

    /// Convert verdict to its wire representation.
    pub fn to_output(&self) -> VerdictOutput {
        VerdictOutput {
            status: self.decision.code(),
            reason: self.reason.clone(),
            error: self.error.clone(),
        }
    }
}

/// Verdict as written to stdout.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictOutput {
    /// 0 = suppress, 1 = allow
    pub status: i32,

    pub reason: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
