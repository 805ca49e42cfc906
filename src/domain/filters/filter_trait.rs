//! Filter trait definition.

use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;
use tracing::warn;

use crate::domain::{Decision, FilterError, Verdict};

/// Receives `(reason, decision, error_label)` once per event.
pub type Emit<'a> = dyn FnMut(&str, Decision, Option<&str>) + 'a;

/// Trait for event filters registered with the pipeline.
pub trait Filter: Send + Sync {
    /// Stable identifier used for discovery.
    fn name(&self) -> &'static str;

    /// Human-readable summary of what the filter does.
    fn description(&self) -> &'static str;

    /// Evaluate one event. Errors are contained by [`Filter::run`].
    fn evaluate(&self, event: &Value) -> Result<(Decision, String), FilterError>;

    /// Evaluate the event and report the verdict through `emit`.
    ///
    /// Never fails: errors and panics from [`Filter::evaluate`] become an
    /// allowed verdict carrying an error label.
    fn run(&self, event: &Value, emit: &mut Emit<'_>) {
        let verdict = self.verdict(event);
        emit(&verdict.reason, verdict.decision, verdict.error.as_deref());
    }

    /// Same as [`Filter::run`], returning the verdict instead of emitting it.
    fn verdict(&self, event: &Value) -> Verdict {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(event)))
            .unwrap_or_else(|payload| Err(FilterError::Unexpected(panic_message(&*payload))));

        match outcome {
            Ok((decision, reason)) => Verdict::decided(decision, reason),
            Err(e) => {
                warn!(filter = self.name(), error = %e, "Filter failed, allowing event");
                Verdict::fail_open(e.to_string())
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "filter panicked".to_string()
    }
}
