//! Domain layer containing core business logic.
//!
//! This module contains:
//! - Occurrence and verdict types
//! - Boundary adapter from JSON events to typed counters
//! - The retry occurrence decision rule
//! - Filter trait with fail-open containment
//! - Logger with rotation

mod error;
pub mod extract;
pub mod filters;
pub mod logger;
pub mod rule;
mod types;

pub use error::FilterError;
pub use filters::{Filter, RetryOccurrencesFilter};
pub use types::{Decision, Verdict};

#[allow(unused)]
pub use types::{Occurrences, VerdictOutput, FILTER_ERROR_LABEL};
