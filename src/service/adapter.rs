//! Format adapter between stdin/stdout and domain types.

use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::debug;

use crate::cli::Format;
use crate::domain::{FilterError, Verdict};

/// Adapter for converting between wire text and internal types.
pub struct FormatAdapter {
    format: Format,
}

impl FormatAdapter {
    /// Create a new adapter for the specified output format.
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    /// Parse one raw event.
    ///
    /// Parse failures are data errors and follow the fail-open path.
    pub fn parse_event(&self, input: &str) -> Result<Value, FilterError> {
        debug!(raw_input = %input, "Raw event");

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FilterError::Data("No input received from stdin".to_string()));
        }

        serde_json::from_str(trimmed)
            .map_err(|e| FilterError::Data(format!("Failed to parse event: {}", e)))
    }

    /// Parse one raw event given as bytes.
    ///
    /// Input that is not valid UTF-8 is a data error like any other
    /// unreadable event.
    pub fn parse_event_bytes(&self, input: &[u8]) -> Result<Value, FilterError> {
        let text = std::str::from_utf8(input)
            .map_err(|e| FilterError::Data(format!("Event is not valid UTF-8: {}", e)))?;
        self.parse_event(text)
    }

    /// Format a verdict for stdout.
    pub fn format_output(&self, verdict: &Verdict) -> Result<String> {
        match self.format {
            Format::Json => serde_json::to_string(&verdict.to_output())
                .map_err(|e| anyhow!("Failed to serialize output: {}", e)),
            Format::Text => Ok(match &verdict.error {
                Some(label) => format!("[{}] {}", label, verdict.reason),
                None => verdict.reason.clone(),
            }),
        }
    }

    /// Get the process exit code for the verdict.
    pub fn exit_code(&self, verdict: &Verdict) -> i32 {
        verdict.decision.code()
    }
}
