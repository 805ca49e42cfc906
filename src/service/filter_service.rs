//! Event filtering service.

use std::io::{self, BufRead, Read, Write};
use std::process;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cli::Format;
use crate::config::Config;
use crate::domain::{Filter, FilterError, RetryOccurrencesFilter, Verdict};
use crate::service::adapter::FormatAdapter;

/// Service for filtering events read from stdin.
pub struct FilterService {
    filter: Box<dyn Filter>,
    adapter: FormatAdapter,
}

impl FilterService {
    /// Create a new FilterService with the specified format.
    pub fn new(config: &Config, format: Format) -> Self {
        Self {
            filter: Box::new(RetryOccurrencesFilter::new(config.warn_missing_fields)),
            adapter: FormatAdapter::new(format),
        }
    }

    /// Filter a single event from stdin and exit with its decision code.
    pub fn run(&self) -> Result<()> {
        let mut input = Vec::new();
        let verdict = match io::stdin().lock().read_to_end(&mut input) {
            Ok(_) => self.process_bytes(&input),
            Err(e) => {
                warn!(error = %e, "Failed to read stdin, allowing");
                Verdict::fail_open(format!("Failed to read stdin: {}", e))
            }
        };
        let exit_code = self.adapter.exit_code(&verdict);

        let output = self.adapter.format_output(&verdict)?;
        writeln!(io::stdout().lock(), "{}", output)?;

        process::exit(exit_code);
    }

    /// Filter each stdin line as an independent event.
    pub fn run_stream(&self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        let count = self.filter_lines(stdin.lock(), &mut stdout)?;

        stdout.flush()?;
        debug!(events = count, "Stream finished");
        Ok(())
    }

    /// Write one verdict per non-blank line of `input`, returning how many were written.
    ///
    /// A read error ends the stream after reporting it as a fail-open verdict.
    pub fn filter_lines<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> Result<usize> {
        let mut count = 0usize;

        for line in input.split(b'\n') {
            let verdict = match line {
                Ok(line) if line.iter().all(u8::is_ascii_whitespace) => continue,
                Ok(line) => self.process_bytes(&line),
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin, allowing");
                    let verdict = Verdict::fail_open(format!("Failed to read stdin: {}", e));
                    writeln!(output, "{}", self.adapter.format_output(&verdict)?)?;
                    return Ok(count + 1);
                }
            };

            writeln!(output, "{}", self.adapter.format_output(&verdict)?)?;
            count += 1;
        }

        Ok(count)
    }

    /// Run the filter on one raw event and return its verdict.
    pub fn process_bytes(&self, raw: &[u8]) -> Verdict {
        match self.adapter.parse_event_bytes(raw) {
            Ok(event) => self.process_event(&event),
            Err(e) => self.unreadable(e),
        }
    }

    fn unreadable(&self, error: FilterError) -> Verdict {
        warn!(error = %error, "Unreadable event, allowing");
        Verdict::fail_open(error.to_string())
    }

    fn process_event(&self, event: &Value) -> Verdict {
        let mut verdict = None;
        self.filter.run(event, &mut |reason, decision, label| {
            verdict = Some(Verdict {
                decision,
                reason: reason.to_string(),
                error: label.map(str::to_string),
            });
        });

        let verdict =
            verdict.unwrap_or_else(|| Verdict::fail_open("filter did not emit a verdict"));
        // Fail-open verdicts are already logged by the filter
        info!(
            filter = self.filter.name(),
            status = verdict.decision.code(),
            reason = %verdict.reason,
            fail_open = verdict.is_fail_open(),
            "Verdict"
        );
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, FILTER_ERROR_LABEL};

    fn service() -> FilterService {
        FilterService::new(&Config::default(), Format::Json)
    }

    #[test]
    fn test_process_allows_retry() {
        let verdict = service()
            .process_bytes(br#"{"occurrences":10,"check":{"occurrences":3,"retry_occurrences":5}}"#);
        assert_eq!(verdict.decision, Decision::Allow);
        assert!(!verdict.is_fail_open());
    }

    #[test]
    fn test_process_suppresses_off_cadence() {
        let verdict = service()
            .process_bytes(br#"{"occurrences":7,"check":{"occurrences":3,"retry_occurrences":5}}"#);
        assert_eq!(verdict.decision, Decision::Suppress);
    }

    #[test]
    fn test_process_invalid_json_fails_open() {
        let verdict = service().process_bytes(b"{\"occurrences\":");
        assert_eq!(verdict.decision, Decision::Allow);
        assert_eq!(verdict.error.as_deref(), Some(FILTER_ERROR_LABEL));
    }

    #[test]
    fn test_process_empty_input_fails_open() {
        let verdict = service().process_bytes(b"");
        assert_eq!(verdict.decision, Decision::Allow);
        assert!(verdict.reason.contains("No input"));
    }

    #[test]
    fn test_process_invalid_utf8_fails_open() {
        let verdict = service().process_bytes(b"{\"occurrences\":\"\xff\"}");
        assert_eq!(verdict.decision, Decision::Allow);
        assert_eq!(verdict.error.as_deref(), Some(FILTER_ERROR_LABEL));
        assert!(verdict.reason.contains("UTF-8"));
    }

    #[test]
    fn test_stream_continues_after_invalid_utf8_line() {
        let input: &[u8] = b"{\"occurrences\":3,\"check\":{\"occurrences\":3}}\n\xff\xfe\n\n{\"occurrences\":7,\"check\":{\"occurrences\":3,\"retry_occurrences\":5}}\n";
        let mut output = Vec::new();

        let count = service().filter_lines(input, &mut output).unwrap();

        assert_eq!(count, 3);
        let lines: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["status"], 1);
        assert_eq!(lines[1]["status"], 1);
        assert_eq!(lines[1]["error"], FILTER_ERROR_LABEL);
        assert_eq!(lines[2]["status"], 0);
    }
}
