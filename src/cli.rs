//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

/// Retry occurrences filter for monitoring event pipelines
#[derive(Parser)]
#[command(
    name = "check-retry-occurrences",
    version,
    about = "Retry occurrences filter for monitoring event pipelines",
    long_about = "Reads a monitoring event from stdin and decides whether it should reach \
                  the notification handlers: on the check's first qualifying occurrence and \
                  then every retry_occurrences occurrences. Exits 1 to allow, 0 to suppress."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Verdict output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One JSON object per verdict (default)
    #[default]
    Json,
    /// Reason only, prefixed with the error label on fail-open
    Text,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Filter events read from stdin (alias: run)
    #[command(alias = "run")]
    Filter {
        /// Output format (defaults to `default_format` from config)
        #[arg(long, short = 'f')]
        format: Option<Format>,

        /// Treat each stdin line as a separate event
        #[arg(long, short = 's')]
        stream: bool,
    },
    /// Print the filter name and description
    Describe,
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },
    /// Validate configuration file
    Check,
    /// Display version information
    Version,
}
