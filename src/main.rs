//! check-retry-occurrences: retry occurrences filter for monitoring pipelines
//!
//! Decides whether a monitoring event reaches the notification handlers:
//! on the check's first qualifying occurrence, then only on occurrences that
//! line up with the retry cadence. Fails open when the event cannot be read.

mod cli;
mod config;
mod domain;
mod service;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use config::{Config, ConfigService};
use domain::{Filter, RetryOccurrencesFilter};
use service::FilterService;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // `filter` always emits a verdict; setup failures fall back to defaults
    let filtering = matches!(cli.command, Commands::Filter { .. });

    let config = match ConfigService::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if filtering => {
            eprintln!("Using default configuration: {:#}", e);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    if cli.debug || config.debug {
        if let Err(e) = domain::logger::init(&config) {
            if !filtering {
                return Err(e);
            }
            eprintln!("Logging disabled: {:#}", e);
        }
    }

    match cli.command {
        Commands::Filter { format, stream } => {
            let format = format.unwrap_or(config.default_format);
            let service = FilterService::new(&config, format);
            if stream {
                service.run_stream()?;
            } else {
                service.run()?;
            }
        }
        Commands::Describe => {
            let filter = RetryOccurrencesFilter::new(config.warn_missing_fields);
            println!("{}", filter.name());
            println!("{}", filter.description());
        }
        Commands::Init { path } => {
            let config_path = if let Some(p) = path {
                ConfigService::generate_at(&p)?;
                p
            } else {
                ConfigService::generate_default()?;
                ConfigService::default_path()
            };
            if !cli.quiet {
                eprintln!("Configuration file created at: {}", config_path.display());
            }
        }
        Commands::Check => {
            config::validate(&config)?;
            if !cli.quiet {
                eprintln!("Configuration is valid.");
            }
        }
        Commands::Version => {
            println!("check-retry-occurrences {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
