//! Configuration validation.

use anyhow::{bail, Result};

use super::Config;

/// Ten years.
pub const MAX_LOG_RETENTION_DAYS: u64 = 3650;

/// Validate configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.log_path.to_string_lossy().contains('\0') {
        bail!("Invalid log_path: contains null character");
    }

    if config.debug && config.log_path.as_os_str().is_empty() {
        bail!("log_path cannot be empty when debug logging is enabled");
    }

    if config.log_retention_days == 0 {
        bail!("log_retention_days must be at least 1");
    }

    if config.log_retention_days > MAX_LOG_RETENTION_DAYS {
        bail!(
            "log_retention_days must be at most {}, got {}",
            MAX_LOG_RETENTION_DAYS,
            config.log_retention_days
        );
    }

    Ok(())
}
