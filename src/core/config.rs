//! Runtime configuration loaded from environment variables.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add DEACTIVATE_UNDELIVERED delivery policy flag
//! - 1.0.0: Initial creation with data dir, log level and tick interval

use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

/// Upper bound on the scheduler tick, in seconds.
///
/// Due-minute matching only fires each occurrence when at least one tick
/// lands inside every calendar minute, so the tick must never exceed 60s.
pub const MAX_TICK_INTERVAL_SECS: u64 = 60;

/// Default scheduler tick, in seconds.
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 30;

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `reminders.json` and `users.json`.
    pub data_dir: String,
    /// Default log filter when RUST_LOG is not set.
    pub log_level: String,
    /// Scheduler sweep interval.
    pub tick_interval: Duration,
    /// Whether a one-shot reminder is deactivated even when its dispatch
    /// failed. `true` matches the historical behavior; `false` keeps the
    /// reminder active for another delivery attempt.
    pub deactivate_undelivered: bool,
}

impl Config {
    /// Load configuration from the environment, applying defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let tick_interval = parse_tick_interval(env::var("TICK_INTERVAL_SECS").ok().as_deref())?;
        let deactivate_undelivered =
            parse_bool("DEACTIVATE_UNDELIVERED", env::var("DEACTIVATE_UNDELIVERED").ok().as_deref(), true)?;

        Ok(Config {
            data_dir,
            log_level,
            tick_interval,
            deactivate_undelivered,
        })
    }
}

fn parse_tick_interval(raw: Option<&str>) -> Result<Duration> {
    let secs = match raw {
        None => DEFAULT_TICK_INTERVAL_SECS,
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow!("TICK_INTERVAL_SECS must be a whole number of seconds (got {value:?})"))?,
    };

    if secs == 0 || secs > MAX_TICK_INTERVAL_SECS {
        return Err(anyhow!(
            "TICK_INTERVAL_SECS must be between 1 and {MAX_TICK_INTERVAL_SECS} (got {secs})"
        ));
    }

    Ok(Duration::from_secs(secs))
}

fn parse_bool(name: &str, raw: Option<&str>, default: bool) -> Result<bool> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(anyhow!("{name} must be true or false (got {other:?})")),
        },
    }
}
