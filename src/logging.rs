// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The filter is chosen as follows:
//! 1. `--log-level` applies one level to everything.
//! 2. Otherwise `SHARDSWEEP_LOG` is read as an `EnvFilter` directive string,
//!    so both `debug` and `shardsweep::run=trace,info` work.
//! 3. Otherwise `info`.
//!
//! Everything goes to stderr. Stdout carries only the dry-run plan and the
//! sweep summary.

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "SHARDSWEEP_LOG";

impl From<LogLevel> for LevelFilter {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return EnvFilter::new(LevelFilter::from(lvl).to_string());
    }

    env_value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s.to_lowercase()).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins_over_env() {
        let filter = build_filter(Some(LogLevel::Warn), Some("trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn env_directives_are_case_insensitive() {
        let filter = build_filter(None, Some(" DEBUG "));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn unusable_env_falls_back_to_info() {
        for value in [None, Some(""), Some("shardsweep=loud")] {
            let filter = build_filter(None, value);
            assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
        }
    }
}
