//! Diagnostic log setup
//!
//! The report owns stdout, so `tracing` diagnostics are written to stderr
//! and filtered to this crate.

use anyhow::{anyhow, bail, Result};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Verbosity of stderr diagnostics, quietest first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level from an explicit setting, else from the `--verbose` flag
    pub fn resolve(setting: Option<&str>, verbose: bool) -> Result<Self> {
        match setting {
            Some(value) => value.parse(),
            None if verbose => Ok(LogLevel::Debug),
            None => Ok(LogLevel::default()),
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            other => bail!("Unknown log level: {other}"),
        })
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

fn directive(level: LogLevel) -> String {
    format!("{}={}", env!("CARGO_CRATE_NAME"), LevelFilter::from(level))
}

/// Install the global stderr subscriber
pub fn init_logger(level: LogLevel) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!(" DEBUG ".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);

        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown log level: loud");
    }

    #[test]
    fn test_resolve_prefers_explicit_setting() {
        assert_eq!(LogLevel::resolve(Some("error"), true).unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::resolve(None, true).unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::resolve(None, false).unwrap(), LogLevel::Warn);
        assert!(LogLevel::resolve(Some("chatty"), false).is_err());
    }

    #[test]
    fn test_levels_order_by_verbosity() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Debug < LogLevel::Trace);
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
    }

    #[test]
    fn test_directive_targets_this_crate() {
        assert_eq!(directive(LogLevel::Info), "growl_reporter=info");
        assert_eq!(directive(LogLevel::Warn), "growl_reporter=warn");
    }
}
