//! Logging setup
//!
//! All crate code logs through the standard `log` macros (`info!`, `debug!`,
//! `error!`). [`init_logging`] installs an `env_logger` backend once, with
//! either human-readable or JSON lines.
//!
//! # Example
//!
//! ```rust,no_run
//! use formstore_core::config::LoggingConfig;
//!
//! formstore_core::logging::init_logging(&LoggingConfig::default()).unwrap();
//! log::info!("Server starting on port {}", 8080);
//! ```
//!
//! `RUST_LOG` still overrides per-module filters on top of the configured
//! level.

use crate::config::LoggingConfig;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// How log lines are rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Example: 2024-01-15 10:30:00.123 INFO  [formstore_core::app] Server listening
    Human,
    /// Example: {"level":"INFO","message":"Server listening","target":"formstore_core::app","timestamp":"..."}
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected human or json)", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Render one log line
pub fn format_line(
    format: LogFormat,
    timestamp: chrono::DateTime<chrono::Utc>,
    level: log::Level,
    target: &str,
    message: &str,
) -> String {
    match format {
        LogFormat::Human => format!(
            "{} {:5} [{}] {}",
            timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            level.as_str(),
            target,
            message
        ),
        LogFormat::Json => serde_json::json!({
            "timestamp": timestamp.to_rfc3339(),
            "level": level.as_str(),
            "target": target,
            "message": message,
        })
        .to_string(),
    }
}

/// Initialize the global logger
///
/// Safe to call more than once; only the first call takes effect. Fails on an
/// unknown format name.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let format = config.log_format()?;
    let level = config.level_filter();

    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(level);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder.format(move |buf, record| {
            let line = format_line(
                format,
                chrono::Utc::now(),
                record.level(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{}", line)
        });
        // another logger may already be installed by the host application
        let _ = builder.try_init();
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("human".parse::<LogFormat>(), Ok(LogFormat::Human));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_human_line() {
        let ts = chrono::Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let line = format_line(LogFormat::Human, ts, log::Level::Info, "formstore_core::app", "listening");
        assert_eq!(line, "2024-01-15 10:30:00.000 INFO  [formstore_core::app] listening");
    }

    #[test]
    fn test_json_line() {
        let ts = chrono::Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let line = format_line(LogFormat::Json, ts, log::Level::Error, "t", "boom \"quoted\"");
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["message"], "boom \"quoted\"");
    }

    #[test]
    fn test_init_twice_is_fine() {
        let config = LoggingConfig::default();
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_ok());
    }
}
