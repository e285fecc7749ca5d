//! Logging configuration

use crate::logging::LogFormat;
use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Env: FS_LOG_LEVEL
    pub level: String,
    /// `human` or `json`
    /// Env: FS_LOG_FORMAT
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "human".to_string() }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("FS_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("FS_LOG_FORMAT") {
            self.format = format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.level.parse::<log::LevelFilter>().is_err() {
            bail!("Invalid logging.level: '{}' (expected off, error, warn, info, debug or trace)", self.level);
        }
        self.log_format()?;
        Ok(())
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }

    pub fn log_format(&self) -> Result<LogFormat> {
        self.format.parse().map_err(|e| anyhow!("Invalid logging.format: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(LoggingConfig::default().validate().is_ok());

        let cfg = LoggingConfig { level: "loud".into(), ..Default::default() };
        assert!(cfg.validate().unwrap_err().to_string().contains("logging.level"));

        let cfg = LoggingConfig { format: "xml".into(), ..Default::default() };
        assert!(cfg.validate().unwrap_err().to_string().contains("logging.format"));
    }
}
