//! Serializable run configuration.
//!
//! Loaded from an optional TOML file. Every field has a default, so an empty
//! file (or no file at all) reproduces the classic setup: QQQ, Friday closes,
//! 14-week Wilder RSI over a one-year window, history in `mode.json`.
//!
//! The classifier thresholds are deliberately absent: they are constants in
//! `weekmode_core::classifier`.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use weekmode_core::data::TrailingWindow;
use weekmode_core::RsiSmoothing;

use crate::store::WritePolicy;

/// Longest accepted trailing window, in calendar days (about a century).
pub const MAX_TRAILING_DAYS: u32 = 36_500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration of a weekly mode run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WeekModeConfig {
    /// Instrument whose RSI drives the mode.
    pub symbol: String,

    /// Weekday whose close represents the week.
    pub weekday: Weekday,

    /// RSI look-back in weekly samples.
    pub rsi_period: usize,

    /// Averaging method after the RSI seed window.
    pub smoothing: RsiSmoothing,

    /// Calendar days of daily history fetched, ending today.
    pub trailing_days: u32,

    /// Path of the JSON mode history.
    pub store_path: PathBuf,

    /// What to do with records whose date is already stored.
    pub write_policy: WritePolicy,
}

impl Default for WeekModeConfig {
    fn default() -> Self {
        Self {
            symbol: "QQQ".into(),
            weekday: Weekday::Fri,
            rsi_period: 14,
            smoothing: RsiSmoothing::Wilder,
            trailing_days: TrailingWindow::one_year().days,
            store_path: PathBuf::from("mode.json"),
            write_policy: WritePolicy::Append,
        }
    }
}

impl WeekModeConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if self.rsi_period == 0 {
            return Err(ConfigError::Invalid("rsi_period must be >= 1".into()));
        }
        if self.trailing_days == 0 || self.trailing_days > MAX_TRAILING_DAYS {
            return Err(ConfigError::Invalid(format!(
                "trailing_days must be in 1..={MAX_TRAILING_DAYS}"
            )));
        }
        Ok(())
    }

    pub fn trailing_window(&self) -> TrailingWindow {
        TrailingWindow::days(self.trailing_days)
    }
}
