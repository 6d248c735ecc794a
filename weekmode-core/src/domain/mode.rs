//! Mode labels and persisted mode records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete weekly regime. Only these two values are ever persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Defensive,
    Aggressive,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Defensive => "defensive",
            Mode::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw classifier output, before carry-previous is resolved against history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeSignal {
    Defensive,
    Aggressive,
    CarryPrevious,
}

impl ModeSignal {
    /// The concrete mode, if this signal names one.
    pub fn concrete(&self) -> Option<Mode> {
        match self {
            ModeSignal::Defensive => Some(Mode::Defensive),
            ModeSignal::Aggressive => Some(Mode::Aggressive),
            ModeSignal::CarryPrevious => None,
        }
    }
}

impl From<Mode> for ModeSignal {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Defensive => ModeSignal::Defensive,
            Mode::Aggressive => ModeSignal::Aggressive,
        }
    }
}

impl fmt::Display for ModeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeSignal::Defensive => f.write_str("defensive"),
            ModeSignal::Aggressive => f.write_str("aggressive"),
            ModeSignal::CarryPrevious => f.write_str("carry-previous"),
        }
    }
}

/// One persisted weekly classification.
///
/// Holds a `Mode`, never a `ModeSignal`, so an unresolved carry-previous
/// cannot reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRecord {
    pub date: NaiveDate,
    pub mode: Mode,
}

impl ModeRecord {
    pub fn new(date: NaiveDate, mode: Mode) -> Self {
        Self { date, mode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_json_shape() {
        let rec = ModeRecord::new(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(), Mode::Aggressive);
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"date":"2024-03-08","mode":"aggressive"}"#);
    }

    #[test]
    fn record_rejects_unknown_mode() {
        let bad = r#"{"date":"2024-03-08","mode":"carry-previous"}"#;
        assert!(serde_json::from_str::<ModeRecord>(bad).is_err());
    }

    #[test]
    fn signal_concrete() {
        assert_eq!(ModeSignal::Defensive.concrete(), Some(Mode::Defensive));
        assert_eq!(ModeSignal::Aggressive.concrete(), Some(Mode::Aggressive));
        assert_eq!(ModeSignal::CarryPrevious.concrete(), None);
        assert_eq!(ModeSignal::from(Mode::Aggressive), ModeSignal::Aggressive);
    }

    #[test]
    fn display_labels() {
        assert_eq!(Mode::Defensive.to_string(), "defensive");
        assert_eq!(ModeSignal::CarryPrevious.to_string(), "carry-previous");
    }
}
