//! Mode classifier: the weekly regime transition rule.
//!
//! Compares the previous and current weekly RSI. Rules are evaluated in a
//! fixed priority order and the first match wins:
//!
//! | # | condition                                   | signal         |
//! |---|---------------------------------------------|----------------|
//! | 1 | prev > 65 and not rising                    | defensive      |
//! | 2 | 40 < prev < 50 and not rising               | defensive      |
//! | 3 | prev >= 50 and curr < 50                    | defensive      |
//! | 4 | prev <= 50 and curr > 50                    | aggressive     |
//! | 5 | 50 < prev < 60 and rising                   | aggressive     |
//! | 6 | prev <= 35 and rising                       | aggressive     |
//! | 7 | otherwise                                   | carry-previous |
//!
//! `rising` is strict: `curr > prev`. An unchanged RSI counts as not rising.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Mode, ModeRecord, ModeSignal};

/// Above this, a turn down means the rally is exhausted.
pub const OVERBOUGHT: f64 = 65.0;
/// Centre line; crossing it in either direction flips the mode.
pub const MIDLINE: f64 = 50.0;
/// Lower edge of the weak band just under the midline.
pub const WEAK_FLOOR: f64 = 40.0;
/// Upper edge of the strong band just over the midline.
pub const STRONG_CEILING: f64 = 60.0;
/// At or below this, any turn up is treated as a rebound.
pub const OVERSOLD: f64 = 35.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("no previous mode to carry forward into {date}: mode history is empty")]
    EmptyHistory { date: NaiveDate },
}

/// Classifier output together with the rule (1..=7) that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub signal: ModeSignal,
    pub rule: u8,
}

/// Classify one week from the previous and current RSI readings.
pub fn classify(previous_rsi: f64, current_rsi: f64) -> ModeSignal {
    classify_with_rule(previous_rsi, current_rsi).signal
}

/// Like [`classify`], but also reports which rule fired.
pub fn classify_with_rule(previous_rsi: f64, current_rsi: f64) -> Classification {
    let prev = previous_rsi;
    let curr = current_rsi;
    let rising = curr > prev;

    let hit = |signal, rule| Classification { signal, rule };

    if prev > OVERBOUGHT && !rising {
        return hit(ModeSignal::Defensive, 1);
    }
    if prev > WEAK_FLOOR && prev < MIDLINE && !rising {
        return hit(ModeSignal::Defensive, 2);
    }
    if prev >= MIDLINE && curr < MIDLINE {
        return hit(ModeSignal::Defensive, 3);
    }
    if prev <= MIDLINE && curr > MIDLINE {
        return hit(ModeSignal::Aggressive, 4);
    }
    if prev > MIDLINE && prev < STRONG_CEILING && rising {
        return hit(ModeSignal::Aggressive, 5);
    }
    if prev <= OVERSOLD && rising {
        return hit(ModeSignal::Aggressive, 6);
    }
    hit(ModeSignal::CarryPrevious, 7)
}

/// Turn a signal into a concrete mode.
///
/// Carry-previous takes the mode of the last record in `history`. With no
/// history there is nothing to carry, and `date` (the week being classified)
/// is reported in the error.
pub fn resolve(
    signal: ModeSignal,
    history: &[ModeRecord],
    date: NaiveDate,
) -> Result<Mode, ClassifyError> {
    match signal.concrete() {
        Some(mode) => Ok(mode),
        None => history
            .last()
            .map(|rec| rec.mode)
            .ok_or(ClassifyError::EmptyHistory { date }),
    }
}
