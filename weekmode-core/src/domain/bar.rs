//! PriceBar: one daily closing price for the tracked instrument.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Daily closing price for a single trading day.
///
/// The close is the split/dividend-adjusted close when the provider has one.
/// Series of bars are chronological with one bar per trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Weekday the bar was recorded on.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// A usable close is finite and strictly positive.
    pub fn is_sane(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
