//! Weekly sampler: reduce a daily series to one bar per week.
//!
//! Keeps only bars recorded on the designated weekday. Weeks where that day
//! was not a trading day (holidays) are simply absent; nothing is
//! interpolated or shifted to a neighbouring day.

use chrono::Weekday;

use crate::domain::PriceBar;

/// Return the bars falling on `weekday`, preserving input order.
pub fn sample_weekday(bars: &[PriceBar], weekday: Weekday) -> Vec<PriceBar> {
    bars.iter()
        .filter(|bar| bar.weekday() == weekday)
        .copied()
        .collect()
}

/// Closing prices of a bar series, in order.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
