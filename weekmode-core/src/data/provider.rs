//! Price provider trait and structured error types.
//!
//! The PriceProvider trait abstracts over price sources (Yahoo Finance, CSV
//! import) so the pipeline can swap implementations and mock for tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceBar;

/// Structured error types for data operations.
///
/// These are designed to be displayable in CLI output.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (HTTP 429)")]
    RateLimited,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no price data for '{symbol}' between {start} and {end}")]
    EmptySeries {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("csv import error: {0}")]
    CsvError(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

/// Trait for price providers (Yahoo Finance, CSV import, etc).
///
/// Implementations return daily bars in chronological order. Validation
/// happens above this trait, in `ingest`.
pub trait PriceProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily closing prices for a symbol over an inclusive date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}

/// Trailing look-back window ending today, in calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingWindow {
    pub days: u32,
}

impl TrailingWindow {
    pub fn days(days: u32) -> Self {
        Self { days }
    }

    /// One calendar year, the window the weekly mode has always been computed on.
    pub fn one_year() -> Self {
        Self::days(365)
    }

    /// Inclusive `(start, end)` range for a window ending at `end`.
    ///
    /// Fails when the start falls before the earliest representable date.
    pub fn range_ending(&self, end: NaiveDate) -> Result<(NaiveDate, NaiveDate), DataError> {
        let start = end
            .checked_sub_signed(chrono::Duration::days(i64::from(self.days)))
            .ok_or_else(|| {
                DataError::ValidationError(format!(
                    "trailing window of {} days before {end} is out of range",
                    self.days
                ))
            })?;
        Ok((start, end))
    }
}

/// Fixed in-memory provider for tests and offline fixtures.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    bars: Vec<PriceBar>,
}

impl StaticProvider {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }
}

impl PriceProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars: Vec<PriceBar> = self
            .bars
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .copied()
            .collect();
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Synthetic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn trailing_window_range() {
        let (start, end) = TrailingWindow::days(7).range_ending(d(2024, 3, 8)).unwrap();
        assert_eq!(start, d(2024, 3, 1));
        assert_eq!(end, d(2024, 3, 8));
        assert_eq!(TrailingWindow::one_year().days, 365);
    }

    #[test]
    fn trailing_window_out_of_range_is_error() {
        let err = TrailingWindow::days(u32::MAX)
            .range_ending(d(2024, 12, 31))
            .unwrap_err();
        assert!(matches!(err, DataError::ValidationError(_)));
    }

    #[test]
    fn static_provider_filters_range() {
        let provider = StaticProvider::new(vec![
            PriceBar::new(d(2024, 1, 1), 1.0),
            PriceBar::new(d(2024, 1, 2), 2.0),
            PriceBar::new(d(2024, 1, 3), 3.0),
        ]);
        let result = provider.fetch("QQQ", d(2024, 1, 2), d(2024, 1, 3)).unwrap();
        assert_eq!(result.symbol, "QQQ");
        assert_eq!(result.bars.len(), 2);
        assert_eq!(result.bars[0].close, 2.0);
    }

    #[test]
    fn errors_are_displayable() {
        let e = DataError::EmptySeries {
            symbol: "QQQ".into(),
            start: d(2024, 1, 1),
            end: d(2024, 1, 31),
        };
        assert_eq!(
            e.to_string(),
            "no price data for 'QQQ' between 2024-01-01 and 2024-01-31"
        );
    }
}
