//! Ingest validation for fetched price series.
//!
//! Every provider result passes through here before sampling:
//! - the series must not be empty,
//! - dates must be strictly increasing (no duplicates, no reordering),
//! - every close must be finite and positive.

use chrono::NaiveDate;

use super::provider::{DataError, FetchResult};
use crate::domain::PriceBar;

/// Validate a fetch result and return its bars.
///
/// `start`/`end` are only used to describe an empty series in the error.
pub fn ingest(
    fetched: FetchResult,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PriceBar>, DataError> {
    if fetched.bars.is_empty() {
        return Err(DataError::EmptySeries {
            symbol: fetched.symbol,
            start,
            end,
        });
    }
    validate_bars(&fetched.bars)?;
    Ok(fetched.bars)
}

/// Check ordering and price sanity of a bar series.
pub fn validate_bars(bars: &[PriceBar]) -> Result<(), DataError> {
    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_sane() {
            return Err(DataError::ValidationError(format!(
                "invalid close {} on {}",
                bar.close, bar.date
            )));
        }
        if i > 0 && bars[i - 1].date >= bar.date {
            return Err(DataError::ValidationError(format!(
                "bars out of order: {} followed by {}",
                bars[i - 1].date,
                bar.date
            )));
        }
    }
    Ok(())
}
