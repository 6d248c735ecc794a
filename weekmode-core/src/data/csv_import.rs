//! CSV price import: offline fallback for the Yahoo provider.
//!
//! Reads files in the layout of Yahoo's "Download" CSV export:
//! a `Date` column plus `Adj Close` and/or `Close`. Column lookup is
//! case-insensitive; `Adj Close` wins when both are present. Rows whose close
//! is empty or `null` are skipped. Rows outside the requested range are dropped.

use std::path::PathBuf;

use chrono::NaiveDate;

use super::provider::{DataError, DataSource, FetchResult, PriceProvider};
use crate::domain::PriceBar;

/// Price provider backed by a single CSV file for one symbol.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse every bar in the file, in file order.
    pub fn read_all(&self) -> Result<Vec<PriceBar>, DataError> {
        let reader = csv::Reader::from_path(&self.path)
            .map_err(|e| DataError::CsvError(format!("{}: {e}", self.path.display())))?;
        parse_bars(reader)
    }
}

fn parse_bars<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<PriceBar>, DataError> {
    let headers = reader
        .headers()
        .map_err(|e| DataError::CsvError(e.to_string()))?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let date_col =
        column("date").ok_or_else(|| DataError::CsvError("missing 'Date' column".into()))?;
    let close_col = column("adj close")
        .or_else(|| column("close"))
        .ok_or_else(|| DataError::CsvError("missing 'Close' or 'Adj Close' column".into()))?;

    let mut bars = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| DataError::CsvError(e.to_string()))?;
        // header is line 1
        let row = line + 2;

        let raw_date = record.get(date_col).unwrap_or("").trim();
        // Accept both "2024-01-05" and "2024-01-05 00:00:00-05:00"
        let date_part = raw_date.get(..10).unwrap_or(raw_date);
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|e| DataError::CsvError(format!("row {row}: bad date '{raw_date}': {e}")))?;

        let raw_close = record.get(close_col).unwrap_or("").trim();
        if raw_close.is_empty() || raw_close.eq_ignore_ascii_case("null") {
            continue;
        }
        let close: f64 = raw_close
            .parse()
            .map_err(|e| DataError::CsvError(format!("row {row}: bad close '{raw_close}': {e}")))?;

        bars.push(PriceBar::new(date, close));
    }

    Ok(bars)
}

impl PriceProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars: Vec<PriceBar> = self
            .read_all()?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();
        log::info!(
            "loaded {} daily bars for {symbol} from {}",
            bars.len(),
            self.path.display()
        );
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}
