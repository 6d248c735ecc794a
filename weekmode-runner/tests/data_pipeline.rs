//! Integration tests for the runner's data pipeline with CSV-imported prices.
//!
//! These tests verify that a Yahoo-style CSV export flows through ingest,
//! weekly sampling and RSI, and that bad input fails cleanly.

use std::io::Write;

use chrono::{Datelike, NaiveDate, Weekday};
use weekmode_core::data::{CsvProvider, DataSource};
use weekmode_runner::{weekly_rsi, RunError, WeekModeConfig};

fn write_csv(rows: &[(NaiveDate, f64)]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
    for (date, close) in rows {
        writeln!(file, "{date},{close},{close},{close},{close},{close},1000").unwrap();
    }
    file.flush().unwrap();
    file
}

fn weekday_rows(days: usize) -> Vec<(NaiveDate, f64)> {
    let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut rows = Vec::new();
    while rows.len() < days {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            // sawtooth: up four days, down one
            let close = 400.0 + (rows.len() % 5) as f64 * 2.0 + rows.len() as f64 * 0.1;
            rows.push((date, close));
        }
        date = date.succ_opt().unwrap();
    }
    rows
}

#[test]
fn csv_prices_flow_into_weekly_rsi() {
    let file = write_csv(&weekday_rows(200));
    let provider = CsvProvider::new(file.path());
    let config = WeekModeConfig::default();
    let as_of = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    let weekly = weekly_rsi(&provider, &config, as_of).unwrap();

    assert_eq!(weekly.source, DataSource::CsvImport);
    assert_eq!(weekly.daily_bars, 200);
    assert_eq!(weekly.weekly_bars, 40);
    assert_eq!(weekly.series.len(), 40 - 14);
    assert!(weekly
        .series
        .iter()
        .all(|p| (0.0..=100.0).contains(&p.value) && p.date.weekday() == Weekday::Fri));
}

#[test]
fn out_of_order_csv_is_rejected() {
    let mut rows = weekday_rows(30);
    rows.swap(3, 4);
    let file = write_csv(&rows);
    let provider = CsvProvider::new(file.path());
    let as_of = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    let err = weekly_rsi(&provider, &WeekModeConfig::default(), as_of).unwrap_err();
    assert!(matches!(err, RunError::Data(_)), "{err}");
}

#[test]
fn missing_csv_file_fails_cleanly() {
    let provider = CsvProvider::new("/nonexistent/qqq.csv");
    let as_of = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let err = weekly_rsi(&provider, &WeekModeConfig::default(), as_of).unwrap_err();
    assert!(err.to_string().contains("csv import error"), "{err}");
}
