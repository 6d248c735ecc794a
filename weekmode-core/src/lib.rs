//! WeekMode Core: price data, weekly sampling, RSI, and mode classification.
//!
//! This crate contains the analytical heart of the weekly mode signal:
//! - Domain types (price bars, modes, mode records)
//! - Price providers (Yahoo Finance, CSV import) and ingest validation
//! - Weekly sampler (one bar per week on a fixed weekday)
//! - RSI engine with pinned smoothing
//! - Mode classifier with carry-previous resolution

pub mod classifier;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod sampler;

pub use classifier::{classify, classify_with_rule, resolve, Classification, ClassifyError};
pub use domain::{Mode, ModeRecord, ModeSignal, PriceBar};
pub use indicators::{Rsi, RsiPoint, RsiSmoothing};
