//! WeekMode Runner: orchestration, persistence, configuration.
//!
//! This crate builds on `weekmode-core` to provide:
//! - The mode store (JSON file and in-memory implementations)
//! - The weekly pipeline: fetch, sample, RSI, classify, persist
//! - The latest-week query used by `weekmode latest`
//! - TOML configuration

pub mod config;
pub mod pipeline;
pub mod store;

pub use config::{ConfigError, WeekModeConfig};
pub use pipeline::{
    classify_series, latest_mode, run_weekly_modes, weekly_rsi, LatestMode, RunError, RunSummary,
    WeeklyRsi,
};
pub use store::{JsonFileStore, MemoryStore, ModeStore, StoreError, UpsertOutcome, WritePolicy};
