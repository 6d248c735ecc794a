//! Weekly mode pipeline: wires provider, sampler, RSI, classifier and store.
//!
//! Entry points:
//! - `weekly_rsi()`: fetch → validate → weekly sample → RSI series.
//! - `classify_series()`: classify every consecutive RSI pair and persist one
//!   record per pair. Used by `run_weekly_modes()` and directly by tests.
//! - `run_weekly_modes()`: full run with persistence. Used by `weekmode run`.
//! - `latest_mode()`: classify only the newest week, without writing.
//!
//! Everything is recomputed from scratch on each run. Any error aborts the
//! run; records written before the failing pair stay in the store.

use chrono::NaiveDate;
use thiserror::Error;

use weekmode_core::classifier::{classify_with_rule, resolve, ClassifyError};
use weekmode_core::data::{ingest, DataError, DataSource, PriceProvider};
use weekmode_core::indicators::{Rsi, RsiError, RsiPoint};
use weekmode_core::sampler::sample_weekday;
use weekmode_core::{Mode, ModeRecord, ModeSignal};

use crate::config::WeekModeConfig;
use crate::store::{ModeStore, StoreError, UpsertOutcome, WritePolicy};

/// Errors from the pipeline.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("rsi error: {0}")]
    Rsi(#[from] RsiError),
    #[error("classification error: {0}")]
    Classify(#[from] ClassifyError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("need at least 2 weekly RSI values to classify, have {available}")]
    InsufficientRsi { available: usize },
}

/// Weekly RSI computed for one symbol, with provenance.
#[derive(Debug, Clone)]
pub struct WeeklyRsi {
    pub symbol: String,
    pub source: DataSource,
    pub daily_bars: usize,
    pub weekly_bars: usize,
    pub series: Vec<RsiPoint>,
}

/// Counts from one `classify_series` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Consecutive RSI pairs classified.
    pub pairs: usize,
    /// Records added at the end of the store.
    pub appended: usize,
    /// Records that replaced an existing record with the same date.
    pub replaced: usize,
    /// Pairs where no rule fired and the previous mode was carried forward.
    pub carried: usize,
    /// The record written for the newest pair.
    pub last: Option<ModeRecord>,
}

/// Classification of the newest week, not persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestMode {
    pub date: NaiveDate,
    pub previous_rsi: f64,
    pub current_rsi: f64,
    pub signal: ModeSignal,
    pub rule: u8,
    pub mode: Mode,
}

/// Fetch daily prices ending at `as_of` and compute the weekly RSI series.
pub fn weekly_rsi(
    provider: &dyn PriceProvider,
    config: &WeekModeConfig,
    as_of: NaiveDate,
) -> Result<WeeklyRsi, RunError> {
    let (start, end) = config.trailing_window().range_ending(as_of)?;
    log::info!(
        "fetching {} from {} ({start} .. {end})",
        config.symbol,
        provider.name()
    );

    let fetched = provider.fetch(&config.symbol, start, end)?;
    let source = fetched.source;
    let daily = ingest(fetched, start, end)?;
    let weekly = sample_weekday(&daily, config.weekday);

    let rsi = Rsi::with_smoothing(config.rsi_period, config.smoothing)?;
    let series = rsi.series(&weekly);

    log::info!(
        "{} daily bars → {} {:?} samples → {} RSI values ({:?}, period {})",
        daily.len(),
        weekly.len(),
        config.weekday,
        series.len(),
        rsi.smoothing(),
        rsi.period()
    );

    Ok(WeeklyRsi {
        symbol: config.symbol.clone(),
        source,
        daily_bars: daily.len(),
        weekly_bars: weekly.len(),
        series,
    })
}

/// Records strictly before `date`, in date order (stable for equal dates).
fn history_before(records: Vec<ModeRecord>, date: NaiveDate) -> Vec<ModeRecord> {
    let mut before: Vec<ModeRecord> = records.into_iter().filter(|r| r.date < date).collect();
    before.sort_by_key(|r| r.date);
    before
}

/// Classify each consecutive pair of `rsi` and write one record per pair.
///
/// Carry-previous reads the store at that moment. Under `Append` it takes the
/// last stored record. Under `Upsert` it takes the newest record dated before
/// the week being classified, so re-runs over old weeks resolve the same way.
pub fn classify_series(
    rsi: &[RsiPoint],
    store: &mut dyn ModeStore,
    policy: WritePolicy,
) -> Result<RunSummary, RunError> {
    let mut summary = RunSummary::default();

    for pair in rsi.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let classification = classify_with_rule(prev.value, curr.value);

        let mode = match classification.signal.concrete() {
            Some(mode) => mode,
            None => {
                let history = match policy {
                    WritePolicy::Append => store.load()?,
                    WritePolicy::Upsert => history_before(store.load()?, curr.date),
                };
                summary.carried += 1;
                let carried = resolve(classification.signal, &history, curr.date)?;
                log::warn!("{}: no rule fired, carrying forward {carried}", curr.date);
                carried
            }
        };

        log::debug!(
            "{}: rsi {:.2} → {:.2}, rule {} → {} ({})",
            curr.date,
            prev.value,
            curr.value,
            classification.rule,
            classification.signal,
            mode
        );

        let record = ModeRecord::new(curr.date, mode);
        match policy {
            WritePolicy::Append => {
                store.append(record)?;
                summary.appended += 1;
            }
            WritePolicy::Upsert => match store.upsert(record)? {
                UpsertOutcome::Inserted => summary.appended += 1,
                UpsertOutcome::Replaced => summary.replaced += 1,
            },
        }

        summary.pairs += 1;
        summary.last = Some(record);
    }

    Ok(summary)
}

/// Full weekly run: compute the RSI series and persist a mode for every pair.
pub fn run_weekly_modes(
    provider: &dyn PriceProvider,
    store: &mut dyn ModeStore,
    config: &WeekModeConfig,
    as_of: NaiveDate,
) -> Result<RunSummary, RunError> {
    let weekly = weekly_rsi(provider, config, as_of)?;
    if weekly.series.len() < 2 {
        log::warn!(
            "only {} RSI values for {}; nothing to classify",
            weekly.series.len(),
            weekly.symbol
        );
    }

    let summary = classify_series(&weekly.series, store, config.write_policy)?;
    log::info!(
        "classified {} weeks ({} appended, {} replaced, {} carried forward)",
        summary.pairs,
        summary.appended,
        summary.replaced,
        summary.carried
    );
    Ok(summary)
}

/// Classify the newest pair of `rsi` without writing to the store.
///
/// Carry-previous resolves against the newest stored record dated before the
/// newest RSI point.
pub fn latest_mode(rsi: &[RsiPoint], store: &dyn ModeStore) -> Result<LatestMode, RunError> {
    let [.., prev, curr] = rsi else {
        return Err(RunError::InsufficientRsi {
            available: rsi.len(),
        });
    };

    let classification = classify_with_rule(prev.value, curr.value);
    let mode = match classification.signal.concrete() {
        Some(mode) => mode,
        None => {
            let history = history_before(store.load()?, curr.date);
            resolve(classification.signal, &history, curr.date)?
        }
    };

    Ok(LatestMode {
        date: curr.date,
        previous_rsi: prev.value,
        current_rsi: curr.value,
        signal: classification.signal,
        rule: classification.rule,
        mode,
    })
}
