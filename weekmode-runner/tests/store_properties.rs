//! Property tests for persistence under both write policies.

use chrono::NaiveDate;
use proptest::prelude::*;

use weekmode_core::{Mode, ModeRecord, RsiPoint};
use weekmode_runner::{classify_series, MemoryStore, WritePolicy};

fn seeded_store() -> MemoryStore {
    let seed = NaiveDate::from_ymd_opt(2023, 12, 29).unwrap();
    MemoryStore::with_records(vec![ModeRecord::new(seed, Mode::Defensive)])
}

fn to_series(values: &[f64]) -> Vec<RsiPoint> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| RsiPoint::new(start + chrono::Duration::weeks(i as i64), v))
        .collect()
}

proptest! {
    /// Append writes one record per consecutive pair, dated at the later week.
    #[test]
    fn append_writes_one_record_per_pair(values in prop::collection::vec(0.0f64..=100.0, 0..60)) {
        let rsi = to_series(&values);
        let mut store = seeded_store();

        let summary = classify_series(&rsi, &mut store, WritePolicy::Append).unwrap();

        let expected = values.len().saturating_sub(1);
        prop_assert_eq!(summary.pairs, expected);
        prop_assert_eq!(store.records().len(), expected + 1);
        for (record, point) in store.records()[1..].iter().zip(rsi.iter().skip(1)) {
            prop_assert_eq!(record.date, point.date);
        }
    }

    /// Re-running with upsert converges: the second run changes nothing.
    #[test]
    fn upsert_rerun_is_idempotent(values in prop::collection::vec(0.0f64..=100.0, 2..60)) {
        let rsi = to_series(&values);
        let mut store = seeded_store();

        classify_series(&rsi, &mut store, WritePolicy::Upsert).unwrap();
        let first = store.records().to_vec();
        let summary = classify_series(&rsi, &mut store, WritePolicy::Upsert).unwrap();

        prop_assert_eq!(summary.replaced, values.len() - 1);
        prop_assert_eq!(store.records(), first.as_slice());
    }
}
