//! Property-based tests for classification and profiling.
//!
//! Values are drawn from a mix of hand-picked literals (booleans, dates, times, decimal
//! commas) and arbitrary text/numbers, so every classifier branch is exercised.

use chrono::NaiveDate;
use proptest::prelude::*;

use rust_column_profiling::config::ProfileOptions;
use rust_column_profiling::execution::{ExecutionOptions, ProfilingEngine};
use rust_column_profiling::profiling::{classify, profile_dataset, ColumnProfiler};
use rust_column_profiling::types::{Column, DataSet, RawValue, TypeTag};

fn raw_value() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        Just(RawValue::Null),
        any::<bool>().prop_map(RawValue::Boolean),
        any::<i64>().prop_map(RawValue::int),
        (-1.0e6f64..1.0e6f64).prop_map(RawValue::float),
        prop::sample::select(vec![
            "true", "NÃO", "sim", "0", "1", "42", "-7", "3,14", "2.50", "01/02/2023",
            "2023-05-01", "31.12.1999", "12:30", "7:05 pm", "2023-05-01 10:30", "abc", "", "  ",
        ])
        .prop_map(RawValue::text),
        "[a-z0-9 ,.:/-]{0,12}".prop_map(RawValue::text),
        (0i64..40_000, 0u32..86_400).prop_map(|(days, secs)| {
            let date = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + chrono::Days::new(days as u64);
            RawValue::NativeDateTime(
                date.and_hms_opt(secs / 3600, (secs / 60) % 60, secs % 60).unwrap(),
            )
        }),
    ]
}

fn column() -> impl Strategy<Value = Vec<RawValue>> {
    prop::collection::vec(raw_value(), 0..40)
}

proptest! {
    #[test]
    fn classification_is_total_and_never_empty(v in raw_value()) {
        let tag = classify(&v);
        prop_assert_ne!(tag, TypeTag::Empty);
        prop_assert!(TypeTag::CLASSIFIED.contains(&tag));
    }

    #[test]
    fn classification_ignores_surrounding_whitespace(s in "[a-z0-9,.:/-]{0,12}") {
        let padded = RawValue::text(format!("  {s}\t"));
        prop_assert_eq!(classify(&padded), classify(&RawValue::text(s)));
    }

    #[test]
    fn profiling_is_deterministic(values in column()) {
        let profiler = ColumnProfiler::default();
        let a = profiler.profile("c", "text", &values);
        let b = profiler.profile("c", "text", &values);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn null_accounting_adds_up(values in column()) {
        let p = ColumnProfiler::default().profile("c", "text", &values);
        let nulls = values.iter().filter(|v| v.is_null()).count();

        prop_assert_eq!(p.row_count, values.len());
        prop_assert_eq!(p.null_count, nulls);
        prop_assert_eq!(p.counts.total() + p.null_count, values.len());
        prop_assert!(p.unique_count <= p.non_null_count());
        prop_assert!((0.0..=100.0).contains(&p.null_pct));
    }

    #[test]
    fn confidence_is_bounded(values in column()) {
        let p = ColumnProfiler::default().profile("c", "text", &values);
        if p.non_null_count() == 0 {
            prop_assert_eq!(p.dominant_type, TypeTag::Empty);
            prop_assert_eq!(p.confidence_pct, 0.0);
        } else {
            prop_assert_ne!(p.dominant_type, TypeTag::Empty);
            prop_assert!(p.confidence_pct > 0.0 && p.confidence_pct <= 100.0);
            // The dominant type is never outnumbered.
            let top = p.counts.get(p.dominant_type);
            prop_assert!(p.counts.iter().all(|(_, n)| n <= top));
        }
    }

    #[test]
    fn sample_values_are_the_first_non_nulls(values in column()) {
        let p = ColumnProfiler::default().profile("c", "text", &values);
        let expected: Vec<RawValue> = values.iter().filter(|v| !v.is_null()).take(3).cloned().collect();
        prop_assert_eq!(p.sample_values, expected);
    }

    #[test]
    fn parallel_engine_matches_sequential(columns in prop::collection::vec(column(), 0..8)) {
        let ds = DataSet::new(
            columns
                .into_iter()
                .enumerate()
                .map(|(i, values)| Column::new(format!("c{i}"), "text", values))
                .collect(),
        );
        let opts = ProfileOptions::default();
        let engine = ProfilingEngine::new(ExecutionOptions {
            num_threads: Some(2),
            max_in_flight_columns: 2,
        })
        .unwrap();

        let report = engine.profile_dataset(&ds, &opts);
        prop_assert_eq!(&report, &profile_dataset(&ds, &opts));

        let total: usize = report.type_distribution.iter().map(|s| s.column_count).sum();
        prop_assert_eq!(total, report.column_count());
        prop_assert!(report.flagged_columns.iter().all(|p| p.null_pct > 50.0));
    }
}
