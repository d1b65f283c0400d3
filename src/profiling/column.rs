//! Per-column aggregation: classify every non-null value, vote, and collect quality stats.

use std::collections::HashSet;

use crate::config::ProfileOptions;
use crate::types::{ClassificationCounts, Column, ColumnProfile, RawValue, TypeTag};

use super::classify::ValueClassifier;

/// Builds [`ColumnProfile`]s. Holds only immutable options, so one profiler can be shared by
/// any number of threads.
#[derive(Debug, Clone)]
pub struct ColumnProfiler {
    classifier: ValueClassifier,
    sample_value_count: usize,
}

impl ColumnProfiler {
    /// Create a profiler from options.
    pub fn new(opts: &ProfileOptions) -> Self {
        Self {
            classifier: ValueClassifier::new(opts.classifier),
            sample_value_count: opts.sample_value_count,
        }
    }

    /// Profile one column.
    ///
    /// - Only [`RawValue::Null`] counts as null.
    /// - A column without non-null values gets [`TypeTag::Empty`] and confidence 0.
    /// - Ties between equally common types resolve in [`TypeTag::CLASSIFIED`] order.
    pub fn profile(&self, name: &str, source_type: &str, values: &[RawValue]) -> ColumnProfile {
        let row_count = values.len();
        let mut counts = ClassificationCounts::new();
        let mut distinct = HashSet::new();
        let mut sample_values = Vec::with_capacity(self.sample_value_count);
        let mut null_count = 0usize;

        for value in values {
            let Some(key) = value.distinct_key() else {
                null_count += 1;
                continue;
            };
            counts.record(self.classifier.classify(value));
            distinct.insert(key);
            if sample_values.len() < self.sample_value_count {
                sample_values.push(value.clone());
            }
        }

        let non_null = row_count - null_count;
        let (dominant_type, confidence_pct) = match counts.dominant() {
            Some((tag, n)) => (tag, round2(percent(n, non_null))),
            None => (TypeTag::Empty, 0.0),
        };

        let null_pct = if row_count == 0 {
            0.0
        } else {
            percent(null_count, row_count)
        };

        tracing::debug!(
            column = name,
            dominant_type = %dominant_type,
            confidence_pct,
            null_count,
            row_count,
            "profiled column"
        );

        ColumnProfile {
            name: name.to_owned(),
            dominant_type,
            confidence_pct,
            unique_count: distinct.len(),
            null_count,
            null_pct,
            source_type: source_type.to_owned(),
            sample_values,
            row_count,
            counts,
        }
    }

    /// Profile a [`Column`].
    pub fn profile_column(&self, column: &Column) -> ColumnProfile {
        self.profile(&column.name, &column.source_type, &column.values)
    }
}

impl Default for ColumnProfiler {
    fn default() -> Self {
        Self::new(&ProfileOptions::default())
    }
}

pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    part as f64 * 100.0 / whole as f64
}

/// Round to 2 decimal places.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{round2, ColumnProfiler};
    use crate::config::ProfileOptions;
    use crate::types::{Column, Numeric, RawValue, TypeTag};

    fn profiler() -> ColumnProfiler {
        ColumnProfiler::new(&ProfileOptions::default())
    }

    #[test]
    fn boolean_literal_one_splits_an_integer_column() {
        let p = profiler().profile_column(&Column::from_texts("id", &["1", "2", "3"]));
        // "1" is a boolean literal, so only two of three values vote INTEGER.
        assert_eq!(p.dominant_type, TypeTag::Integer);
        assert_eq!(p.confidence_pct, 66.67);
        assert_eq!(p.counts.get(TypeTag::Boolean), 1);
        assert_eq!(p.unique_count, 3);
        assert_eq!(p.null_count, 0);
        assert_eq!(p.null_pct, 0.0);
        assert_eq!(p.source_type, "text");
    }

    #[test]
    fn nulls_are_excluded_from_voting_and_counted() {
        let values = vec![
            RawValue::text("1.5"),
            RawValue::Null,
            RawValue::text("2,5"),
            RawValue::text("abc"),
            RawValue::Null,
        ];
        let p = profiler().profile("price", "object", &values);
        assert_eq!(p.dominant_type, TypeTag::Decimal);
        assert_eq!(p.confidence_pct, 66.67);
        assert_eq!(p.null_count, 2);
        assert_eq!(p.null_pct, 40.0);
        assert_eq!(p.non_null_count() + p.null_count, p.row_count);
        assert_eq!(p.counts.total(), 3);
    }

    #[test]
    fn whitespace_text_is_not_null() {
        let p = profiler().profile_column(&Column::from_texts("c", &["", "  "]));
        assert_eq!(p.null_count, 0);
        assert_eq!(p.dominant_type, TypeTag::String);
        assert_eq!(p.unique_count, 1);
    }

    #[test]
    fn all_null_column_is_empty() {
        let p = profiler().profile("c", "float64", &[RawValue::Null, RawValue::Null]);
        assert_eq!(p.dominant_type, TypeTag::Empty);
        assert_eq!(p.confidence_pct, 0.0);
        assert_eq!(p.unique_count, 0);
        assert_eq!(p.null_count, 2);
        assert_eq!(p.null_pct, 100.0);
        assert!(p.sample_values.is_empty());
    }

    #[test]
    fn zero_length_column_is_empty_with_zero_null_pct() {
        let p = profiler().profile("c", "text", &[]);
        assert_eq!(p.dominant_type, TypeTag::Empty);
        assert_eq!(p.null_pct, 0.0);
        assert_eq!(p.row_count, 0);
    }

    #[test]
    fn tie_between_integer_and_decimal_resolves_to_integer() {
        let p = profiler().profile_column(&Column::from_texts("c", &["2.0", "7"]));
        assert_eq!(p.dominant_type, TypeTag::Integer);
        assert_eq!(p.confidence_pct, 50.0);

        let p = profiler().profile_column(&Column::from_texts("c", &["hello", "12:00"]));
        assert_eq!(p.dominant_type, TypeTag::Time);
    }

    #[test]
    fn samples_are_first_non_null_values_unmodified() {
        let values = vec![
            RawValue::Null,
            RawValue::text(" a "),
            RawValue::int(5),
            RawValue::Null,
            RawValue::text("b"),
            RawValue::text("c"),
        ];
        let p = profiler().profile("c", "mixed", &values);
        assert_eq!(
            p.sample_values,
            vec![RawValue::text(" a "), RawValue::int(5), RawValue::text("b")]
        );

        let opts = ProfileOptions {
            sample_value_count: 1,
            ..Default::default()
        };
        let p = ColumnProfiler::new(&opts).profile("c", "mixed", &values);
        assert_eq!(p.sample_values, vec![RawValue::text(" a ")]);
    }

    #[test]
    fn unique_count_uses_normalized_keys() {
        let values = vec![
            RawValue::text("x"),
            RawValue::text(" x"),
            RawValue::int(3),
            RawValue::float(3.0),
            RawValue::float(3.5),
        ];
        let p = profiler().profile("c", "mixed", &values);
        assert_eq!(p.unique_count, 3);
    }

    #[test]
    fn profiling_is_deterministic() {
        let col = Column::from_texts("c", &["1", "x", "2.5", "01/01/2020", "x"]);
        assert_eq!(profiler().profile_column(&col), profiler().profile_column(&col));
    }

    #[test]
    fn nan_counts_as_null() {
        let values = vec![
            RawValue::float(1.5),
            RawValue::Number(Numeric::Float(f64::NAN)),
            RawValue::float(f64::NAN),
        ];
        let p = profiler().profile("ratio", "DOUBLE", &values);
        assert_eq!(p.dominant_type, TypeTag::Decimal);
        assert_eq!(p.confidence_pct, 100.0);
        assert_eq!(p.null_count, 2);
        assert_eq!(p.unique_count, 1);
        assert_eq!(p.sample_values, vec![RawValue::float(1.5)]);
        assert_eq!(p, p.clone());
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(100.0), 100.0);
    }
}
