//! Core data model types for profiling.
//!
//! Collaborators hand the profiler a [`DataSet`]: an ordered list of named [`Column`]s, each
//! holding raw, untyped [`RawValue`]s. Profiling produces one [`ColumnProfile`] per column and
//! a [`DatasetReport`] for the whole dataset.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A numeric value as delivered by the source.
///
/// Integer and floating point storage are kept apart so that `5` (integer column) and `5.0`
/// (float column) render the way a dataframe would print them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Numeric {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
}

/// A single raw value handed in by a source collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// The source's explicit missing-value marker.
    Null,
    /// Native boolean.
    Boolean(bool),
    /// Native number.
    Number(Numeric),
    /// Text (or anything the source could only give us as text).
    Text(String),
    /// Native calendar date without a time component.
    NativeDate(NaiveDate),
    /// Native timestamp.
    NativeDateTime(NaiveDateTime),
}

impl RawValue {
    /// Shorthand for a [`RawValue::Text`].
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Shorthand for an integer [`RawValue::Number`].
    pub fn int(v: i64) -> Self {
        Self::Number(Numeric::Int(v))
    }

    /// Shorthand for a floating point [`RawValue::Number`]. `NaN` becomes [`RawValue::Null`].
    pub fn float(v: f64) -> Self {
        if v.is_nan() {
            return Self::Null;
        }
        Self::Number(Numeric::Float(v))
    }

    /// Returns `true` for the missing-value marker and for a float `NaN`.
    ///
    /// Empty or whitespace-only text is **not** null.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Number(Numeric::Float(v)) => v.is_nan(),
            _ => false,
        }
    }

    /// Render the value as text for pattern matching.
    ///
    /// Text is returned as-is (untrimmed); other variants are formatted. `Null` renders as an
    /// empty string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Number(Numeric::Int(v)) => Cow::Owned(v.to_string()),
            Self::Number(Numeric::Float(v)) => Cow::Owned(format_float(*v)),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::NativeDate(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
            Self::NativeDateTime(dt) => Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Key used to count distinct values.
    ///
    /// Text compares trimmed; numbers compare by value, so `Int(1)` and `Float(1.0)` are the
    /// same value. Returns `None` for null values (see [`RawValue::is_null`]).
    pub fn distinct_key(&self) -> Option<DistinctKey> {
        if self.is_null() {
            return None;
        }
        let key = match self {
            Self::Null => return None,
            Self::Boolean(b) => DistinctKey::Boolean(*b),
            Self::Number(Numeric::Int(v)) => DistinctKey::Int(*v),
            Self::Number(Numeric::Float(v)) => float_key(*v),
            Self::Text(s) => DistinctKey::Text(s.trim().to_owned()),
            Self::NativeDate(d) => DistinctKey::Date(*d),
            Self::NativeDateTime(dt) => DistinctKey::DateTime(*dt),
        };
        Some(key)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::float(v)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(d: NaiveDate) -> Self {
        Self::NativeDate(d)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::NativeDateTime(dt)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Hashable identity of a non-null [`RawValue`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DistinctKey {
    Boolean(bool),
    Int(i64),
    /// Bit pattern of a non-integral float (`-0.0` folded into `0.0`).
    Float(u64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

// Integral floats inside the i64 range share their key with the equivalent integer.
fn float_key(v: f64) -> DistinctKey {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        return DistinctKey::Int(v as i64);
    }
    DistinctKey::Float(v.to_bits())
}

fn format_float(v: f64) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "NaN".to_string()
        } else if v > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    if v != 0.0 && (v.abs() >= 1e16 || v.abs() < 1e-4) {
        return format!("{v:e}");
    }
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

/// Semantic type assigned to a value or a column.
///
/// Declaration order is the evaluation order used to break ties between equally common
/// types: `Integer` beats `Decimal` beats `Date` and so on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeTag {
    Integer,
    Decimal,
    Date,
    Time,
    Boolean,
    String,
    /// Column with zero non-null values. Never assigned to a single value.
    Empty,
}

impl TypeTag {
    /// Every tag a single value can receive, in tie-break order.
    pub const CLASSIFIED: [TypeTag; 6] = [
        TypeTag::Integer,
        TypeTag::Decimal,
        TypeTag::Date,
        TypeTag::Time,
        TypeTag::Boolean,
        TypeTag::String,
    ];

    /// Upper-case label used in reports and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Integer => "INTEGER",
            TypeTag::Decimal => "DECIMAL",
            TypeTag::Date => "DATE",
            TypeTag::Time => "TIME",
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::String => "STRING",
            TypeTag::Empty => "EMPTY",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-tag counts of the non-null values of one column.
///
/// Only observed tags are stored; iteration follows [`TypeTag`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassificationCounts {
    counts: BTreeMap<TypeTag, usize>,
}

impl ClassificationCounts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one value classified as `tag`.
    pub fn record(&mut self, tag: TypeTag) {
        debug_assert!(tag != TypeTag::Empty, "EMPTY is never counted");
        *self.counts.entry(tag).or_insert(0) += 1;
    }

    /// Count for `tag` (zero if never observed).
    pub fn get(&self, tag: TypeTag) -> usize {
        self.counts.get(&tag).copied().unwrap_or(0)
    }

    /// Sum of all counts, i.e. the number of classified (non-null) values.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Returns `true` if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Observed tags with their counts, in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeTag, usize)> + '_ {
        self.counts.iter().map(|(tag, n)| (*tag, *n))
    }

    /// Most common tag and its count.
    ///
    /// Ties resolve to the tag that comes first in [`TypeTag::CLASSIFIED`].
    pub fn dominant(&self) -> Option<(TypeTag, usize)> {
        self.iter().fold(None, |best, (tag, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((tag, n)),
        })
    }
}

impl FromIterator<TypeTag> for ClassificationCounts {
    fn from_iter<I: IntoIterator<Item = TypeTag>>(iter: I) -> Self {
        let mut counts = Self::new();
        for tag in iter {
            counts.record(tag);
        }
        counts
    }
}

/// A named column of raw values, as produced by a source collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name (header).
    pub name: String,
    /// Opaque label describing how the source stored this column (e.g. `"text"`,
    /// `"float"`, `"INT64"`). Passed through to the profile unchanged.
    pub source_type: String,
    /// Values in row order.
    pub values: Vec<RawValue>,
}

impl Column {
    /// Create a new column.
    pub fn new(
        name: impl Into<String>,
        source_type: impl Into<String>,
        values: Vec<RawValue>,
    ) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            values,
        }
    }

    /// Create a column of text values labelled `"text"`. Handy in tests and for CSV-like
    /// sources.
    pub fn from_texts<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        Self::new(
            name,
            "text",
            values.iter().map(|s| RawValue::text(s.as_ref())).collect(),
        )
    }

    /// Number of values (null or not).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the column has no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// In-memory, column-major tabular dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    /// Columns in source order.
    pub columns: Vec<Column>,
}

impl DataSet {
    /// Create a dataset from columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (length of the longest column).
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Column::len).max().unwrap_or(0)
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Returns a column by name, if present.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// New dataset keeping only the first `n` rows of every column.
    pub fn head(&self, n: usize) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                source_type: c.source_type.clone(),
                values: c.values.iter().take(n).cloned().collect(),
            })
            .collect();
        Self { columns }
    }
}

/// Profiling result for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Most common type among non-null values (`Empty` if there are none).
    pub dominant_type: TypeTag,
    /// Share of non-null values matching `dominant_type`, in percent, rounded to 2 decimals.
    pub confidence_pct: f64,
    /// Number of distinct non-null values.
    pub unique_count: usize,
    /// Number of null values.
    pub null_count: usize,
    /// Percentage of values that are null (unrounded).
    pub null_pct: f64,
    /// Source storage label, passed through from [`Column::source_type`].
    pub source_type: String,
    /// First few non-null values, unmodified and in column order.
    pub sample_values: Vec<RawValue>,
    /// Total number of values in the column.
    pub row_count: usize,
    /// Per-type counts of the non-null values.
    pub counts: ClassificationCounts,
}

impl ColumnProfile {
    /// Number of non-null values.
    pub fn non_null_count(&self) -> usize {
        self.row_count - self.null_count
    }
}

/// How many columns ended up with a given dominant type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeShare {
    pub type_tag: TypeTag,
    pub column_count: usize,
    /// `column_count` as a percentage of all columns.
    pub pct: f64,
}

/// Dataset-level profiling report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetReport {
    /// One profile per input column, in input order.
    pub columns: Vec<ColumnProfile>,
    /// Dominant type distribution, most common first.
    pub type_distribution: Vec<TypeShare>,
    /// Columns whose null percentage exceeds `null_flag_threshold_pct`, in input order.
    pub flagged_columns: Vec<ColumnProfile>,
    /// Threshold used to build `flagged_columns`.
    pub null_flag_threshold_pct: f64,
}

impl DatasetReport {
    /// Number of profiled columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no columns were profiled.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Profile of a column by name, if present.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|p| p.name == name)
    }

    /// Human-readable summary: one line per type share, then one line per flagged column.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.type_distribution.len() + self.flagged_columns.len());
        for share in &self.type_distribution {
            lines.push(format!(
                "{}: {} columns ({:.1}%)",
                share.type_tag, share.column_count, share.pct
            ));
        }
        for p in &self.flagged_columns {
            lines.push(format!("{}: {:.2}% nulls", p.name, p.null_pct));
        }
        lines
    }
}

/// Report for one named sheet of a workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub report: DatasetReport,
}

#[cfg(test)]
mod tests {
    use super::{ClassificationCounts, Column, DataSet, DistinctKey, Numeric, RawValue, TypeTag};
    use chrono::NaiveDate;

    #[test]
    fn float_text_keeps_trailing_zero_for_integral_values() {
        assert_eq!(RawValue::float(5.0).as_text(), "5.0");
        assert_eq!(RawValue::float(2.5).as_text(), "2.5");
        assert_eq!(RawValue::float(-0.75).as_text(), "-0.75");
        assert_eq!(RawValue::int(5).as_text(), "5");
    }

    #[test]
    fn nan_is_a_missing_value() {
        assert_eq!(RawValue::float(f64::NAN), RawValue::Null);
        let raw = RawValue::Number(Numeric::Float(f64::NAN));
        assert!(raw.is_null());
        assert_eq!(raw.distinct_key(), None);
        assert!(!RawValue::float(f64::INFINITY).is_null());
    }

    #[test]
    fn distinct_key_folds_integral_floats_and_trims_text() {
        assert_eq!(RawValue::float(1.0).distinct_key(), RawValue::int(1).distinct_key());
        assert_ne!(RawValue::float(1.5).distinct_key(), RawValue::int(1).distinct_key());
        assert_eq!(
            RawValue::text(" a ").distinct_key(),
            Some(DistinctKey::Text("a".to_string()))
        );
        assert_eq!(RawValue::Null.distinct_key(), None);
    }

    #[test]
    fn option_converts_none_to_null() {
        assert_eq!(RawValue::from(None::<i64>), RawValue::Null);
        assert_eq!(RawValue::from(Some("x")), RawValue::text("x"));
    }

    #[test]
    fn dominant_prefers_earlier_tag_on_ties() {
        let counts: ClassificationCounts =
            [TypeTag::String, TypeTag::Decimal, TypeTag::Integer, TypeTag::String, TypeTag::Integer]
                .into_iter()
                .collect();
        assert_eq!(counts.dominant(), Some((TypeTag::Integer, 2)));
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.get(TypeTag::Date), 0);
        assert!(ClassificationCounts::new().dominant().is_none());
    }

    #[test]
    fn type_tag_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&TypeTag::Decimal).unwrap(), "\"DECIMAL\"");
        assert_eq!(TypeTag::Empty.to_string(), "EMPTY");
    }

    #[test]
    fn head_truncates_every_column() {
        let ds = DataSet::new(vec![
            Column::from_texts("a", &["1", "2", "3"]),
            Column::new(
                "d",
                "date",
                vec![RawValue::from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), RawValue::Null],
            ),
        ]);
        assert_eq!(ds.row_count(), 3);
        let h = ds.head(1);
        assert_eq!(h.row_count(), 1);
        assert_eq!(h.column("d").unwrap().len(), 1);
        assert_eq!(h.index_of("d"), Some(1));
    }
}
