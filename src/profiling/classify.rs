//! Per-value type classification.
//!
//! [`classify`] maps one [`RawValue`] to exactly one [`TypeTag`] (never [`TypeTag::Empty`]).
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. Native dates are `DATE`; native timestamps are `DATE` at exactly midnight and `TIME`
//!    otherwise (see [`ClassifierOptions::native_midnight_is_date`]).
//! 2. Everything else is rendered as trimmed text and tested for, in order: boolean literal,
//!    integer, decimal (comma or dot), combined date+time (`TIME`), date, time. Anything left
//!    is `STRING`.
//!
//! Boolean literals are checked before integers, so `"1"` and `"0"` are booleans.
//!
//! ```rust
//! use rust_column_profiling::profiling::classify;
//! use rust_column_profiling::types::{RawValue, TypeTag};
//!
//! assert_eq!(classify(&RawValue::text("42")), TypeTag::Integer);
//! assert_eq!(classify(&RawValue::text("2,5")), TypeTag::Decimal);
//! assert_eq!(classify(&RawValue::text("1")), TypeTag::Boolean);
//! assert_eq!(classify(&RawValue::text("31/12/2023 18:00")), TypeTag::Time);
//! ```

use std::sync::LazyLock;

use chrono::{NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::config::ClassifierOptions;
use crate::types::{RawValue, TypeTag};

/// Case-insensitive boolean literals (English and Portuguese, plus `1`/`0`).
pub const BOOLEAN_LITERALS: [&str; 10] = [
    "true",
    "false",
    "verdadeiro",
    "falso",
    "sim",
    "não",
    "yes",
    "no",
    "1",
    "0",
];

static INTEGER: LazyLock<Regex> = LazyLock::new(|| compile(r"^-?\d+$"));

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| compile(r"^-?\d+\.\d+$"));

/// Date/time patterns in evaluation order. Combined date+time patterns come first and are
/// only anchored at the start, so anything after `HH:MM` is accepted.
static TEMPORAL_PATTERNS: LazyLock<Vec<(Regex, TypeTag)>> = LazyLock::new(|| {
    [
        // DD/MM/YYYY HH:MM...
        (r"^\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}", TypeTag::Time),
        // YYYY-MM-DD HH:MM...
        (r"^\d{4}-\d{1,2}-\d{1,2} \d{1,2}:\d{2}", TypeTag::Time),
        // DD/MM/YYYY
        (r"^\d{1,2}/\d{1,2}/\d{4}$", TypeTag::Date),
        // YYYY-MM-DD
        (r"^\d{4}-\d{1,2}-\d{1,2}$", TypeTag::Date),
        // DD-MM-YYYY
        (r"^\d{1,2}-\d{1,2}-\d{4}$", TypeTag::Date),
        // DD.MM.YYYY
        (r"^\d{1,2}\.\d{1,2}\.\d{4}$", TypeTag::Date),
        // HH:MM or HH:MM:SS
        (r"^\d{1,2}:\d{2}(:\d{2})?$", TypeTag::Time),
        // HH:MM[:SS]AM/PM, upper case and unspaced
        (r"^\d{1,2}:\d{2}(:\d{2})?[AP]M$", TypeTag::Time),
    ]
    .into_iter()
    .map(|(p, tag)| (compile(p), tag))
    .collect()
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in classifier pattern must compile")
}

/// Classify a value using the default [`ClassifierOptions`].
pub fn classify(value: &RawValue) -> TypeTag {
    ValueClassifier::default().classify(value)
}

/// Stateless value classifier parameterized by [`ClassifierOptions`].
///
/// Cheap to copy and safe to share across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueClassifier {
    opts: ClassifierOptions,
}

impl ValueClassifier {
    /// Create a classifier with the given heuristics.
    pub fn new(opts: ClassifierOptions) -> Self {
        Self { opts }
    }

    /// Options in use.
    pub fn options(&self) -> ClassifierOptions {
        self.opts
    }

    /// Classify one value. Total: every input yields a tag, never [`TypeTag::Empty`].
    ///
    /// `Null` is classified like any other text (as `STRING`); callers that track nulls
    /// filter them out first.
    pub fn classify(&self, value: &RawValue) -> TypeTag {
        match value {
            RawValue::NativeDate(_) => TypeTag::Date,
            RawValue::NativeDateTime(dt) => self.classify_native_datetime(dt),
            other => self.classify_text(&other.as_text()),
        }
    }

    fn classify_native_datetime(&self, dt: &NaiveDateTime) -> TypeTag {
        if self.opts.native_midnight_is_date && dt.time() == NaiveTime::MIN {
            TypeTag::Date
        } else {
            TypeTag::Time
        }
    }

    /// Classify a textual value. Surrounding whitespace is ignored.
    pub fn classify_text(&self, raw: &str) -> TypeTag {
        let s = raw.trim();

        if is_boolean_literal(s) {
            return TypeTag::Boolean;
        }
        if INTEGER.is_match(s) {
            return TypeTag::Integer;
        }
        if self.is_decimal(s) {
            return TypeTag::Decimal;
        }

        TEMPORAL_PATTERNS
            .iter()
            .find(|(re, _)| re.is_match(s))
            .map_or(TypeTag::String, |(_, tag)| *tag)
    }

    fn is_decimal(&self, s: &str) -> bool {
        if self.opts.decimal_comma && s.contains(',') {
            DECIMAL.is_match(&s.replace(',', "."))
        } else {
            DECIMAL.is_match(s)
        }
    }
}

fn is_boolean_literal(s: &str) -> bool {
    // Longest literal is "verdadeiro"; skip the allocation for anything longer.
    if s.chars().count() > 10 {
        return false;
    }
    let lower = s.to_lowercase();
    BOOLEAN_LITERALS.contains(&lower.as_str())
}
