//! Profiling options.
//!
//! Every option has a default, so most callers use
//! [`ProfileOptions::default()`]. Options can also be loaded from JSON, where missing keys
//! fall back to their defaults:
//!
//! ```rust
//! use rust_column_profiling::config::ProfileOptions;
//!
//! let opts = ProfileOptions::from_json_str(r#"{ "null_flag_threshold_pct": 25.0 }"#).unwrap();
//! assert_eq!(opts.null_flag_threshold_pct, 25.0);
//! assert_eq!(opts.sample_value_count, 3);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProfilingError, ProfilingResult};

/// Heuristics used by the value classifier.
///
/// Both switches encode assumptions about how upstream sources format their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Treat a native timestamp at exactly `00:00:00` as a date.
    ///
    /// Spreadsheet sources store date-only cells as midnight timestamps. When `false`, every
    /// native timestamp is classified as a time.
    pub native_midnight_is_date: bool,
    /// Accept `,` as the decimal separator (`"2,3"` is a decimal).
    pub decimal_comma: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            native_midnight_is_date: true,
            decimal_comma: true,
        }
    }
}

/// Options for column profiling and report aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOptions {
    /// Classifier heuristics.
    pub classifier: ClassifierOptions,
    /// How many non-null values to keep as `sample_values` per column.
    pub sample_value_count: usize,
    /// Columns with a null percentage strictly above this value are flagged.
    pub null_flag_threshold_pct: f64,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            classifier: ClassifierOptions::default(),
            sample_value_count: 3,
            null_flag_threshold_pct: 50.0,
        }
    }
}

impl ProfileOptions {
    /// Parse options from JSON text and validate them.
    pub fn from_json_str(input: &str) -> ProfilingResult<Self> {
        let opts: Self = serde_json::from_str(input)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read options from a JSON file and validate them.
    pub fn from_json_path(path: impl AsRef<Path>) -> ProfilingResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ProfilingResult<()> {
        let t = self.null_flag_threshold_pct;
        if !(0.0..=100.0).contains(&t) {
            return Err(ProfilingError::InvalidConfig {
                message: format!("null_flag_threshold_pct must be within [0, 100], got {t}"),
            });
        }
        Ok(())
    }
}
