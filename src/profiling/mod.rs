//! Column type inference and profiling.
//!
//! The profiling layer is a strictly downstream pipeline:
//!
//! - [`classify()`]: one raw value -> one [`crate::types::TypeTag`]
//! - [`ColumnProfiler`]: one column -> [`crate::types::ColumnProfile`]
//! - [`ReportAggregator`]: all profiles -> [`crate::types::DatasetReport`]
//!
//! [`profile_dataset`] runs all three sequentially. For a parallel run over many columns use
//! [`crate::execution::ProfilingEngine`], which produces the same report.
//!
//! ## Example
//!
//! ```rust
//! use rust_column_profiling::config::ProfileOptions;
//! use rust_column_profiling::profiling::profile_dataset;
//! use rust_column_profiling::types::{Column, DataSet, RawValue, TypeTag};
//!
//! let ds = DataSet::new(vec![
//!     Column::from_texts("qty", &["12", "7", "30"]),
//!     Column::from_texts("price", &["1,50", "2.75", "3,00"]),
//!     Column::new("notes", "text", vec![RawValue::Null, RawValue::Null, RawValue::text("ok")]),
//! ]);
//!
//! let report = profile_dataset(&ds, &ProfileOptions::default());
//! assert_eq!(report.columns[0].dominant_type, TypeTag::Integer);
//! assert_eq!(report.columns[1].dominant_type, TypeTag::Decimal);
//! assert_eq!(report.flagged_columns[0].name, "notes");
//! ```

pub mod classify;
pub mod column;
pub mod report;

pub use classify::{classify, ValueClassifier, BOOLEAN_LITERALS};
pub use column::ColumnProfiler;
pub use report::{aggregate, ReportAggregator};

use crate::config::ProfileOptions;
use crate::types::{ColumnProfile, DataSet, DatasetReport};

/// Profile every column of `dataset` and aggregate the result.
pub fn profile_dataset(dataset: &DataSet, opts: &ProfileOptions) -> DatasetReport {
    let profiles = profile_columns(dataset, opts);
    ReportAggregator::new(opts).aggregate(profiles)
}

/// Profile every column of `dataset`, in column order, without aggregating.
pub fn profile_columns(dataset: &DataSet, opts: &ProfileOptions) -> Vec<ColumnProfile> {
    let profiler = ColumnProfiler::new(opts);
    dataset
        .columns
        .iter()
        .map(|c| profiler.profile_column(c))
        .collect()
}
