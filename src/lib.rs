//! `rust-column-profiling` infers the dominant logical type of every column of a tabular
//! dataset and reports per-column data quality.
//!
//! Raw cell values are classified one by one into a small closed set of logical types
//! ([`types::TypeTag`]): `INTEGER`, `DECIMAL`, `DATE`, `TIME`, `BOOLEAN` and `STRING`. Each
//! column is then profiled by majority vote, which gives its dominant type, a confidence
//! percentage, and distinct/null statistics. Finally a dataset report summarizes the type
//! distribution and flags columns with too many missing values.
//!
//! ## Pipeline
//!
//! - [`ingestion`]: read CSV, JSON/NDJSON, Parquet or Excel (feature `excel`) into a
//!   [`types::DataSet`] of untyped [`types::RawValue`]s
//! - [`profiling`]: classify values, profile columns, aggregate the report
//! - [`execution`]: profile columns in parallel with metrics and observer hooks
//! - [`export`]: write the report as CSV or JSON
//!
//! ## Quick example
//!
//! ```rust
//! use rust_column_profiling::config::ProfileOptions;
//! use rust_column_profiling::profiling::profile_dataset;
//! use rust_column_profiling::types::{Column, DataSet, TypeTag};
//!
//! let ds = DataSet::new(vec![
//!     Column::from_texts("id", &["1", "2", "3"]),
//!     Column::from_texts("when", &["01/02/2023", "2023-05-01 10:30", "x"]),
//! ]);
//! let report = profile_dataset(&ds, &ProfileOptions::default());
//!
//! assert_eq!(report.columns[0].dominant_type, TypeTag::Integer);
//! assert_eq!(report.columns[1].dominant_type, TypeTag::Date);
//! assert_eq!(report.columns[1].confidence_pct, 33.33);
//! ```
//!
//! ## Ingest, profile in parallel, export
//!
//! ```no_run
//! use rust_column_profiling::config::ProfileOptions;
//! use rust_column_profiling::execution::{ExecutionOptions, ProfilingEngine};
//! use rust_column_profiling::export::write_csv_to_path;
//! use rust_column_profiling::ingestion::{ingest_from_path, IngestionOptions};
//!
//! # fn main() -> Result<(), rust_column_profiling::ProfilingError> {
//! let ds = ingest_from_path("tabela.csv", &IngestionOptions::default())?;
//! let engine = ProfilingEngine::new(ExecutionOptions::default())?;
//! let report = engine.profile_dataset(&ds, &ProfileOptions::default());
//! for line in report.summary_lines() {
//!     println!("{line}");
//! }
//! write_csv_to_path(&report, "analise_tipos_dados.csv", true)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (per-column results at `debug`) and never installs a
//! subscriber; install one in your binary to see them.

pub mod config;
pub mod error;
pub mod execution;
pub mod export;
pub mod ingestion;
pub mod profiling;
pub mod types;

pub use error::{ProfilingError, ProfilingResult};
