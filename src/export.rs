//! Export of profiling reports.
//!
//! The tabular export has one row per column with fixed headers:
//!
//! `Column, DetectedType, Confidence(%), UniqueValues, NullValues, Null(%), SourceType`
//!
//! ```rust
//! use rust_column_profiling::config::ProfileOptions;
//! use rust_column_profiling::export::to_csv_string;
//! use rust_column_profiling::profiling::profile_dataset;
//! use rust_column_profiling::types::{Column, DataSet};
//!
//! let ds = DataSet::new(vec![Column::from_texts("qty", &["1", "2", ""])]);
//! let report = profile_dataset(&ds, &ProfileOptions::default());
//! let csv = to_csv_string(&report).unwrap();
//! assert!(csv.starts_with("Column,DetectedType,Confidence(%)"));
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{ProfilingError, ProfilingResult};
use crate::profiling::column::round2;
use crate::types::{ColumnProfile, DatasetReport, TypeTag};

/// UTF-8 byte order mark, so spreadsheet tools detect the encoding of exported CSV files.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One exported row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Column")]
    pub column: String,
    #[serde(rename = "DetectedType")]
    pub detected_type: TypeTag,
    #[serde(rename = "Confidence(%)")]
    pub confidence_pct: f64,
    #[serde(rename = "UniqueValues")]
    pub unique_values: usize,
    #[serde(rename = "NullValues")]
    pub null_values: usize,
    /// Rounded to 2 decimals.
    #[serde(rename = "Null(%)")]
    pub null_pct: f64,
    #[serde(rename = "SourceType")]
    pub source_type: String,
}

impl From<&ColumnProfile> for ExportRow {
    fn from(p: &ColumnProfile) -> Self {
        Self {
            column: p.name.clone(),
            detected_type: p.dominant_type,
            confidence_pct: p.confidence_pct,
            unique_values: p.unique_count,
            null_values: p.null_count,
            null_pct: round2(p.null_pct),
            source_type: p.source_type.clone(),
        }
    }
}

/// Export rows for every profiled column, in input order.
pub fn export_rows(report: &DatasetReport) -> Vec<ExportRow> {
    report.columns.iter().map(ExportRow::from).collect()
}

/// Write the report as CSV (with a header row) to any writer.
pub fn write_csv<W: Write>(report: &DatasetReport, writer: W) -> ProfilingResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if report.is_empty() {
        // `serialize` derives headers from the first record; write them explicitly here.
        wtr.write_record([
            "Column",
            "DetectedType",
            "Confidence(%)",
            "UniqueValues",
            "NullValues",
            "Null(%)",
            "SourceType",
        ])?;
    }
    for row in export_rows(report) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render the report as a CSV string.
pub fn to_csv_string(report: &DatasetReport) -> ProfilingResult<String> {
    let mut buf = Vec::new();
    write_csv(report, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ProfilingError::Malformed {
        message: format!("exported csv is not utf-8: {e}"),
    })
}

/// Write the report as a CSV file, optionally prefixed with a UTF-8 byte order mark.
pub fn write_csv_to_path(
    report: &DatasetReport,
    path: impl AsRef<Path>,
    with_bom: bool,
) -> ProfilingResult<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    if with_bom {
        out.write_all(UTF8_BOM)?;
    }
    write_csv(report, &mut out)?;
    out.flush()?;
    tracing::debug!(
        path = %path.as_ref().display(),
        columns = report.column_count(),
        "report exported"
    );
    Ok(())
}

/// Render the full report (profiles, distribution, flagged columns) as pretty JSON.
pub fn to_json_string(report: &DatasetReport) -> ProfilingResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
