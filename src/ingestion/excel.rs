#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{ProfilingError, ProfilingResult};
use crate::types::{Column, DataSet, RawValue};

use super::{unique_header_names, SourceKinds};

/// Ingest one sheet of an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into a `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row; blank header cells become
///   `Unnamed: N` (0-based column position); repeated names get a `.1`, `.2`, ... suffix
/// - Excel date cells become native datetimes; durations and error cells are kept as text
/// - Source type label comes from the cell kinds seen in each column (`int`, `float`,
///   `string`, `bool`, `datetime`, `duration`, `error`, or `mixed`)
pub fn ingest_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
) -> ProfilingResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = match sheet_name {
        Some(s) => s.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ProfilingError::Malformed {
                message: "workbook has no sheets".to_string(),
            })?,
    };
    let range = workbook.worksheet_range(&sheet)?;
    Ok(ingest_sheet_range(&sheet, &range))
}

/// Ingest several sheets of a workbook, each into its own `DataSet`.
///
/// - If `sheet_names` is `None`, ingests **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, ingests only those sheets (in the provided order).
///
/// Sheets are kept apart so they can be profiled separately.
pub fn ingest_excel_sheets(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
) -> ProfilingResult<Vec<(String, DataSet)>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheets: Vec<String> = match sheet_names {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => workbook.sheet_names().to_vec(),
    };

    let mut out = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let ds = ingest_sheet_range(&sheet, &range);
        out.push((sheet, ds));
    }
    Ok(out)
}

/// List the sheet names of a workbook, in workbook order.
pub fn sheet_names(path: impl AsRef<Path>) -> ProfilingResult<Vec<String>> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names().to_vec())
}

fn ingest_sheet_range(sheet: &str, range: &Range<Data>) -> DataSet {
    let mut rows = range.rows();

    // A sheet without any non-empty row has no header and therefore no columns.
    let Some(header) = rows.find(|row| row.iter().any(|c| !matches!(c, Data::Empty))) else {
        tracing::debug!(sheet, "sheet has no header row");
        return DataSet::default();
    };

    let names = header.iter().enumerate().map(|(idx, cell)| {
        let name = cell_to_header_string(cell);
        if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        }
    });
    let mut columns: Vec<Column> = unique_header_names(names)
        .into_iter()
        .map(|name| Column::new(name, String::new(), Vec::new()))
        .collect();
    let mut kinds = vec![SourceKinds::default(); columns.len()];

    for row in rows {
        for (idx, col) in columns.iter_mut().enumerate() {
            let cell = row.get(idx).unwrap_or(&Data::Empty);
            let (value, kind) = convert_cell(cell);
            kinds[idx].observe(kind);
            col.values.push(value);
        }
    }

    for (col, k) in columns.iter_mut().zip(&kinds) {
        col.source_type = k.label();
    }

    tracing::debug!(
        sheet,
        columns = columns.len(),
        rows = columns.first().map_or(0, Column::len),
        "sheet ingested"
    );
    DataSet::new(columns)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> (RawValue, &'static str) {
    match c {
        Data::Empty => (RawValue::Null, "null"),
        Data::Int(i) => (RawValue::int(*i), "int"),
        // Workbooks store every number as a float; whole numbers are read back as integers.
        Data::Float(f) if is_whole(*f) => (RawValue::int(*f as i64), "int"),
        Data::Float(f) if f.is_nan() => (RawValue::Null, "null"),
        Data::Float(f) => (RawValue::float(*f), "float"),
        Data::String(s) => (RawValue::text(s.as_str()), "string"),
        Data::Bool(b) => (RawValue::Boolean(*b), "bool"),
        Data::DateTime(dt) if dt.is_duration() => (RawValue::text(c.to_string()), "duration"),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => (RawValue::NativeDateTime(ndt), "datetime"),
            None => (RawValue::text(c.to_string()), "datetime"),
        },
        Data::DateTimeIso(s) => (parse_iso_datetime(s), "datetime"),
        Data::DurationIso(s) => (RawValue::text(s.as_str()), "duration"),
        Data::Error(_) => (RawValue::text(c.to_string()), "error"),
    }
}

fn is_whole(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0
}

fn parse_iso_datetime(s: &str) -> RawValue {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return RawValue::NativeDateTime(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return RawValue::NativeDate(d);
    }
    RawValue::text(s)
}
