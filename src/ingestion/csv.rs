//! CSV ingestion implementation.

use std::path::Path;

use super::unique_header_names;
use crate::error::ProfilingResult;
use crate::types::{Column, DataSet, RawValue};

/// Source type label for CSV columns.
pub const CSV_SOURCE_TYPE: &str = "text";

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers; the header row gives the column names. Repeated names get a
///   `.1`, `.2`, ... suffix.
/// - Every cell is kept as [`RawValue::Text`], untrimmed. Empty cells are [`RawValue::Null`].
/// - Rows shorter than the header are padded with nulls; extra trailing cells are ignored.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> ProfilingResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an in-memory string.
pub fn ingest_csv_from_str(input: &str) -> ProfilingResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> ProfilingResult<DataSet> {
    let headers = rdr.headers()?.clone();

    let mut columns: Vec<Column> = unique_header_names(headers.iter().map(str::to_string))
        .into_iter()
        .map(|h| Column::new(h, CSV_SOURCE_TYPE, Vec::new()))
        .collect();

    for result in rdr.records() {
        let record = result?;
        for (idx, col) in columns.iter_mut().enumerate() {
            let value = match record.get(idx) {
                None | Some("") => RawValue::Null,
                Some(raw) => RawValue::text(raw),
            };
            col.values.push(value);
        }
    }

    tracing::debug!(
        columns = columns.len(),
        rows = columns.first().map_or(0, Column::len),
        "csv ingested"
    );
    Ok(DataSet::new(columns))
}

#[cfg(test)]
mod tests {
    use super::ingest_csv_from_str;
    use crate::types::RawValue;

    #[test]
    fn keeps_whitespace_cells_as_text() {
        let ds = ingest_csv_from_str("a,b\n  ,x\n,y\n").unwrap();
        assert_eq!(ds.columns[0].values, vec![RawValue::text("  "), RawValue::Null]);
    }

    #[test]
    fn header_only_gives_empty_columns() {
        let ds = ingest_csv_from_str("a,b\n").unwrap();
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.row_count(), 0);
    }

    #[test]
    fn repeated_headers_are_made_unique() {
        let ds = ingest_csv_from_str("id,id,name\n1,2,x\n").unwrap();
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["id", "id.1", "name"]);
        assert_eq!(ds.column("id.1").unwrap().values, vec![RawValue::text("2")]);
    }
}
