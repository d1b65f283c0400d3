//! Ingestion entrypoints and implementations.
//!
//! Readers here never interpret types: every cell becomes a [`crate::types::RawValue`] and
//! every column carries a source type label describing what the reader saw. Inference is left
//! to [`crate::profiling`].
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - performs ingestion into an in-memory [`crate::types::DataSet`]
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod observability;
pub mod parquet;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use unified::{
    discover_inputs, ingest_from_path, ExcelSheetSelection, IngestionFormat, IngestionOptions,
};

use std::collections::HashMap;

use crate::types::{Column, DataSet, RawValue};

/// Source type label for a column whose every value was missing.
pub(crate) const NULL_LABEL: &str = "null";
/// Source type label for a column that saw more than one value kind.
pub(crate) const MIXED_LABEL: &str = "mixed";

/// Tracks the value kinds a reader saw in one column, in first-seen order.
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceKinds {
    kinds: Vec<&'static str>,
}

impl SourceKinds {
    pub(crate) fn observe(&mut self, kind: &'static str) {
        if kind != NULL_LABEL && !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }

    pub(crate) fn label(&self) -> String {
        match self.kinds.as_slice() {
            [] => NULL_LABEL.to_string(),
            [only] => (*only).to_string(),
            _ => MIXED_LABEL.to_string(),
        }
    }
}

/// Make repeated header names unique by appending `.1`, `.2`, ... to later repeats.
///
/// A generated name that collides with an existing header is bumped again, so
/// `["a", "a", "a.1"]` becomes `["a", "a.1", "a.1.1"]`.
pub(crate) fn unique_header_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|mut name| {
            let mut seen = counts.get(&name).copied().unwrap_or(0);
            while seen > 0 {
                counts.insert(name.clone(), seen + 1);
                name = format!("{name}.{seen}");
                seen = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), seen + 1);
            name
        })
        .collect()
}

struct PendingColumn {
    name: String,
    kinds: SourceKinds,
    values: Vec<RawValue>,
}

/// Builds a [`DataSet`] row by row from keyed values.
///
/// Columns appear in first-seen order. A column first seen at row `n` is back-filled with
/// nulls, and columns missing from a row are padded with a null when the row ends.
pub(crate) struct DataSetBuilder {
    columns: Vec<PendingColumn>,
    index: HashMap<String, usize>,
    rows: usize,
}

impl DataSetBuilder {
    pub(crate) fn new() -> Self {
        Self {
            columns: Vec::new(),
            index: HashMap::new(),
            rows: 0,
        }
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    /// Set `name` in the current row.
    ///
    /// A repeated key within one row keeps the last value.
    pub(crate) fn push(&mut self, name: &str, value: RawValue, kind: &'static str) {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.columns.len();
                self.columns.push(PendingColumn {
                    name: name.to_string(),
                    kinds: SourceKinds::default(),
                    values: vec![RawValue::Null; self.rows],
                });
                self.index.insert(name.to_string(), idx);
                idx
            }
        };

        let col = &mut self.columns[idx];
        col.kinds.observe(kind);
        if col.values.len() > self.rows {
            col.values[self.rows] = value;
        } else {
            col.values.push(value);
        }
    }

    pub(crate) fn end_row(&mut self) {
        self.rows += 1;
        for col in &mut self.columns {
            if col.values.len() < self.rows {
                col.values.push(RawValue::Null);
            }
        }
    }

    pub(crate) fn finish(self) -> DataSet {
        DataSet::new(
            self.columns
                .into_iter()
                .map(|c| Column::new(c.name, c.kinds.label(), c.values))
                .collect(),
        )
    }
}
