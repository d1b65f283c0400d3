//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object (one row)
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Columns are the union of keys across rows, in first-seen order. Nested objects are
//! flattened into dot paths (`{"user":{"name":"Ada"}}` becomes column `user.name`).

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{ProfilingError, ProfilingResult};
use crate::types::{DataSet, RawValue};

use super::DataSetBuilder;

/// Ingest a JSON or NDJSON file into an in-memory [`DataSet`].
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> ProfilingResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest JSON from an in-memory string into a [`DataSet`].
///
/// Missing keys become [`RawValue::Null`]. Arrays cannot be represented as a single raw value
/// and are rejected with [`ProfilingError::InvalidInput`].
pub fn ingest_json_from_str(input: &str) -> ProfilingResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ProfilingError::Malformed {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        match v {
            Value::Array(items) => ingest_json_values(&items),
            Value::Object(_) => ingest_json_values(std::slice::from_ref(&v)),
            _ => Err(ProfilingError::Malformed {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<Value>(line).map_err(|e| ProfilingError::Malformed {
                message: format!("invalid ndjson at line {}: {}", i + 1, e),
            })?;
            values.push(v);
        }
        ingest_json_values(&values)
    }
}

fn ingest_json_values(values: &[Value]) -> ProfilingResult<DataSet> {
    let mut builder = DataSetBuilder::new();

    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = v.as_object().ok_or_else(|| ProfilingError::Malformed {
            message: format!("row {row_num} is not a json object"),
        })?;
        flatten_into(&mut builder, row_num, None, obj)?;
        builder.end_row();
    }

    tracing::debug!(rows = builder.rows(), "json ingested");
    Ok(builder.finish())
}

fn flatten_into(
    builder: &mut DataSetBuilder,
    row: usize,
    prefix: Option<&str>,
    obj: &Map<String, Value>,
) -> ProfilingResult<()> {
    for (key, v) in obj {
        let path = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match v {
            Value::Object(inner) => flatten_into(builder, row, Some(&path), inner)?,
            Value::Array(_) => {
                return Err(ProfilingError::InvalidInput {
                    row,
                    column: path,
                    message: "arrays are not supported".to_string(),
                });
            }
            scalar => {
                let (value, kind) = convert_json_scalar(scalar);
                builder.push(&path, value, kind);
            }
        }
    }
    Ok(())
}

fn convert_json_scalar(v: &Value) -> (RawValue, &'static str) {
    match v {
        Value::Bool(b) => (RawValue::Boolean(*b), "boolean"),
        Value::Number(n) => {
            let value = match n.as_i64() {
                Some(i) => RawValue::int(i),
                None => n.as_f64().map_or(RawValue::Null, RawValue::float),
            };
            (value, "number")
        }
        Value::String(s) => (RawValue::text(s.as_str()), "string"),
        _ => (RawValue::Null, "null"),
    }
}

#[cfg(test)]
mod tests {
    use super::ingest_json_from_str;
    use crate::types::RawValue;

    #[test]
    fn integral_and_fractional_numbers_stay_distinct() {
        let ds = ingest_json_from_str(r#"[{"n": 3}, {"n": 2.5}, {"n": 1.0}]"#).unwrap();
        assert_eq!(
            ds.columns[0].values,
            vec![RawValue::int(3), RawValue::float(2.5), RawValue::float(1.0)]
        );
    }

    #[test]
    fn single_object_is_one_row() {
        let ds = ingest_json_from_str(r#"{"a": "x", "b": null}"#).unwrap();
        assert_eq!(ds.row_count(), 1);
        assert_eq!(ds.columns[1].values, vec![RawValue::Null]);
        assert_eq!(ds.columns[1].source_type, "null");
    }
}
