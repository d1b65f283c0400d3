//! Parquet ingestion implementation.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime};
use parquet::basic::ConvertedType;
use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::{ProfilingError, ProfilingResult};
use crate::types::{Column, DataSet, RawValue};

/// Days from 0001-01-01 (CE) to the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Ingest a Parquet file into an in-memory `DataSet`.
///
/// Notes:
/// - One column per top-level field, in schema order
/// - Source type label is the physical type, plus the converted type when present
///   (e.g. `"INT64"`, `"BYTE_ARRAY (UTF8)"`)
/// - `DATE` and `TIMESTAMP_*` values become native dates/datetimes; everything else that is
///   not a bool or a number is kept as its text rendering
/// - `TIME_*` values render as `HH:MM:SS`, with a fraction only when it is non-zero
/// - Float `NaN` is read as null
/// - Nested groups, lists and maps are rejected with [`ProfilingError::InvalidInput`]
/// - Uses the Parquet record API (`RowIter`)
pub fn ingest_parquet_from_path(path: impl AsRef<Path>) -> ProfilingResult<DataSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;

    let mut columns = top_level_columns(&reader);

    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        for col in &mut columns {
            col.values.push(RawValue::Null);
        }
        for (name, field) in row.get_column_iter() {
            let Some(col) = columns.iter_mut().find(|c| &c.name == name) else {
                continue;
            };
            let value = convert_parquet_field(row_num, name, field)?;
            if let Some(slot) = col.values.last_mut() {
                *slot = value;
            }
        }
    }

    tracing::debug!(
        columns = columns.len(),
        rows = columns.first().map_or(0, Column::len),
        "parquet ingested"
    );
    Ok(DataSet::new(columns))
}

fn top_level_columns<R: ChunkReader + 'static>(reader: &SerializedFileReader<R>) -> Vec<Column> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|t| {
            let label = if t.is_primitive() {
                let physical = t.get_physical_type().to_string();
                match t.get_basic_info().converted_type() {
                    ConvertedType::NONE => physical,
                    converted => format!("{physical} ({converted})"),
                }
            } else {
                "GROUP".to_string()
            };
            Column::new(t.name(), label, Vec::new())
        })
        .collect()
}

fn convert_parquet_field(row: usize, column: &str, f: &Field) -> ProfilingResult<RawValue> {
    let value = match f {
        Field::Null => RawValue::Null,
        Field::Bool(b) => RawValue::Boolean(*b),
        Field::Byte(v) => RawValue::int(i64::from(*v)),
        Field::Short(v) => RawValue::int(i64::from(*v)),
        Field::Int(v) => RawValue::int(i64::from(*v)),
        Field::Long(v) => RawValue::int(*v),
        Field::UByte(v) => RawValue::int(i64::from(*v)),
        Field::UShort(v) => RawValue::int(i64::from(*v)),
        Field::UInt(v) => RawValue::int(i64::from(*v)),
        Field::ULong(v) => match i64::try_from(*v) {
            Ok(i) => RawValue::int(i),
            Err(_) => RawValue::text(v.to_string()),
        },
        Field::Float(v) => RawValue::float(f64::from(*v)),
        Field::Double(v) => RawValue::float(*v),
        Field::TimeMillis(ms) => {
            let ms = i64::from(*ms);
            time_of_day(ms.div_euclid(1_000), ms.rem_euclid(1_000) * 1_000_000)
                .ok_or_else(|| out_of_range(row, column, f))?
        }
        Field::TimeMicros(us) => {
            time_of_day(us.div_euclid(1_000_000), us.rem_euclid(1_000_000) * 1_000)
                .ok_or_else(|| out_of_range(row, column, f))?
        }
        Field::Str(s) => RawValue::text(s.as_str()),
        Field::Date(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(RawValue::NativeDate)
            .ok_or_else(|| out_of_range(row, column, f))?,
        Field::TimestampMillis(ms) => DateTime::from_timestamp_millis(*ms)
            .map(|dt| RawValue::NativeDateTime(dt.naive_utc()))
            .ok_or_else(|| out_of_range(row, column, f))?,
        Field::TimestampMicros(us) => DateTime::from_timestamp_micros(*us)
            .map(|dt| RawValue::NativeDateTime(dt.naive_utc()))
            .ok_or_else(|| out_of_range(row, column, f))?,
        Field::Group(_) | Field::ListInternal(_) | Field::MapInternal(_) => {
            return Err(ProfilingError::InvalidInput {
                row,
                column: column.to_string(),
                message: "nested groups, lists and maps are not supported".to_string(),
            });
        }
        other => RawValue::text(other.to_string()),
    };
    Ok(value)
}

fn time_of_day(secs: i64, nanos: i64) -> Option<RawValue> {
    let t = NaiveTime::from_num_seconds_from_midnight_opt(
        u32::try_from(secs).ok()?,
        u32::try_from(nanos).ok()?,
    )?;
    Some(RawValue::text(t.to_string()))
}

fn out_of_range(row: usize, column: &str, f: &Field) -> ProfilingError {
    ProfilingError::InvalidInput {
        row,
        column: column.to_string(),
        message: format!("temporal value out of range: {f}"),
    }
}
