use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use rust_column_profiling::config::ProfileOptions;
use rust_column_profiling::ingestion::parquet::ingest_parquet_from_path;
use rust_column_profiling::profiling::profile_dataset;
use rust_column_profiling::types::{RawValue, TypeTag};
use rust_column_profiling::ProfilingError;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("rust-column-profiling-{name}-{nanos}.parquet"))
}

fn write_people_parquet(path: &PathBuf) {
    let schema_str = r#"
        message schema {
          REQUIRED INT64 id;
          REQUIRED BINARY name (UTF8);
          REQUIRED DOUBLE score;
          REQUIRED BOOLEAN active;
          REQUIRED INT32 joined (DATE);
          REQUIRED INT64 seen (TIMESTAMP_MILLIS);
          OPTIONAL BINARY note (UTF8);
        }
    "#;

    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::Int64ColumnWriter(w) => {
                // col0 = id, col5 = seen (2024-01-31 08:15 and 2024-02-01 17:40 UTC).
                if col_idx == 0 {
                    w.write_batch(&[1_i64, 2_i64], None, None).unwrap();
                } else {
                    w.write_batch(&[1_706_688_900_000_i64, 1_706_809_200_000_i64], None, None)
                        .unwrap();
                }
            }
            ColumnWriter::Int32ColumnWriter(w) => {
                w.write_batch(&[19_753_i32, 19_754_i32], None, None).unwrap();
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                if col_idx == 1 {
                    let v1 = ByteArray::from("Ada");
                    let v2 = ByteArray::from("Grace");
                    w.write_batch(&[v1, v2], None, None).unwrap();
                } else {
                    // note: only the first row has a value.
                    let v1 = ByteArray::from("vip");
                    w.write_batch(&[v1], Some(&[1, 0]), None).unwrap();
                }
            }
            ColumnWriter::DoubleColumnWriter(w) => {
                w.write_batch(&[98.5_f64, 87.25_f64], None, None).unwrap();
            }
            ColumnWriter::BoolColumnWriter(w) => {
                w.write_batch(&[true, false], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

fn write_clock_parquet(path: &PathBuf) {
    let schema_str = r#"
        message schema {
          REQUIRED INT32 opens (TIME_MILLIS);
          REQUIRED INT64 closes (TIME_MICROS);
          REQUIRED DOUBLE ratio;
        }
    "#;

    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::Int32ColumnWriter(w) => {
                // 10:30 and 12:30.
                w.write_batch(&[37_800_000_i32, 45_000_000_i32], None, None).unwrap();
            }
            ColumnWriter::Int64ColumnWriter(w) => {
                // 18:00 and 18:30:00.250.
                w.write_batch(&[64_800_000_000_i64, 66_600_250_000_i64], None, None)
                    .unwrap();
            }
            ColumnWriter::DoubleColumnWriter(w) => {
                w.write_batch(&[1.5_f64, f64::NAN], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

fn write_nested_parquet(path: &PathBuf) {
    let schema_str = r#"
        message schema {
          REQUIRED INT64 id;
          REQUIRED group user {
            REQUIRED BINARY name (UTF8);
          }
        }
    "#;

    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::Int64ColumnWriter(w) => {
                w.write_batch(&[1_i64], None, None).unwrap();
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                w.write_batch(&[ByteArray::from("Ada")], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn ingest_parquet_happy_path() {
    let path = tmp_file("people");
    write_people_parquet(&path);

    let ds = ingest_parquet_from_path(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(ds.row_count(), 2);
    assert_eq!(
        ds.column_names().collect::<Vec<_>>(),
        vec!["id", "name", "score", "active", "joined", "seen", "note"]
    );
    assert_eq!(ds.column("id").unwrap().values, vec![RawValue::int(1), RawValue::int(2)]);
    assert_eq!(ds.column("id").unwrap().source_type, "INT64");
    assert_eq!(ds.column("name").unwrap().source_type, "BYTE_ARRAY (UTF8)");
    assert_eq!(ds.column("score").unwrap().values[1], RawValue::float(87.25));
    assert_eq!(ds.column("active").unwrap().values[0], RawValue::Boolean(true));
    assert_eq!(
        ds.column("joined").unwrap().values[0],
        RawValue::NativeDate(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
    );
    assert_eq!(
        ds.column("seen").unwrap().values[0],
        RawValue::NativeDateTime(
            NaiveDate::from_ymd_opt(2024, 1, 31)
                .unwrap()
                .and_hms_opt(8, 15, 0)
                .unwrap()
        )
    );
    assert_eq!(
        ds.column("note").unwrap().values,
        vec![RawValue::text("vip"), RawValue::Null]
    );
}

#[test]
fn parquet_native_types_drive_classification() {
    let path = tmp_file("people-profile");
    write_people_parquet(&path);

    let ds = ingest_parquet_from_path(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    let report = profile_dataset(&ds, &ProfileOptions::default());

    let tag = |name: &str| report.column(name).unwrap().dominant_type;
    assert_eq!(tag("id"), TypeTag::Integer);
    assert_eq!(tag("name"), TypeTag::String);
    assert_eq!(tag("score"), TypeTag::Decimal);
    assert_eq!(tag("active"), TypeTag::Boolean);
    assert_eq!(tag("joined"), TypeTag::Date);
    assert_eq!(tag("seen"), TypeTag::Time);

    let note = report.column("note").unwrap();
    assert_eq!(note.null_count, 1);
    assert_eq!(note.null_pct, 50.0);
    // Exactly at the threshold is not flagged.
    assert!(report.flagged_columns.is_empty());
}

#[test]
fn parquet_time_fields_render_as_clock_text() {
    let path = tmp_file("clock");
    write_clock_parquet(&path);

    let ds = ingest_parquet_from_path(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(ds.column("opens").unwrap().source_type, "INT32 (TIME_MILLIS)");
    assert_eq!(
        ds.column("opens").unwrap().values,
        vec![RawValue::text("10:30:00"), RawValue::text("12:30:00")]
    );
    assert_eq!(
        ds.column("closes").unwrap().values,
        vec![RawValue::text("18:00:00"), RawValue::text("18:30:00.250")]
    );

    let report = profile_dataset(&ds, &ProfileOptions::default());
    let opens = report.column("opens").unwrap();
    assert_eq!(opens.dominant_type, TypeTag::Time);
    assert_eq!(opens.confidence_pct, 100.0);
    // A non-zero fraction does not match the clock patterns.
    assert_eq!(report.column("closes").unwrap().confidence_pct, 50.0);
}

#[test]
fn parquet_nan_is_read_as_null() {
    let path = tmp_file("clock-nan");
    write_clock_parquet(&path);

    let ds = ingest_parquet_from_path(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(
        ds.column("ratio").unwrap().values,
        vec![RawValue::float(1.5), RawValue::Null]
    );

    let report = profile_dataset(&ds, &ProfileOptions::default());
    let ratio = report.column("ratio").unwrap();
    assert_eq!(ratio.dominant_type, TypeTag::Decimal);
    assert_eq!(ratio.null_count, 1);
    assert_eq!(ratio.null_pct, 50.0);
}

#[test]
fn ingest_parquet_rejects_nested_groups() {
    let path = tmp_file("nested");
    write_nested_parquet(&path);

    let err = ingest_parquet_from_path(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);

    match err {
        ProfilingError::InvalidInput { row, column, .. } => {
            assert_eq!(row, 1);
            assert_eq!(column, "user");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn ingest_parquet_missing_file_is_an_error() {
    let path = tmp_file("missing");
    assert!(ingest_parquet_from_path(&path).is_err());
}
