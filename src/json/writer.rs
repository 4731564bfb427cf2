//! JSON log writer.
//!
//! One compact JSON object per record per line, keys in schema order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, WriterError};
use crate::schema::Record;

/// Write records as a line-delimited JSON log.
pub fn write<W: Write>(out: W, records: &[Record]) -> Result<()> {
    let mut out = out;
    for (i, record) in records.iter().enumerate() {
        let object = record.to_json().map_err(|e| WriterError::Json {
            msg: e.to_string(),
            lineno: i + 1,
            field: None,
        })?;
        serde_json::to_writer(&mut out, &object).map_err(|e| WriterError::Json {
            msg: e.to_string(),
            lineno: i + 1,
            field: None,
        })?;
        writeln!(out)?;
    }
    Ok(())
}

/// Write records as a JSON log file.
pub fn write_path(path: impl AsRef<Path>, records: &[Record]) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write(&mut out, records)?;
    out.flush()?;
    Ok(())
}

/// Render records as an in-memory JSON log.
pub fn write_string(records: &[Record]) -> Result<String> {
    let mut buf = Vec::new();
    write(&mut buf, records)?;
    Ok(String::from_utf8(buf).expect("JSON output is UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{read_bytes, JsonReadOptions};
    use crate::schema::{RawValue, SchemaBuilder};
    use crate::types::{FieldType, TypeKind, Value};
    use compact_str::CompactString;
    use std::sync::Arc;

    fn sample_records() -> Vec<Record> {
        let schema = Arc::new(
            SchemaBuilder::new()
                .annotate("id", FieldType::new(TypeKind::Count))
                .annotate("msg", FieldType::new(TypeKind::String))
                .build()
                .unwrap(),
        );
        vec![
            Record::new(
                schema.clone(),
                vec!["1".into(), "first".into()],
                Vec::<(CompactString, RawValue)>::new(),
            )
            .unwrap(),
            Record::new(
                schema,
                vec!["2".into(), RawValue::Null],
                Vec::<(CompactString, RawValue)>::new(),
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_one_object_per_line() {
        let rendered = write_string(&sample_records()).unwrap();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"id":1,"msg":"first"}"#);
        assert_eq!(lines[1], r#"{"id":2,"msg":null}"#);
    }

    #[test]
    fn test_roundtrip_through_schema() {
        let rendered = write_string(&sample_records()).unwrap();
        let schema = sample_records()[0].schema().clone();
        let log = read_bytes(
            rendered.as_bytes(),
            &JsonReadOptions::with_schema(schema),
        )
        .unwrap();
        assert_eq!(log.records[0].get("id"), Some(&Value::Count(1)));
        assert_eq!(log.records[1].get("msg"), None);
    }

    #[test]
    fn test_non_representable_value_is_writer_error() {
        let schema = Arc::new(
            SchemaBuilder::new()
                .annotate("x", FieldType::new(TypeKind::Double))
                .build()
                .unwrap(),
        );
        let record = Record::new(
            schema,
            vec![RawValue::from(Value::Double(f64::NAN))],
            Vec::<(CompactString, RawValue)>::new(),
        )
        .unwrap();
        let err = write_string(&[record]).unwrap_err();
        match err {
            crate::error::Error::Writer(WriterError::Json { lineno, .. }) => {
                assert_eq!(lineno, 1)
            }
            other => panic!("expected writer error, got {other:?}"),
        }
    }
}
