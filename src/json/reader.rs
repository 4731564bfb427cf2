//! JSON log reader.
//!
//! Each line is decoded independently. With a schema, keys must exist in
//! it and values coerce through their field types; without one, the reader
//! warns once and builds an ad-hoc all-`any` schema per line from that
//! line's own keys.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde_json::Value as Json;
use tracing::warn;

use super::JsonLog;
use crate::error::{Error, ModelError, ParserError, Result, TypeError};
use crate::schema::{RawValue, Record, Schema, SchemaBuilder};
use crate::types::{FieldType, TypeKind};

/// Reader configuration: an optional schema the lines must conform to.
#[derive(Debug, Clone, Default)]
pub struct JsonReadOptions {
    pub schema: Option<Arc<Schema>>,
}

impl JsonReadOptions {
    /// Decode against an explicit schema.
    pub fn with_schema(schema: Arc<Schema>) -> Self {
        Self {
            schema: Some(schema),
        }
    }
}

/// Read a JSON log from any buffered input.
pub fn read<R: BufRead>(input: R, options: &JsonReadOptions) -> Result<JsonLog> {
    if options.schema.is_none() {
        warn!("no schema specified for JSON log, values will be typed as any");
    }

    let mut records = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let lineno = i + 1;
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let decoded: Json = serde_json::from_str(&line).map_err(|e| ParserError::Json {
            msg: e.to_string(),
            lineno,
            field: None,
        })?;
        let object = match decoded {
            Json::Object(object) => object,
            other => {
                return Err(ParserError::Json {
                    msg: format!("expected one object per line, got {other}"),
                    lineno,
                    field: None,
                }
                .into());
            }
        };

        let record = match &options.schema {
            Some(schema) => read_with_schema(schema, object, lineno)?,
            None => read_schemaless(object, lineno)?,
        };
        records.push(record);
    }
    Ok(JsonLog { records })
}

/// Read a JSON log from a file path.
pub fn read_path(path: impl AsRef<Path>, options: &JsonReadOptions) -> Result<JsonLog> {
    let file = File::open(path)?;
    read(BufReader::new(file), options)
}

/// Read a JSON log from an in-memory buffer.
pub fn read_bytes(bytes: &[u8], options: &JsonReadOptions) -> Result<JsonLog> {
    read(bytes, options)
}

fn read_with_schema(
    schema: &Arc<Schema>,
    object: serde_json::Map<String, Json>,
    lineno: usize,
) -> Result<Record> {
    let mut keyword = Vec::with_capacity(object.len());
    for (key, value) in object {
        if !schema.contains(&key) {
            return Err(ParserError::Json {
                msg: format!("unknown field: {key}"),
                lineno,
                field: Some(key),
            }
            .into());
        }
        keyword.push((key, RawValue::Json(value)));
    }

    Record::new(schema.clone(), Vec::<RawValue>::new(), keyword).map_err(|e| match e {
        Error::Type(TypeError::Type { msg }) | Error::Type(TypeError::Value { msg }) => {
            ParserError::Json {
                msg,
                lineno,
                field: None,
            }
            .into()
        }
        Error::Model(ModelError::Type { msg }) => ParserError::Json {
            msg,
            lineno,
            field: None,
        }
        .into(),
        other => other,
    })
}

// Ad-hoc schema from this line's own keys, everything typed `any`.
fn read_schemaless(object: serde_json::Map<String, Json>, lineno: usize) -> Result<Record> {
    let mut builder = SchemaBuilder::new();
    for key in object.keys() {
        builder = builder.annotate(key.as_str(), FieldType::new(TypeKind::Any));
    }
    let schema = Arc::new(builder.build()?);

    let keyword: Vec<(String, RawValue)> = object
        .into_iter()
        .map(|(key, value)| (key, RawValue::Json(value)))
        .collect();
    Record::new(schema, Vec::<RawValue>::new(), keyword).map_err(|e| match e {
        Error::Model(ModelError::Type { msg }) => Error::from(ParserError::Json {
            msg,
            lineno,
            field: None,
        }),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn conn_schema() -> Arc<Schema> {
        Arc::new(
            SchemaBuilder::new()
                .annotate("ts", FieldType::new(TypeKind::Time))
                .annotate("id", FieldType::new(TypeKind::Count))
                .annotate("host", FieldType::new(TypeKind::Addr))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_read_with_schema() {
        let input = br#"{"ts": 1577836800.0, "id": 42, "host": "10.0.0.1"}"#;
        let options = JsonReadOptions::with_schema(conn_schema());
        let log = read_bytes(input, &options).unwrap();
        assert_eq!(log.records.len(), 1);
        assert_eq!(log.records[0].get("id"), Some(&Value::Count(42)));
        assert_eq!(
            log.records[0].get("host"),
            Some(&Value::Addr("10.0.0.1".parse().unwrap()))
        );
    }

    #[test]
    fn test_unknown_key_with_schema() {
        let input = br#"{"ts": 1577836800.0, "id": 42, "host": "10.0.0.1", "extra": 1}"#;
        let options = JsonReadOptions::with_schema(conn_schema());
        let err = read_bytes(input, &options).unwrap_err();
        match err {
            Error::Parser(ParserError::Json { lineno, field, .. }) => {
                assert_eq!(lineno, 1);
                assert_eq!(field.as_deref(), Some("extra"));
            }
            other => panic!("expected JSON parser error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_with_schema() {
        let input = br#"{"ts": 1577836800.0, "id": 42}"#;
        let options = JsonReadOptions::with_schema(conn_schema());
        let err = read_bytes(input, &options).unwrap_err();
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn test_null_value_is_unset() {
        let input = br#"{"ts": 1577836800.0, "id": 42, "host": null}"#;
        let options = JsonReadOptions::with_schema(conn_schema());
        let log = read_bytes(input, &options).unwrap();
        assert_eq!(log.records[0].get("host"), None);
    }

    #[test]
    fn test_schemaless_decode() {
        let input = br#"{"a": 1, "b": "x"}"#;
        let log = read_bytes(input, &JsonReadOptions::default()).unwrap();
        let rec = &log.records[0];
        assert_eq!(
            rec.get("a"),
            Some(&Value::Any(serde_json::json!(1)))
        );
        assert_eq!(
            rec.get("b"),
            Some(&Value::Any(serde_json::json!("x")))
        );

        let dict = rec.as_dict();
        let keys: Vec<_> = dict.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_malformed_line_carries_lineno() {
        let input = b"{\"a\": 1}\nnot json\n";
        let err = read_bytes(input, &JsonReadOptions::default()).unwrap_err();
        match err {
            Error::Parser(ParserError::Json { lineno, .. }) => assert_eq!(lineno, 2),
            other => panic!("expected JSON parser error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_line_rejected() {
        let err = read_bytes(b"[1, 2]\n", &JsonReadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("expected one object per line"));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let input = b"{\"a\": 1}\n\n{\"a\": 2}\n";
        let log = read_bytes(input, &JsonReadOptions::default()).unwrap();
        assert_eq!(log.records.len(), 2);
    }
}
