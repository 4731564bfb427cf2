//! ASCII log reader.
//!
//! An 8-state linear scan over the directive header, then one record per
//! line until the `#close` trailer. Malformed tokens fail fast with line
//! and field attribution; a missing trailer degrades to a warning plus
//! `exit_with_error`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use compact_str::CompactString;
use smallvec::SmallVec;
use tracing::warn;

use super::{AsciiLog, DIRECTIVE_TIME_FORMAT};
use crate::error::{Error, ParserError, Result};
use crate::schema::{Record, Schema, SchemaBuilder};
use crate::types::{
    resolve_type_name, unescape, EnumBinding, EnumNamespaceRegistry, FieldType, Placeholders,
    TypeTable,
};

/// Reader configuration.
///
/// `enum_namespaces`/`bare_enums` select which registry namespaces back the
/// `enum` columns; `type_table` lets callers override scalar name
/// resolution.
#[derive(Debug, Clone, Default)]
pub struct AsciiReadOptions {
    pub enum_registry: EnumNamespaceRegistry,
    pub enum_namespaces: Vec<String>,
    pub bare_enums: bool,
    pub type_table: TypeTable,
}

/// Header scan position. States advance strictly in declaration order;
/// after `Types` every line is a record or the trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Separator,
    SetSeparator,
    EmptyField,
    UnsetField,
    Path,
    Open,
    Fields,
    Types,
    Records,
}

/// Read an ASCII log from any buffered input.
pub fn read<R: BufRead>(input: R, options: &AsciiReadOptions) -> Result<AsciiLog> {
    let mut state = State::Separator;
    let mut lineno = 0usize;

    let mut separator = '\t';
    let mut set_separator = CompactString::const_new(",");
    let mut empty_field = CompactString::const_new("(empty)");
    let mut unset_field = CompactString::const_new("-");
    let mut path = String::new();
    let mut open = DateTime::<Utc>::UNIX_EPOCH;
    let mut field_names: Vec<CompactString> = Vec::new();

    let mut schema: Option<Arc<Schema>> = None;
    let mut records = Vec::new();
    let mut close: Option<DateTime<Utc>> = None;

    for line in input.lines() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        lineno += 1;

        match state {
            State::Separator => {
                let value = line
                    .strip_prefix("#separator ")
                    .ok_or_else(|| bad_line(lineno, "expected #separator directive"))?;
                let decoded = unescape(value)
                    .map_err(|e| bad_line(lineno, format!("bad #separator value: {e}")))?;
                let mut chars = decoded.chars();
                separator = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(bad_line(lineno, "separator must be a single byte").into());
                    }
                };
                state = State::SetSeparator;
            }
            State::SetSeparator => {
                set_separator = directive(line, "set_separator", separator, lineno)?.into();
                state = State::EmptyField;
            }
            State::EmptyField => {
                empty_field = directive(line, "empty_field", separator, lineno)?.into();
                state = State::UnsetField;
            }
            State::UnsetField => {
                unset_field = directive(line, "unset_field", separator, lineno)?.into();
                state = State::Path;
            }
            State::Path => {
                path = directive(line, "path", separator, lineno)?.to_string();
                state = State::Open;
            }
            State::Open => {
                let value = directive(line, "open", separator, lineno)?;
                open = parse_directive_time(value, lineno)?;
                state = State::Fields;
            }
            State::Fields => {
                let value = list_directive(line, "fields", separator, lineno)?;
                field_names = value
                    .map(|v| v.split(separator).map(CompactString::from).collect())
                    .unwrap_or_default();
                state = State::Types;
            }
            State::Types => {
                let value = list_directive(line, "types", separator, lineno)?;
                let type_names: SmallVec<[&str; 16]> = value
                    .map(|v| v.split(separator).collect())
                    .unwrap_or_default();
                if type_names.len() != field_names.len() {
                    return Err(bad_line(
                        lineno,
                        format!(
                            "#types lists {} type(s) for {} field(s)",
                            type_names.len(),
                            field_names.len()
                        ),
                    )
                    .into());
                }

                let placeholders = Placeholders {
                    empty_field: empty_field.clone(),
                    unset_field: unset_field.clone(),
                    set_separator: set_separator.clone(),
                };
                let enums = EnumBinding::resolve(
                    &options.enum_registry,
                    &options.enum_namespaces,
                    options.bare_enums,
                );

                let mut builder = SchemaBuilder::new();
                for (name, type_name) in field_names.iter().zip(&type_names) {
                    let kind = resolve_type_name(type_name, &options.type_table, &enums)
                        .map_err(|e| ParserError::Ascii {
                            msg: e.to_string(),
                            lineno,
                            field: Some(name.to_string()),
                        })?;
                    builder = builder.annotate(
                        name.clone(),
                        FieldType::with_placeholders(kind, placeholders.clone()),
                    );
                }
                schema = Some(Arc::new(builder.build()?));
                state = State::Records;
            }
            State::Records => {
                if let Some(value) = line.strip_prefix('#') {
                    let value = expect_directive(value, "close", separator, lineno)?;
                    close = Some(parse_directive_time(value, lineno)?);
                    break;
                }

                let schema = schema.as_ref().expect("schema built before records");
                records.push(read_record(schema, line, separator, lineno)?);
            }
        }
    }

    if state != State::Records {
        return Err(bad_line(lineno + 1, "unexpected end of header").into());
    }

    let exit_with_error = close.is_none();
    if exit_with_error {
        warn!(path = %path, "ASCII log ended without a #close trailer");
    }

    Ok(AsciiLog {
        path,
        open,
        close: close.unwrap_or_else(Utc::now),
        records,
        exit_with_error,
    })
}

/// Read an ASCII log from a file path.
pub fn read_path(path: impl AsRef<Path>, options: &AsciiReadOptions) -> Result<AsciiLog> {
    let file = File::open(path)?;
    read(BufReader::new(file), options)
}

/// Read an ASCII log from an in-memory buffer.
pub fn read_bytes(bytes: &[u8], options: &AsciiReadOptions) -> Result<AsciiLog> {
    read(bytes, options)
}

fn read_record(
    schema: &Arc<Schema>,
    line: &str,
    separator: char,
    lineno: usize,
) -> Result<Record> {
    let tokens: SmallVec<[&str; 16]> = line.split(separator).collect();
    if tokens.len() != schema.len() {
        return Err(bad_line(
            lineno,
            format!(
                "expected {} column(s), got {}",
                schema.len(),
                tokens.len()
            ),
        )
        .into());
    }

    let mut values = Vec::with_capacity(tokens.len());
    for (token, (name, ty)) in tokens.iter().zip(schema.fields()) {
        let value = ty.parse(token).map_err(|e| ParserError::Ascii {
            msg: e.to_string(),
            lineno,
            field: Some(name.to_string()),
        })?;
        values.push(value);
    }
    Record::from_values(schema.clone(), values)
}

fn directive<'a>(
    line: &'a str,
    name: &str,
    separator: char,
    lineno: usize,
) -> std::result::Result<&'a str, Error> {
    let body = line
        .strip_prefix('#')
        .ok_or_else(|| bad_line(lineno, format!("expected #{name} directive")))?;
    expect_directive(body, name, separator, lineno)
}

fn expect_directive<'a>(
    body: &'a str,
    name: &str,
    separator: char,
    lineno: usize,
) -> std::result::Result<&'a str, Error> {
    body.strip_prefix(name)
        .and_then(|rest| rest.strip_prefix(separator))
        .ok_or_else(|| bad_line(lineno, format!("expected #{name} directive")).into())
}

// `#fields`/`#types` with no columns is a bare directive with no separator.
fn list_directive<'a>(
    line: &'a str,
    name: &str,
    separator: char,
    lineno: usize,
) -> std::result::Result<Option<&'a str>, Error> {
    if line.strip_prefix('#') == Some(name) {
        return Ok(None);
    }
    directive(line, name, separator, lineno).map(Some)
}

fn parse_directive_time(value: &str, lineno: usize) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, DIRECTIVE_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| bad_line(lineno, format!("bad directive timestamp: {value}")).into())
}

fn bad_line(lineno: usize, msg: impl Into<String>) -> ParserError {
    ParserError::Ascii {
        msg: msg.into(),
        lineno,
        field: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TypeKind, Value};

    const HTTP_LOG: &str = "#separator \\x09\n\
#set_separator\t,\n\
#empty_field\t(empty)\n\
#unset_field\t-\n\
#path\thttp\n\
#open\t2020-01-01-00-00-00\n\
#fields\tts\tid\n\
#types\ttime\tcount\n\
1577836800.000000\t42\n\
#close\t2020-01-01-00-00-01\n";

    #[test]
    fn test_end_to_end_header_and_record() {
        let log = read_bytes(HTTP_LOG.as_bytes(), &AsciiReadOptions::default()).unwrap();
        assert_eq!(log.path, "http");
        assert!(!log.exit_with_error);
        assert_eq!(log.open.to_string(), "2020-01-01 00:00:00 UTC");
        assert_eq!(log.close.to_string(), "2020-01-01 00:00:01 UTC");
        assert_eq!(log.records.len(), 1);

        let rec = &log.records[0];
        assert_eq!(rec.get("id"), Some(&Value::Count(42)));
        match rec.get("ts") {
            Some(Value::Time(t)) => assert_eq!(t.timestamp(), 1_577_836_800),
            other => panic!("expected time, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_trailer_is_non_fatal() {
        let truncated: String = HTTP_LOG
            .lines()
            .filter(|l| !l.starts_with("#close"))
            .map(|l| format!("{l}\n"))
            .collect();
        let log = read_bytes(truncated.as_bytes(), &AsciiReadOptions::default()).unwrap();
        assert!(log.exit_with_error);
        assert_eq!(log.records.len(), 1);
        assert_eq!(log.records[0].get("id"), Some(&Value::Count(42)));
    }

    #[test]
    fn test_bad_token_carries_line_and_field() {
        let input = HTTP_LOG.replace("1577836800.000000\t42", "1577836800.000000\tnope");
        let err = read_bytes(input.as_bytes(), &AsciiReadOptions::default()).unwrap_err();
        match err {
            Error::Parser(ParserError::Ascii { lineno, field, .. }) => {
                assert_eq!(lineno, 9);
                assert_eq!(field.as_deref(), Some("id"));
            }
            other => panic!("expected ASCII parser error, got {other:?}"),
        }
    }

    #[test]
    fn test_column_count_mismatch() {
        let input = HTTP_LOG.replace("1577836800.000000\t42", "1577836800.000000");
        let err = read_bytes(input.as_bytes(), &AsciiReadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("expected 2 column(s)"));
    }

    #[test]
    fn test_truncated_header_is_fatal() {
        let input = "#separator \\x09\n#set_separator\t,\n";
        let err = read_bytes(input.as_bytes(), &AsciiReadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("unexpected end of header"));
    }

    #[test]
    fn test_unset_and_containers() {
        let input = "#separator \\x09\n\
#set_separator\t,\n\
#empty_field\t(empty)\n\
#unset_field\t-\n\
#path\tdns\n\
#open\t2020-01-01-00-00-00\n\
#fields\tquery\tanswers\n\
#types\tstring\tvector[string]\n\
-\texample.com,example.org\n\
www.example.com\t(empty)\n\
#close\t2020-01-01-00-00-01\n";
        let log = read_bytes(input.as_bytes(), &AsciiReadOptions::default()).unwrap();
        assert_eq!(log.records[0].get("query"), None);
        assert_eq!(
            log.records[0].get("answers"),
            Some(&Value::Vector(vec![
                Value::String("example.com".into()),
                Value::String("example.org".into()),
            ]))
        );
        assert_eq!(log.records[1].get("answers"), Some(&Value::Vector(vec![])));
    }

    #[test]
    fn test_type_table_override() {
        let mut options = AsciiReadOptions::default();
        options.type_table.insert("hexdump", TypeKind::String);
        let input = HTTP_LOG.replace("#types\ttime\tcount", "#types\ttime\thexdump");
        let log = read_bytes(input.as_bytes(), &options).unwrap();
        assert_eq!(log.records[0].get("id"), Some(&Value::String("42".into())));
    }

    #[test]
    fn test_unknown_type_name_is_fatal() {
        let input = HTTP_LOG.replace("#types\ttime\tcount", "#types\ttime\tgadget");
        let err = read_bytes(input.as_bytes(), &AsciiReadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("unknown type name"));
    }
}
