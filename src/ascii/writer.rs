//! ASCII log writer.
//!
//! Emits the eight header directives (derived from the first record's
//! schema, or defaults for an empty stream), one line per record, then the
//! `#close` trailer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;

use super::DIRECTIVE_TIME_FORMAT;
use crate::error::{Result, WriterError};
use crate::schema::Record;
use crate::types::Placeholders;

const SEPARATOR: char = '\t';

/// Write records as an ASCII log.
///
/// `name` is the destination name the `#path` directive is derived from
/// (stem minus extension, `<unknown>` when absent).
pub fn write<W: Write>(out: W, records: &[Record], name: Option<&str>) -> Result<()> {
    let mut out = out;

    let schema = records.first().map(|r| r.schema().clone());
    let placeholders = schema
        .as_ref()
        .map(|s| s.placeholders().clone())
        .unwrap_or_default();

    write_header(&mut out, schema.as_deref(), &placeholders, name)?;

    for (i, record) in records.iter().enumerate() {
        let lineno = i + 1;
        if let Some(first) = schema.as_deref() {
            if record.schema().as_ref() != first {
                return Err(WriterError::Ascii {
                    msg: "record schema differs from the first record's".into(),
                    lineno,
                    field: None,
                }
                .into());
            }
        }
        let rendered = record.to_ascii().map_err(|e| WriterError::Ascii {
            msg: e.to_string(),
            lineno,
            field: None,
        })?;
        let mut first_column = true;
        for token in rendered.values() {
            if !first_column {
                write!(out, "{SEPARATOR}")?;
            }
            write!(out, "{token}")?;
            first_column = false;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "#close{SEPARATOR}{}",
        Utc::now().format(DIRECTIVE_TIME_FORMAT)
    )?;
    Ok(())
}

/// Write records as an ASCII log file; `#path` derives from the file name.
pub fn write_path(path: impl AsRef<Path>, records: &[Record]) -> Result<()> {
    let path = path.as_ref();
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write(&mut out, records, name.as_deref())?;
    out.flush()?;
    Ok(())
}

/// Render records as an in-memory ASCII log.
pub fn write_string(records: &[Record], name: Option<&str>) -> Result<String> {
    let mut buf = Vec::new();
    write(&mut buf, records, name)?;
    // Output is built from UTF-8 tokens only.
    Ok(String::from_utf8(buf).expect("ASCII log output is UTF-8"))
}

fn write_header<W: Write>(
    out: &mut W,
    schema: Option<&crate::schema::Schema>,
    placeholders: &Placeholders,
    name: Option<&str>,
) -> Result<()> {
    writeln!(out, "#separator \\x{:02x}", SEPARATOR as u32)?;
    writeln!(out, "#set_separator{SEPARATOR}{}", placeholders.set_separator)?;
    writeln!(out, "#empty_field{SEPARATOR}{}", placeholders.empty_field)?;
    writeln!(out, "#unset_field{SEPARATOR}{}", placeholders.unset_field)?;
    writeln!(out, "#path{SEPARATOR}{}", log_path(name))?;
    writeln!(
        out,
        "#open{SEPARATOR}{}",
        Utc::now().format(DIRECTIVE_TIME_FORMAT)
    )?;

    match schema {
        Some(schema) if !schema.is_empty() => {
            write!(out, "#fields")?;
            for field_name in schema.fields().keys() {
                write!(out, "{SEPARATOR}{field_name}")?;
            }
            writeln!(out)?;
            write!(out, "#types")?;
            for ty in schema.fields().values() {
                write!(out, "{SEPARATOR}{}", ty.zeek_name())?;
            }
            writeln!(out)?;
        }
        _ => {
            writeln!(out, "#fields")?;
            writeln!(out, "#types")?;
        }
    }
    Ok(())
}

// `#path` is the destination name minus its extension.
fn log_path(name: Option<&str>) -> String {
    name.and_then(|n| Path::new(n).file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "<unknown>".to_string())
}
