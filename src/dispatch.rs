//! Format dispatch.
//!
//! A thin facade that selects the ASCII or JSON codec by sniffing the
//! first byte of input: `#` means a directive header, `{` a JSON object.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::str::FromStr;

use crate::ascii::{self, AsciiLog, AsciiReadOptions};
use crate::error::{ParserError, Result, WriterError};
use crate::json::{self, JsonLog, JsonReadOptions};
use crate::schema::Record;

/// A log read through the dispatching facade.
#[derive(Debug, Clone)]
pub enum ParsedLog {
    Ascii(AsciiLog),
    Json(JsonLog),
}

impl ParsedLog {
    /// The parsed records regardless of wire format.
    pub fn records(&self) -> &[Record] {
        match self {
            ParsedLog::Ascii(log) => &log.records,
            ParsedLog::Json(log) => &log.records,
        }
    }
}

/// Options for both codecs; the sniffed format picks which half applies.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub ascii: AsciiReadOptions,
    pub json: JsonReadOptions,
}

/// Read a log, selecting the codec from the first input byte.
pub fn read<R: BufRead>(mut input: R, options: &ReadOptions) -> Result<ParsedLog> {
    let leading = input.fill_buf()?.first().copied();
    match leading {
        Some(b'#') => ascii::read(input, &options.ascii).map(ParsedLog::Ascii),
        Some(b'{') => json::read(input, &options.json).map(ParsedLog::Json),
        Some(other) => Err(ParserError::UnknownFormat { leading: other }.into()),
        None => Err(ParserError::UnknownFormat { leading: 0 }.into()),
    }
}

/// Read a log file, selecting the codec from the first byte.
pub fn read_path(path: impl AsRef<Path>, options: &ReadOptions) -> Result<ParsedLog> {
    let file = File::open(path)?;
    read(BufReader::new(file), options)
}

/// Read an in-memory log, selecting the codec from the first byte.
pub fn read_bytes(bytes: &[u8], options: &ReadOptions) -> Result<ParsedLog> {
    read(bytes, options)
}

/// Output wire format for the write-side facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ascii,
    Json,
}

impl FromStr for Format {
    type Err = WriterError;

    fn from_str(s: &str) -> std::result::Result<Self, WriterError> {
        match s {
            "ascii" => Ok(Format::Ascii),
            "json" => Ok(Format::Json),
            other => Err(WriterError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Write records in the requested format.
///
/// `name` feeds the ASCII `#path` directive and is ignored for JSON.
pub fn write<W: Write>(
    format: Format,
    out: W,
    records: &[Record],
    name: Option<&str>,
) -> Result<()> {
    match format {
        Format::Ascii => ascii::write(out, records, name),
        Format::Json => json::write(out, records),
    }
}
