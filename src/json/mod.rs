//! Zeek's line-delimited JSON log format.
//!
//! One JSON object per line, no header or trailer. Reading with a schema
//! coerces every key through its field type; reading without one warns and
//! types everything `any`.

mod reader;
mod writer;

use crate::schema::Record;

pub use reader::{read, read_bytes, read_path, JsonReadOptions};
pub use writer::{write, write_path, write_string};

/// One fully-read JSON log.
#[derive(Debug, Clone)]
pub struct JsonLog {
    /// Parsed records in input order
    pub records: Vec<Record>,
}
