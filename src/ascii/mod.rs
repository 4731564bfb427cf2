//! Zeek's tab-delimited ASCII log format.
//!
//! The wire grammar (each line `\n`-terminated, `SEP` = the negotiated
//! separator byte, default tab):
//!
//! ```text
//! #separator <backslash-escaped-hex of SEP>
//! #set_separator<SEP><bytes>
//! #empty_field<SEP><bytes>
//! #unset_field<SEP><bytes>
//! #path<SEP><string>
//! #open<SEP><%Y-%m-%d-%H-%M-%S>
//! #fields<SEP><name1><SEP><name2>...
//! #types<SEP><type1><SEP><type2>...
//! <value1><SEP><value2>...
//! #close<SEP><%Y-%m-%d-%H-%M-%S>
//! ```
//!
//! A missing `#close` trailer is not fatal: the reader warns, substitutes
//! the current time and flags [`AsciiLog::exit_with_error`].

mod reader;
mod writer;

use chrono::{DateTime, Utc};

use crate::schema::Record;

pub use reader::{read, read_bytes, read_path, AsciiReadOptions};
pub use writer::{write, write_path, write_string};

/// Timestamp layout of the `#open`/`#close` directives.
pub(crate) const DIRECTIVE_TIME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// One fully-read ASCII log.
#[derive(Debug, Clone)]
pub struct AsciiLog {
    /// The `#path` directive value
    pub path: String,
    /// The `#open` directive timestamp
    pub open: DateTime<Utc>,
    /// The `#close` directive timestamp, or the read time when the trailer
    /// was missing
    pub close: DateTime<Utc>,
    /// Parsed records in input order
    pub records: Vec<Record>,
    /// Set when the stream ended before a `#close` trailer
    pub exit_with_error: bool,
}
