//! # zeek-log
//!
//! Reader and writer for Zeek network-monitoring logs.
//!
//! This crate models Zeek's script-land type system in Rust and codecs the
//! two on-disk log formats Zeek produces: tab-separated ASCII with a
//! directive header, and line-delimited JSON. It can be used to consume
//! logs produced by a live Zeek deployment or to synthesize logs for
//! testing downstream tooling.
//!
//! ## Features
//!
//! - **Typed values**: all of Zeek's scalar types (`bool`, `count`, `int`,
//!   `double`, `time`, `interval`, `string`, `addr`, `port`, `subnet`,
//!   `enum`, `any`) plus `set`/`vector` containers and nested records
//! - **Schemas**: a two-phase builder that flattens nested records into
//!   Zeek's dotted column names and enforces placeholder consistency
//! - **ASCII codec**: full directive-header state machine, escape handling,
//!   and non-fatal recovery from a missing `#close` trailer
//! - **JSON codec**: one object per line, with or without a schema
//! - **Format dispatch**: a facade that sniffs the input and routes to the
//!   right codec
//!
//! ## Quick Start
//!
//! ```rust
//! use zeek_log::prelude::*;
//!
//! let input = "\
//! #separator \\x09
//! #set_separator\t,
//! #empty_field\t(empty)
//! #unset_field\t-
//! #path\tconn
//! #open\t2020-01-01-00-00-00
//! #fields\tts\tid.orig_h\tid.orig_p
//! #types\ttime\taddr\tport
//! 1577836800.000000\t10.0.0.1\t54321
//! #close\t2020-01-01-00-00-01
//! ";
//!
//! let log = zeek_log::ascii::read_bytes(input.as_bytes(), &AsciiReadOptions::default()).unwrap();
//! assert_eq!(log.path, "conn");
//! assert_eq!(log.records[0].get("id.orig_p"), Some(&Value::Port(54321)));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                           zeek-log                                  |
//! +---------------------------------------------------------------------+
//! |  types/     - Value, TypeKind, FieldType, placeholders, enums       |
//! |  schema/    - SchemaBuilder, Schema, Record                         |
//! |  ascii/     - directive-header ASCII reader and writer              |
//! |  json/      - line-delimited JSON reader and writer                 |
//! |  dispatch/  - first-byte format sniffing facade                     |
//! |  error/     - Error types                                           |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Supported Types
//!
//! | Category | Zeek types |
//! |----------|------------|
//! | Scalar | `bool`, `count`, `int`, `double`, `time`, `interval`, `string` |
//! | Network | `addr`, `port`, `subnet` |
//! | Other | `enum`, `any` |
//! | Container | `set[T]`, `vector[T]`, `record` (flattened) |

pub mod ascii;
pub mod dispatch;
pub mod error;
pub mod json;
pub mod prelude;
pub mod schema;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use dispatch::{Format, ParsedLog, ReadOptions};
pub use error::{Error, ModelError, ParserError, Result, TypeError, WriterError};
pub use schema::{RawValue, Record, Schema, SchemaBuilder};
pub use types::{
    resolve_type_name, EnumBinding, EnumNamespaceRegistry, EnumValue, FieldType, Interval,
    Placeholders, Subnet, TypeKind, TypeTable, Value,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
