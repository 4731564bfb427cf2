//! Error types for zeek-log.
//!
//! This module provides structured error types for all zeek-log operations:
//!
//! - [`enum@Error`] - Main error enum that wraps all error types
//! - [`ParserError`] - Errors from reading ASCII/JSON log input
//! - [`WriterError`] - Errors from serializing records to an output
//! - [`ModelError`] - Schema construction and record binding violations
//! - [`TypeError`] - Raw-value coercion failures at the type level
//!
//! All errors implement `std::error::Error`. Parser and writer variants keep
//! `(msg, lineno, field)` as named fields so errors can be inspected or
//! rebuilt across boundaries.

use thiserror::Error;

/// Main error type for zeek-log operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading ASCII or JSON log input
    #[error("Parse error: {0}")]
    Parser(#[from] ParserError),

    /// Error serializing records to an output
    #[error("Write error: {0}")]
    Writer(#[from] WriterError),

    /// Schema construction or record binding violation
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Raw-value coercion failure
    #[error("Type error: {0}")]
    Type(#[from] TypeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from reading log input.
#[derive(Error, Debug)]
pub enum ParserError {
    /// Malformed ASCII log input
    #[error("ASCII log: {msg} (line {lineno}{})", field_suffix(field))]
    Ascii {
        msg: String,
        lineno: usize,
        field: Option<String>,
    },

    /// Malformed JSON log input
    #[error("JSON log: {msg} (line {lineno}{})", field_suffix(field))]
    Json {
        msg: String,
        lineno: usize,
        field: Option<String>,
    },

    /// Input starts with a byte no codec claims
    #[error("unknown log format: input starts with {leading:#04x}")]
    UnknownFormat { leading: u8 },
}

impl ParserError {
    /// The 1-based input line the error refers to, if any.
    pub fn lineno(&self) -> Option<usize> {
        match self {
            ParserError::Ascii { lineno, .. } | ParserError::Json { lineno, .. } => Some(*lineno),
            ParserError::UnknownFormat { .. } => None,
        }
    }

    /// The field the error refers to, if attributable to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ParserError::Ascii { field, .. } | ParserError::Json { field, .. } => field.as_deref(),
            ParserError::UnknownFormat { .. } => None,
        }
    }
}

/// Errors from serializing records.
#[derive(Error, Debug)]
pub enum WriterError {
    /// Record could not be rendered in ASCII form
    #[error("ASCII log: {msg} (record {lineno}{})", field_suffix(field))]
    Ascii {
        msg: String,
        lineno: usize,
        field: Option<String>,
    },

    /// Record could not be rendered in JSON form
    #[error("JSON log: {msg} (record {lineno}{})", field_suffix(field))]
    Json {
        msg: String,
        lineno: usize,
        field: Option<String>,
    },

    /// Requested output format is not one of `ascii`/`json`
    #[error("unsupported log format: {format}")]
    UnsupportedFormat { format: String },
}

/// Schema construction and record binding violations.
///
/// `Type` covers arity and name problems (unknown keyword, missing field),
/// `Value` covers inconsistent declarations (conflicting field types,
/// placeholder mismatch), `Format` covers malformed declaration input.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("{msg}")]
    Type { msg: String },

    #[error("{msg}")]
    Value { msg: String },

    #[error("{msg}")]
    Format { msg: String },
}

/// Raw-value coercion failures at the type level.
///
/// `Type` means the raw input is the wrong kind for the field type
/// (e.g. a JSON array offered to a `count` field, or any operation on a
/// declaration-only `record` type); `Value` means the kind was right but
/// the value itself cannot be coerced (e.g. `"x"` as a `count`).
#[derive(Error, Debug)]
pub enum TypeError {
    #[error("{msg}")]
    Type { msg: String },

    #[error("{msg}")]
    Value { msg: String },
}

impl TypeError {
    pub(crate) fn ty(msg: impl Into<String>) -> Self {
        TypeError::Type { msg: msg.into() }
    }

    pub(crate) fn value(msg: impl Into<String>) -> Self {
        TypeError::Value { msg: msg.into() }
    }
}

fn field_suffix(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(", field {name}"),
        None => String::new(),
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_error_display() {
        let err = ParserError::Ascii {
            msg: "invalid count: x".into(),
            lineno: 9,
            field: Some("id".into()),
        };
        assert_eq!(
            err.to_string(),
            "ASCII log: invalid count: x (line 9, field id)"
        );
        assert_eq!(err.lineno(), Some(9));
        assert_eq!(err.field(), Some("id"));
    }

    #[test]
    fn test_parser_error_without_field() {
        let err = ParserError::Json {
            msg: "expected object".into(),
            lineno: 2,
            field: None,
        };
        assert_eq!(err.to_string(), "JSON log: expected object (line 2)");
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_unknown_format_display() {
        let err = ParserError::UnknownFormat { leading: b'x' };
        assert_eq!(
            err.to_string(),
            "unknown log format: input starts with 0x78"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ModelError::Type {
            msg: "missing field".into(),
        }
        .into();
        assert!(matches!(err, Error::Model(_)));
    }
}
