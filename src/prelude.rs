//! Convenient re-exports for common usage.
//!
//! This module provides a curated set of the most commonly used types
//! from zeek-log, allowing you to import them with a single `use` statement.
//!
//! # Example
//!
//! ```rust
//! use zeek_log::prelude::*;
//!
//! let schema = SchemaBuilder::new()
//!     .annotate("n", FieldType::new(TypeKind::Count))
//!     .build()
//!     .unwrap();
//! assert_eq!(schema.len(), 1);
//! ```

// Type system
pub use crate::types::{
    EnumBinding, EnumNamespaceRegistry, EnumValue, FieldType, Interval, Placeholders, Subnet,
    TypeKind, TypeTable, Value,
};

// Schema and records
pub use crate::schema::{RawValue, Record, Schema, SchemaBuilder};

// Codec entry points
pub use crate::ascii::{AsciiLog, AsciiReadOptions};
pub use crate::dispatch::{Format, ParsedLog, ReadOptions};
pub use crate::json::{JsonLog, JsonReadOptions};

// Error types
pub use crate::error::{Error, Result};
