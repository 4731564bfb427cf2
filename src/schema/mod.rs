//! Schema compilation and schema-bound records.
//!
//! [`SchemaBuilder`] compiles ordered field declarations into an immutable
//! [`Schema`]; [`Record`] binds one line's coerced values to a schema.

mod builder;
mod record;

pub use builder::{Schema, SchemaBuilder};
pub use record::{RawValue, Record};
