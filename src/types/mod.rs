//! The Zeek typed-value system.
//!
//! This module provides:
//! - [`Value`] - runtime values for every Zeek data type
//! - [`TypeKind`] / [`FieldType`] - the type algebra and its parse/serialize
//!   contracts, parameterized by [`Placeholders`]
//! - [`EnumNamespaceRegistry`] - dependency-injected enum literal resolution
//! - [`TypeTable`] / [`resolve_type_name`] - the `#types` directive grammar

mod enums;
mod kind;
mod names;
mod value;

pub use enums::{EnumNamespaceRegistry, EnumValue};
pub use kind::{EnumBinding, FieldType, Placeholders, TypeKind};
pub use names::{resolve_type_name, TypeTable};
pub use value::{Interval, Subnet, Value};

pub(crate) use kind::unescape;
