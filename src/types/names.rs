//! `#types` directive name resolution.
//!
//! The directive grammar is small and recursive:
//!
//! ```text
//! type := "set[" type "]" | "vector[" type "]" | "enum" | scalar-name
//! ```
//!
//! Scalar names resolve through a [`TypeTable`] callers may extend;
//! `enum` binds to the reader's resolved enum literal table. Container
//! names are matched anchored at both ends (a `set[...]`/`vector[...]`
//! spelling with trailing garbage is an error, not a scalar).

use compact_str::CompactString;
use indexmap::IndexMap;

use crate::error::TypeError;
use crate::types::kind::{EnumBinding, TypeKind};

/// Name-to-kind table for scalar type names.
///
/// The default table covers Zeek's scalar names; callers can override or
/// extend entries (e.g. to alias a site-specific name onto `string`).
#[derive(Debug, Clone)]
pub struct TypeTable {
    entries: IndexMap<CompactString, TypeKind>,
}

impl Default for TypeTable {
    fn default() -> Self {
        let mut entries = IndexMap::new();
        for (name, kind) in [
            ("bool", TypeKind::Bool),
            ("count", TypeKind::Count),
            ("int", TypeKind::Int),
            ("double", TypeKind::Double),
            ("time", TypeKind::Time),
            ("interval", TypeKind::Interval),
            ("string", TypeKind::String),
            ("addr", TypeKind::Addr),
            ("port", TypeKind::Port),
            ("subnet", TypeKind::Subnet),
            ("any", TypeKind::Any),
        ] {
            entries.insert(CompactString::const_new(name), kind);
        }
        Self { entries }
    }
}

impl TypeTable {
    /// The default Zeek scalar table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a scalar name.
    pub fn insert(&mut self, name: impl Into<CompactString>, kind: TypeKind) {
        self.entries.insert(name.into(), kind);
    }

    /// Default table with a set of overrides applied.
    pub fn with_overrides<I, S>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeKind)>,
        S: Into<CompactString>,
    {
        let mut table = Self::default();
        for (name, kind) in overrides {
            table.insert(name, kind);
        }
        table
    }

    /// Look up a scalar name.
    pub fn get(&self, name: &str) -> Option<&TypeKind> {
        self.entries.get(name)
    }
}

/// Resolve one `#types` directive entry to a [`TypeKind`].
pub fn resolve_type_name(
    name: &str,
    table: &TypeTable,
    enums: &EnumBinding,
) -> Result<TypeKind, TypeError> {
    if let Some(inner) = strip_container(name, "set[") {
        return Ok(TypeKind::Set(Box::new(resolve_type_name(
            inner, table, enums,
        )?)));
    }
    if let Some(inner) = strip_container(name, "vector[") {
        return Ok(TypeKind::Vector(Box::new(resolve_type_name(
            inner, table, enums,
        )?)));
    }
    if name == "enum" {
        return Ok(TypeKind::Enum(enums.clone()));
    }
    table
        .get(name)
        .cloned()
        .ok_or_else(|| TypeError::value(format!("unknown type name: {name}")))
}

fn strip_container<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix)?.strip_suffix(']')
}
