//! Enum literals and the namespace registry that resolves them.
//!
//! Zeek enum constants live in script namespaces (`Notice::ACTION_LOG`,
//! `tcp`, ...). The registry is built once by the caller, typically from
//! generated constant tables, and injected read-only into every `enum`
//! field type.

use std::collections::HashMap;

use compact_str::CompactString;
use indexmap::IndexMap;

/// One resolved enum constant.
///
/// Renders as `Namespace::name`, or bare `name` when the constant was
/// registered (or fabricated) without a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    namespace: Option<CompactString>,
    name: CompactString,
}

impl EnumValue {
    /// Create a namespaced constant.
    pub fn new(namespace: impl Into<CompactString>, name: impl Into<CompactString>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// Create a bare (namespace-less) constant.
    pub fn bare(name: impl Into<CompactString>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// Split a wire literal (`"Notice::ACTION_LOG"` or `"tcp"`) into a
    /// constant. Used to fabricate a value for unresolvable literals.
    pub fn from_literal(literal: &str) -> Self {
        match literal.rsplit_once("::") {
            Some((ns, name)) => Self::new(ns, name),
            None => Self::bare(literal),
        }
    }

    /// Namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Constant name without the namespace.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl std::fmt::Display for EnumValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}::{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Read-only map from Zeek script namespaces to their enum constants.
///
/// Built once at startup and shared by reference; `enum` field types
/// resolve their literal table through [`EnumNamespaceRegistry::resolve`].
#[derive(Debug, Clone, Default)]
pub struct EnumNamespaceRegistry {
    namespaces: HashMap<CompactString, Vec<CompactString>>,
}

impl EnumNamespaceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the constants of one namespace. Repeated calls for the
    /// same namespace extend it.
    pub fn register<I, S>(&mut self, namespace: impl Into<CompactString>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.namespaces
            .entry(namespace.into())
            .or_default()
            .extend(names.into_iter().map(Into::into));
    }

    /// Namespaces currently registered.
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Resolve the literal table for a set of namespaces.
    ///
    /// Keys are the wire literals: `Namespace::name`, or bare `name` when
    /// `bare` is set. Unknown namespaces contribute nothing; the caller
    /// decides whether that matters (unresolvable literals are handled
    /// non-fatally at parse time).
    pub fn resolve<S: AsRef<str>>(
        &self,
        namespaces: &[S],
        bare: bool,
    ) -> IndexMap<CompactString, EnumValue> {
        let mut table = IndexMap::new();
        for ns in namespaces {
            let ns = ns.as_ref();
            let Some(names) = self.namespaces.get(ns) else {
                continue;
            };
            for name in names {
                let (literal, value) = if bare {
                    (name.clone(), EnumValue::bare(name.clone()))
                } else {
                    (
                        CompactString::from(format!("{ns}::{name}")),
                        EnumValue::new(ns, name.clone()),
                    )
                };
                table.insert(literal, value);
            }
        }
        table
    }
}
