//! Schema compilation.
//!
//! [`SchemaBuilder`] merges ordered field declarations into an immutable,
//! consistency-checked [`Schema`]. Declarations come in two flavors,
//! mirroring the two ways a log model can be written down: *annotations*
//! (processed first, take precedence) and *assignments*. `record`
//! declarations are flattened into dotted leaf names at build time; the
//! parent names are retained separately so record construction can accept
//! nested maps.

use compact_str::CompactString;
use indexmap::IndexMap;

use crate::error::ModelError;
use crate::types::{FieldType, Placeholders, TypeKind};

/// A compiled, immutable log schema.
///
/// `fields` maps flattened (dotted) leaf names to their types in
/// declaration order; `record_fields` keeps the names that were declared
/// as `record` composites. Built once by [`SchemaBuilder::build`], shared
/// via `Arc` thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: IndexMap<CompactString, FieldType>,
    record_fields: IndexMap<CompactString, FieldType>,
    placeholders: Placeholders,
}

impl Schema {
    /// The flattened leaf fields in declaration order.
    pub fn fields(&self) -> &IndexMap<CompactString, FieldType> {
        &self.fields
    }

    /// Fields that were declared as `record` composites.
    pub fn record_fields(&self) -> &IndexMap<CompactString, FieldType> {
        &self.record_fields
    }

    /// The canonical placeholder config every field agreed on.
    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    /// Number of leaf fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no leaf fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether a leaf field with this (dotted) name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Look up a leaf field's type.
    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name)
    }
}

/// Two-phase schema builder.
///
/// ```
/// use zeek_log::schema::SchemaBuilder;
/// use zeek_log::types::{FieldType, TypeKind};
///
/// let schema = SchemaBuilder::new()
///     .annotate("ts", FieldType::new(TypeKind::Time))
///     .annotate("id", FieldType::new(TypeKind::Count))
///     .build()
///     .unwrap();
/// assert_eq!(schema.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    annotations: Vec<(CompactString, FieldType)>,
    assignments: Vec<(CompactString, FieldType)>,
}

impl SchemaBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field annotation-style. Annotations are processed first
    /// and win over assignments of the same kind.
    pub fn annotate(mut self, name: impl Into<CompactString>, ty: FieldType) -> Self {
        self.annotations.push((name.into(), ty));
        self
    }

    /// Declare a field assignment-style.
    pub fn assign(mut self, name: impl Into<CompactString>, ty: FieldType) -> Self {
        self.assignments.push((name.into(), ty));
        self
    }

    /// Build a schema from annotation-style declarations only.
    pub fn from_fields<I, S>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<CompactString>,
    {
        let mut builder = Self::new();
        for (name, ty) in declarations {
            builder = builder.annotate(name, ty);
        }
        builder
    }

    /// Compile the declarations into an immutable [`Schema`].
    pub fn build(self) -> Result<Schema, ModelError> {
        let mut merged: IndexMap<CompactString, FieldType> = IndexMap::new();

        for (name, ty) in self.annotations {
            merged.insert(name, ty);
        }
        for (name, ty) in self.assignments {
            match merged.get(&name) {
                Some(existing) if !existing.kind().same_kind(ty.kind()) => {
                    return Err(ModelError::Value {
                        msg: format!(
                            "field {name} declared with conflicting types: {} and {}",
                            existing.zeek_name(),
                            ty.zeek_name()
                        ),
                    });
                }
                // Annotation takes precedence.
                Some(_) => {}
                None => {
                    merged.insert(name, ty);
                }
            }
        }

        let mut fields = IndexMap::new();
        let mut record_fields = IndexMap::new();
        let mut canonical: Option<Placeholders> = None;

        for (name, ty) in &merged {
            flatten(name, ty, &mut fields, &mut record_fields, &mut canonical)?;
        }

        Ok(Schema {
            fields,
            record_fields,
            placeholders: canonical.unwrap_or_default(),
        })
    }
}

fn flatten(
    name: &str,
    ty: &FieldType,
    fields: &mut IndexMap<CompactString, FieldType>,
    record_fields: &mut IndexMap<CompactString, FieldType>,
    canonical: &mut Option<Placeholders>,
) -> Result<(), ModelError> {
    if let TypeKind::Record(subfields) = ty.kind() {
        record_fields.insert(CompactString::from(name), ty.clone());
        for (sub_name, sub_ty) in subfields {
            let dotted = format!("{name}.{sub_name}");
            flatten(&dotted, sub_ty, fields, record_fields, canonical)?;
        }
        return Ok(());
    }

    check_placeholders(name, ty.placeholders(), canonical)?;
    let previous = fields.insert(CompactString::from(name), ty.clone());
    if previous.is_some() {
        return Err(ModelError::Value {
            msg: format!("duplicate field: {name}"),
        });
    }
    Ok(())
}

// First leaf fixes the canonical config; every later leaf must match
// byte-for-byte.
fn check_placeholders(
    name: &str,
    ph: &Placeholders,
    canonical: &mut Option<Placeholders>,
) -> Result<(), ModelError> {
    let Some(canon) = canonical else {
        *canonical = Some(ph.clone());
        return Ok(());
    };
    for (what, got, expected) in [
        ("empty_field", &ph.empty_field, &canon.empty_field),
        ("unset_field", &ph.unset_field, &canon.unset_field),
        ("set_separator", &ph.set_separator, &canon.set_separator),
    ] {
        if got != expected {
            return Err(ModelError::Value {
                msg: format!(
                    "inconsistent {what} {got:?} for field {name} (expected {expected:?})"
                ),
            });
        }
    }
    Ok(())
}
