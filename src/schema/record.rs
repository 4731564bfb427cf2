//! Schema-bound records.
//!
//! A [`Record`] is one log line's worth of coerced values, bound to its
//! [`Schema`]. Records are constructed once (by a codec or a caller) and
//! never mutated; every stored value is the output of the field's type
//! coercion, never raw input.

use std::sync::Arc;

use compact_str::CompactString;
use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::error::{Error, ModelError, Result, TypeError};
use crate::schema::Schema;
use crate::types::Value;

/// Raw constructor input for one field.
///
/// `Text` goes through the ASCII token grammar, `Json` through the JSON
/// coercion, `Value` is checked against the field kind as-is, `Map` is
/// nested input for a `record`-declared field, `Null` binds the field as
/// unset.
#[derive(Debug, Clone)]
pub enum RawValue {
    Text(CompactString),
    Json(Json),
    Value(Value),
    Map(Vec<(CompactString, RawValue)>),
    Null,
}

impl RawValue {
    /// Nested input for a `record`-declared field.
    pub fn map<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, RawValue)>,
        S: Into<CompactString>,
    {
        RawValue::Map(entries.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(CompactString::from(s))
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(CompactString::from(s))
    }
}

impl From<Json> for RawValue {
    fn from(v: Json) -> Self {
        RawValue::Json(v)
    }
}

impl From<Value> for RawValue {
    fn from(v: Value) -> Self {
        RawValue::Value(v)
    }
}

/// One schema-bound, write-once log record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<Option<Value>>,
}

impl Record {
    /// Construct a record from positional and keyword raw inputs.
    ///
    /// Positional inputs bind to fields in schema order; keywords bind by
    /// name. A keyword naming a `record`-declared field with a `Map` value
    /// expands into the corresponding dotted leaf keys. Every schema field
    /// must end up bound (possibly to `Null`).
    pub fn new<P, K, N>(schema: Arc<Schema>, positional: P, keyword: K) -> Result<Self>
    where
        P: IntoIterator<Item = RawValue>,
        K: IntoIterator<Item = (N, RawValue)>,
        N: Into<CompactString>,
    {
        let field_count = schema.len();
        let mut bound: Vec<Option<RawValue>> = (0..field_count).map(|_| None).collect();

        for (i, raw) in positional.into_iter().enumerate() {
            if i >= field_count {
                return Err(ModelError::Type {
                    msg: format!(
                        "too many positional values for {field_count} declared field(s)"
                    ),
                }
                .into());
            }
            bound[i] = Some(raw);
        }

        let mut pairs: Vec<(CompactString, RawValue)> = Vec::new();
        for (name, raw) in keyword {
            expand_keyword(&schema, name.into(), raw, &mut pairs)?;
        }
        for (name, raw) in pairs {
            let idx = schema.fields().get_index_of(name.as_str()).ok_or_else(|| {
                Error::from(ModelError::Type {
                    msg: format!("unknown field: {name}"),
                })
            })?;
            if bound[idx].is_some() {
                return Err(ModelError::Type {
                    msg: format!("field {name} bound more than once"),
                }
                .into());
            }
            bound[idx] = Some(raw);
        }

        let missing: Vec<&str> = schema
            .fields()
            .keys()
            .zip(&bound)
            .filter_map(|(name, slot)| slot.is_none().then_some(name.as_str()))
            .collect();
        if !missing.is_empty() {
            return Err(ModelError::Type {
                msg: format!("missing required field(s): {}", name_list(&missing)),
            }
            .into());
        }

        let mut values = Vec::with_capacity(field_count);
        for ((name, ty), raw) in schema.fields().iter().zip(bound) {
            let raw = raw.expect("all fields bound");
            let value = match raw {
                RawValue::Text(s) => ty.parse(&s)?,
                RawValue::Json(j) => ty.from_json(&j)?,
                RawValue::Value(v) => {
                    ty.check(&v)?;
                    Some(v)
                }
                RawValue::Null => None,
                RawValue::Map(_) => {
                    return Err(ModelError::Type {
                        msg: format!("field {name} is not a record, nested map not allowed"),
                    }
                    .into());
                }
            };
            values.push(value);
        }

        Ok(Self { schema, values })
    }

    /// Construct from pre-coerced values, one per schema field in order.
    ///
    /// This is the codec fast path; values are still checked against their
    /// field kinds.
    pub fn from_values(schema: Arc<Schema>, values: Vec<Option<Value>>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(ModelError::Type {
                msg: format!(
                    "expected {} value(s), got {}",
                    schema.len(),
                    values.len()
                ),
            }
            .into());
        }
        for ((_, ty), value) in schema.fields().iter().zip(&values) {
            if let Some(v) = value {
                ty.check(v)?;
            }
        }
        Ok(Self { schema, values })
    }

    /// The schema this record is bound to.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The ordered field-name/type map (shared with the schema).
    pub fn fields(&self) -> &IndexMap<CompactString, crate::types::FieldType> {
        self.schema.fields()
    }

    /// Look up a field's value by (dotted) name. `None` for an unknown
    /// field or an unset value; use [`Record::as_dict`] to distinguish.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let idx = self.schema.fields().get_index_of(name)?;
        self.values[idx].as_ref()
    }

    /// The coerced values in schema order.
    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    /// Ordered `field -> JSON primitive` view as one JSON object.
    pub fn to_json(&self) -> std::result::Result<Json, TypeError> {
        let mut object = serde_json::Map::with_capacity(self.values.len());
        for ((name, ty), value) in self.schema.fields().iter().zip(&self.values) {
            object.insert(name.to_string(), ty.to_json(value.as_ref())?);
        }
        Ok(Json::Object(object))
    }

    /// Ordered `field -> ASCII token` view.
    pub fn to_ascii(&self) -> std::result::Result<IndexMap<CompactString, String>, TypeError> {
        let mut out = IndexMap::with_capacity(self.values.len());
        for ((name, ty), value) in self.schema.fields().iter().zip(&self.values) {
            out.insert(name.clone(), ty.to_ascii(value.as_ref())?);
        }
        Ok(out)
    }

    /// Ordered `field -> value` view.
    pub fn as_dict(&self) -> IndexMap<CompactString, Option<Value>> {
        self.schema
            .fields()
            .keys()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }

    /// The values as a positional tuple.
    pub fn as_tuple(&self) -> Vec<Option<Value>> {
        self.values.clone()
    }
}

// Expand `record`-field keywords carrying nested maps into dotted leaf
// pairs; everything else passes through untouched.
fn expand_keyword(
    schema: &Schema,
    name: CompactString,
    raw: RawValue,
    out: &mut Vec<(CompactString, RawValue)>,
) -> Result<()> {
    if schema.record_fields().contains_key(name.as_str()) {
        let RawValue::Map(entries) = raw else {
            return Err(ModelError::Type {
                msg: format!("record field {name} requires a nested map"),
            }
            .into());
        };
        for (sub, sub_raw) in entries {
            let dotted = CompactString::from(format!("{name}.{sub}"));
            expand_keyword(schema, dotted, sub_raw, out)?;
        }
        return Ok(());
    }
    out.push((name, raw));
    Ok(())
}

/// Join names as `"x"`, `"x and y"`, or `"x, y, and z"`.
fn name_list(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => (*one).to_string(),
        [a, b] => format!("{a} and {b}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}
