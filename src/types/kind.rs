//! Zeek field types and their parse/serialize contracts.
//!
//! [`TypeKind`] is the closed type algebra (scalars, containers, the
//! declaration-only `record` composite). [`FieldType`] pairs a kind with the
//! [`Placeholders`] it was declared under and carries the three wire
//! contracts: `parse` (ASCII token), `from_json` (decoded JSON value),
//! `to_ascii`/`to_json` (serialization views).

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use indexmap::IndexMap;
use serde_json::Value as Json;
use tracing::warn;

use crate::error::TypeError;
use crate::types::enums::{EnumNamespaceRegistry, EnumValue};
use crate::types::value::{
    format_decimal_micros, format_double, parse_decimal_micros, Interval, Subnet, Value,
};

/// The literal strings standing in for empty and absent values, and the
/// delimiter joining container elements.
///
/// Exactly one config is active per schema; every field must agree with it
/// byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    /// Rendered for an empty container or empty string
    pub empty_field: CompactString,
    /// Rendered for a null/missing value
    pub unset_field: CompactString,
    /// Joins container elements
    pub set_separator: CompactString,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            empty_field: CompactString::const_new("(empty)"),
            unset_field: CompactString::const_new("-"),
            set_separator: CompactString::const_new(","),
        }
    }
}

/// Resolved literal table for one `enum` field.
///
/// Built from the injected [`EnumNamespaceRegistry`] at schema-construction
/// time; parse-time lookups never touch the registry again.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumBinding {
    values: IndexMap<CompactString, EnumValue>,
}

impl EnumBinding {
    /// An empty binding: every literal will be fabricated (with a warning).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve the requested namespaces through the registry.
    pub fn resolve<S: AsRef<str>>(
        registry: &EnumNamespaceRegistry,
        namespaces: &[S],
        bare: bool,
    ) -> Self {
        Self {
            values: registry.resolve(namespaces, bare),
        }
    }

    /// Look up a wire literal.
    pub fn lookup(&self, literal: &str) -> Option<&EnumValue> {
        self.values.get(literal)
    }
}

/// The closed set of Zeek field types.
///
/// `Record` is a declaration-time construct only: the schema builder
/// flattens its sub-fields into dotted leaf names before any record is read
/// or written, so `parse`/`to_ascii`/`to_json` on it are type errors.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Bool,
    Count,
    Int,
    Double,
    Time,
    Interval,
    String,
    Addr,
    Port,
    Subnet,
    Enum(EnumBinding),
    Any,
    Set(Box<TypeKind>),
    Vector(Box<TypeKind>),
    Record(IndexMap<CompactString, FieldType>),
}

impl TypeKind {
    /// The `#types` directive spelling of this kind.
    pub fn zeek_name(&self) -> String {
        match self {
            TypeKind::Bool => "bool".into(),
            TypeKind::Count => "count".into(),
            TypeKind::Int => "int".into(),
            TypeKind::Double => "double".into(),
            TypeKind::Time => "time".into(),
            TypeKind::Interval => "interval".into(),
            TypeKind::String => "string".into(),
            TypeKind::Addr => "addr".into(),
            TypeKind::Port => "port".into(),
            TypeKind::Subnet => "subnet".into(),
            TypeKind::Enum(_) => "enum".into(),
            TypeKind::Any => "any".into(),
            TypeKind::Set(elem) => format!("set[{}]", elem.zeek_name()),
            TypeKind::Vector(elem) => format!("vector[{}]", elem.zeek_name()),
            TypeKind::Record(_) => "record".into(),
        }
    }

    /// Structural kind comparison, ignoring enum literal tables.
    ///
    /// Used to detect conflicting re-declarations of a field: two `enum`
    /// fields resolved against different namespaces are still the same kind.
    pub fn same_kind(&self, other: &TypeKind) -> bool {
        match (self, other) {
            (TypeKind::Set(a), TypeKind::Set(b)) => a.same_kind(b),
            (TypeKind::Vector(a), TypeKind::Vector(b)) => a.same_kind(b),
            (TypeKind::Enum(_), TypeKind::Enum(_)) => true,
            (TypeKind::Record(a), TypeKind::Record(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((an, at), (bn, bt))| {
                        an == bn && at.kind().same_kind(bt.kind())
                    })
            }
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

/// One Zeek field type: a [`TypeKind`] plus the placeholders it was
/// declared under.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldType {
    kind: TypeKind,
    placeholders: Placeholders,
}

impl FieldType {
    /// Create a field type with the default placeholders.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            placeholders: Placeholders::default(),
        }
    }

    /// Create a field type with explicit placeholders.
    pub fn with_placeholders(kind: TypeKind, placeholders: Placeholders) -> Self {
        Self { kind, placeholders }
    }

    /// The type kind.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// The placeholders this field was declared under.
    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    /// The `#types` directive spelling.
    pub fn zeek_name(&self) -> String {
        self.kind.zeek_name()
    }

    /// Parse an ASCII wire token into a value.
    ///
    /// Returns `None` when the token equals the `unset_field` placeholder.
    pub fn parse(&self, raw: &str) -> Result<Option<Value>, TypeError> {
        if raw == self.placeholders.unset_field {
            return Ok(None);
        }
        parse_kind(&self.kind, &self.placeholders, raw).map(Some)
    }

    /// Coerce a decoded JSON value.
    ///
    /// JSON `null` maps to `None`; JSON strings for non-string kinds go
    /// through the ASCII token grammar (without placeholder semantics).
    pub fn from_json(&self, raw: &Json) -> Result<Option<Value>, TypeError> {
        if raw.is_null() {
            return Ok(None);
        }
        from_json_kind(&self.kind, &self.placeholders, raw).map(Some)
    }

    /// Check that a prebuilt value matches this field's kind.
    pub fn check(&self, value: &Value) -> Result<(), TypeError> {
        check_kind(&self.kind, value)
    }

    /// Render a value in ASCII wire form.
    ///
    /// `None` renders as the `unset_field` placeholder; empty strings and
    /// containers render as `empty_field`.
    pub fn to_ascii(&self, value: Option<&Value>) -> Result<String, TypeError> {
        match value {
            None => Ok(self.placeholders.unset_field.to_string()),
            Some(v) => to_ascii_kind(&self.kind, &self.placeholders, v),
        }
    }

    /// Render a value as a JSON primitive (`None` becomes JSON `null`).
    pub fn to_json(&self, value: Option<&Value>) -> Result<Json, TypeError> {
        match value {
            None => Ok(Json::Null),
            Some(v) => to_json_kind(&self.kind, v),
        }
    }
}

fn record_unsupported(op: &str) -> TypeError {
    TypeError::ty(format!(
        "record is a declaration-only type and does not support {op}"
    ))
}

fn mismatch(kind: &TypeKind, value: &Value) -> TypeError {
    TypeError::ty(format!(
        "expected {} value, got {}",
        kind.zeek_name(),
        value.kind_name()
    ))
}

fn parse_kind(kind: &TypeKind, ph: &Placeholders, raw: &str) -> Result<Value, TypeError> {
    match kind {
        TypeKind::Bool => match raw {
            "T" => Ok(Value::Bool(true)),
            "F" => Ok(Value::Bool(false)),
            _ => Err(TypeError::value(format!("invalid bool: {raw}"))),
        },
        TypeKind::Count => raw
            .parse::<u64>()
            .map(Value::Count)
            .map_err(|_| TypeError::value(format!("invalid count: {raw}"))),
        TypeKind::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| TypeError::value(format!("invalid int: {raw}"))),
        TypeKind::Double => raw
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| TypeError::value(format!("invalid double: {raw}"))),
        TypeKind::Time => {
            let micros = parse_decimal_micros(raw, "time")?;
            DateTime::<Utc>::from_timestamp_micros(micros)
                .map(Value::Time)
                .ok_or_else(|| TypeError::value(format!("time out of range: {raw}")))
        }
        TypeKind::Interval => {
            parse_decimal_micros(raw, "interval").map(|m| Value::Interval(Interval::from_micros(m)))
        }
        TypeKind::String => {
            if raw == ph.empty_field {
                Ok(Value::String(CompactString::const_new("")))
            } else {
                unescape(raw).map(Value::String)
            }
        }
        TypeKind::Addr => raw
            .parse()
            .map(Value::Addr)
            .map_err(|_| TypeError::value(format!("invalid addr: {raw}"))),
        TypeKind::Port => raw
            .parse::<u16>()
            .map(Value::Port)
            .map_err(|_| TypeError::value(format!("invalid port: {raw}"))),
        TypeKind::Subnet => raw.parse().map(Value::Subnet),
        TypeKind::Enum(binding) => Ok(Value::Enum(resolve_enum_literal(binding, raw))),
        TypeKind::Any => Ok(Value::Any(Json::String(raw.to_string()))),
        TypeKind::Set(elem) => parse_container(elem, ph, raw).map(Value::Set),
        TypeKind::Vector(elem) => parse_container(elem, ph, raw).map(Value::Vector),
        TypeKind::Record(_) => Err(record_unsupported("parse")),
    }
}

fn parse_container(elem: &TypeKind, ph: &Placeholders, raw: &str) -> Result<Vec<Value>, TypeError> {
    if raw == ph.empty_field {
        return Ok(Vec::new());
    }
    raw.split(ph.set_separator.as_str())
        .map(|token| {
            if token == ph.unset_field {
                Err(TypeError::value(format!(
                    "unset value inside {} container",
                    elem.zeek_name()
                )))
            } else {
                parse_kind(elem, ph, token)
            }
        })
        .collect()
}

fn resolve_enum_literal(binding: &EnumBinding, literal: &str) -> EnumValue {
    match binding.lookup(literal) {
        Some(value) => value.clone(),
        None => {
            warn!(literal, "unresolvable enum literal, fabricating value");
            EnumValue::from_literal(literal)
        }
    }
}

fn from_json_kind(kind: &TypeKind, ph: &Placeholders, raw: &Json) -> Result<Value, TypeError> {
    // Strings for non-string kinds reuse the token grammar (addr, subnet,
    // enum, decimal time/interval all arrive as JSON strings in practice).
    if let (Json::String(s), false) = (raw, matches!(kind, TypeKind::String | TypeKind::Any)) {
        return parse_kind(kind, ph, s);
    }

    let wrong = || TypeError::ty(format!("expected JSON {} value, got {raw}", kind.zeek_name()));
    match kind {
        TypeKind::Bool => raw.as_bool().map(Value::Bool).ok_or_else(wrong),
        TypeKind::Count => raw.as_u64().map(Value::Count).ok_or_else(wrong),
        TypeKind::Int => raw.as_i64().map(Value::Int).ok_or_else(wrong),
        TypeKind::Double => raw.as_f64().map(Value::Double).ok_or_else(wrong),
        TypeKind::Time => {
            let secs = raw.as_f64().ok_or_else(wrong)?;
            DateTime::<Utc>::from_timestamp_micros((secs * 1e6).round() as i64)
                .map(Value::Time)
                .ok_or_else(|| TypeError::value(format!("time out of range: {raw}")))
        }
        TypeKind::Interval => {
            let secs = raw.as_f64().ok_or_else(wrong)?;
            Ok(Value::Interval(Interval::from_micros(
                (secs * 1e6).round() as i64,
            )))
        }
        TypeKind::String => raw
            .as_str()
            .map(|s| Value::String(CompactString::from(s)))
            .ok_or_else(wrong),
        TypeKind::Port => raw
            .as_u64()
            .and_then(|p| u16::try_from(p).ok())
            .map(Value::Port)
            .ok_or_else(wrong),
        TypeKind::Addr | TypeKind::Subnet | TypeKind::Enum(_) => Err(wrong()),
        TypeKind::Any => Ok(Value::Any(raw.clone())),
        TypeKind::Set(elem) => from_json_container(elem, ph, raw).map(Value::Set),
        TypeKind::Vector(elem) => from_json_container(elem, ph, raw).map(Value::Vector),
        TypeKind::Record(_) => Err(record_unsupported("from_json")),
    }
}

fn from_json_container(
    elem: &TypeKind,
    ph: &Placeholders,
    raw: &Json,
) -> Result<Vec<Value>, TypeError> {
    let items = raw
        .as_array()
        .ok_or_else(|| TypeError::ty(format!("expected JSON array, got {raw}")))?;
    items
        .iter()
        .map(|item| {
            if item.is_null() {
                Err(TypeError::value(format!(
                    "unset value inside {} container",
                    elem.zeek_name()
                )))
            } else {
                from_json_kind(elem, ph, item)
            }
        })
        .collect()
}

fn check_kind(kind: &TypeKind, value: &Value) -> Result<(), TypeError> {
    match (kind, value) {
        (TypeKind::Bool, Value::Bool(_))
        | (TypeKind::Count, Value::Count(_))
        | (TypeKind::Int, Value::Int(_))
        | (TypeKind::Double, Value::Double(_))
        | (TypeKind::Time, Value::Time(_))
        | (TypeKind::Interval, Value::Interval(_))
        | (TypeKind::String, Value::String(_))
        | (TypeKind::Addr, Value::Addr(_))
        | (TypeKind::Port, Value::Port(_))
        | (TypeKind::Subnet, Value::Subnet(_))
        | (TypeKind::Enum(_), Value::Enum(_)) => Ok(()),
        (TypeKind::Any, _) => Ok(()),
        (TypeKind::Set(elem), Value::Set(items))
        | (TypeKind::Vector(elem), Value::Vector(items)) => {
            items.iter().try_for_each(|item| check_kind(elem, item))
        }
        (TypeKind::Record(_), _) => Err(record_unsupported("check")),
        _ => Err(mismatch(kind, value)),
    }
}

fn to_ascii_kind(kind: &TypeKind, ph: &Placeholders, value: &Value) -> Result<String, TypeError> {
    match (kind, value) {
        (TypeKind::Bool, Value::Bool(v)) => Ok(if *v { "T" } else { "F" }.to_string()),
        (TypeKind::Count, Value::Count(v)) => Ok(v.to_string()),
        (TypeKind::Int, Value::Int(v)) => Ok(v.to_string()),
        (TypeKind::Double, Value::Double(v)) => Ok(format_double(*v)),
        (TypeKind::Time, Value::Time(v)) => Ok(format_decimal_micros(v.timestamp_micros())),
        (TypeKind::Interval, Value::Interval(v)) => Ok(v.to_string()),
        (TypeKind::String, Value::String(s)) => {
            if s.is_empty() {
                Ok(ph.empty_field.to_string())
            } else {
                Ok(escape(s))
            }
        }
        (TypeKind::Addr, Value::Addr(a)) => Ok(a.to_string()),
        (TypeKind::Port, Value::Port(p)) => Ok(p.to_string()),
        (TypeKind::Subnet, Value::Subnet(s)) => Ok(s.to_string()),
        (TypeKind::Enum(_), Value::Enum(e)) => Ok(e.to_string()),
        (TypeKind::Any, v) => Ok(any_to_ascii(ph, v)),
        (TypeKind::Set(elem), Value::Set(items))
        | (TypeKind::Vector(elem), Value::Vector(items)) => {
            if items.is_empty() {
                return Ok(ph.empty_field.to_string());
            }
            let rendered: Result<Vec<_>, _> = items
                .iter()
                .map(|item| {
                    to_ascii_kind(elem, ph, item)
                        .map(|s| escape_separator(s, ph.set_separator.as_str()))
                })
                .collect();
            Ok(rendered?.join(ph.set_separator.as_str()))
        }
        (TypeKind::Record(_), _) => Err(record_unsupported("to_ascii")),
        (kind, value) => Err(mismatch(kind, value)),
    }
}

// A separator occurring inside a rendered element would split the element
// on re-read; encode it as `\xHH` bytes instead.
fn escape_separator(token: String, separator: &str) -> String {
    if !token.contains(separator) {
        return token;
    }
    let escaped: String = separator
        .bytes()
        .map(|b| format!("\\x{b:02x}"))
        .collect();
    token.replace(separator, &escaped)
}

fn any_to_ascii(ph: &Placeholders, value: &Value) -> String {
    match value {
        Value::Any(Json::Null) => ph.unset_field.to_string(),
        Value::Any(Json::String(s)) if s.is_empty() => ph.empty_field.to_string(),
        Value::Any(Json::String(s)) => escape(s),
        Value::Any(other) => other.to_string(),
        other => other.to_string(),
    }
}

fn to_json_kind(kind: &TypeKind, value: &Value) -> Result<Json, TypeError> {
    match (kind, value) {
        (TypeKind::Bool, Value::Bool(v)) => Ok(Json::Bool(*v)),
        (TypeKind::Count, Value::Count(v)) => Ok(Json::from(*v)),
        (TypeKind::Int, Value::Int(v)) => Ok(Json::from(*v)),
        (TypeKind::Double, Value::Double(v)) => json_f64(*v),
        (TypeKind::Time, Value::Time(v)) => {
            json_f64(v.timestamp_micros() as f64 / 1e6)
        }
        (TypeKind::Interval, Value::Interval(v)) => json_f64(v.as_secs_f64()),
        (TypeKind::String, Value::String(s)) => Ok(Json::String(s.to_string())),
        (TypeKind::Addr, Value::Addr(a)) => Ok(Json::String(a.to_string())),
        (TypeKind::Port, Value::Port(p)) => Ok(Json::from(*p)),
        (TypeKind::Subnet, Value::Subnet(s)) => Ok(Json::String(s.to_string())),
        (TypeKind::Enum(_), Value::Enum(e)) => Ok(Json::String(e.to_string())),
        (TypeKind::Any, v) => Ok(any_to_json(v)),
        (TypeKind::Set(elem), Value::Set(items))
        | (TypeKind::Vector(elem), Value::Vector(items)) => {
            let rendered: Result<Vec<_>, _> = items
                .iter()
                .map(|item| to_json_kind(elem, item))
                .collect();
            Ok(Json::Array(rendered?))
        }
        (TypeKind::Record(_), _) => Err(record_unsupported("to_json")),
        (kind, value) => Err(mismatch(kind, value)),
    }
}

fn json_f64(v: f64) -> Result<Json, TypeError> {
    serde_json::Number::from_f64(v)
        .map(Json::Number)
        .ok_or_else(|| TypeError::value(format!("{v} is not JSON-representable")))
}

// `any` never fails serialization: a non-representable value degrades to a
// diagnostic object instead.
fn any_to_json(value: &Value) -> Json {
    let attempt = match value {
        Value::Any(json) => Ok(json.clone()),
        Value::Bool(v) => Ok(Json::Bool(*v)),
        Value::Count(v) => Ok(Json::from(*v)),
        Value::Int(v) => Ok(Json::from(*v)),
        Value::Port(p) => Ok(Json::from(*p)),
        Value::Double(v) => json_f64(*v),
        Value::Time(v) => json_f64(v.timestamp_micros() as f64 / 1e6),
        Value::Interval(v) => json_f64(v.as_secs_f64()),
        Value::String(s) => Ok(Json::String(s.to_string())),
        Value::Addr(a) => Ok(Json::String(a.to_string())),
        Value::Subnet(s) => Ok(Json::String(s.to_string())),
        Value::Enum(e) => Ok(Json::String(e.to_string())),
        Value::Set(items) | Value::Vector(items) => {
            Ok(Json::Array(items.iter().map(any_to_json).collect()))
        }
    };
    attempt.unwrap_or_else(|err| {
        serde_json::json!({
            "data": value.to_string(),
            "error": err.to_string(),
        })
    })
}

/// Decode Zeek's backslash escapes (`\xHH`, `\\`, `\t`, `\n`, `\r`).
pub(crate) fn unescape(raw: &str) -> Result<CompactString, TypeError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('x') => {
                let hi = chars.next();
                let lo = chars.next();
                let byte = match (hi, lo) {
                    (Some(h), Some(l)) => u8::from_str_radix(&format!("{h}{l}"), 16).ok(),
                    _ => None,
                }
                .ok_or_else(|| TypeError::value(format!("invalid \\x escape in: {raw}")))?;
                out.push(byte as char);
            }
            other => {
                return Err(TypeError::value(format!(
                    "invalid escape \\{} in: {raw}",
                    other.map(String::from).unwrap_or_default()
                )))
            }
        }
    }
    Ok(CompactString::from(out))
}

/// Escape backslashes, non-printable bytes, and high (0x80..=0xff) bytes
/// as `\xHH` for ASCII output. Covers the tab separator, so embedded
/// separators never split a column, and keeps `\xHH`-decoded high bytes
/// byte-stable on rewrite.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            c if matches!(c as u32, 0x00..=0x1f | 0x7f..=0xff) => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    fn ft(kind: TypeKind) -> FieldType {
        FieldType::new(kind)
    }

    #[test]
    fn test_unset_placeholder_parses_to_none() {
        for kind in [TypeKind::Bool, TypeKind::Count, TypeKind::String, TypeKind::Any] {
            assert_eq!(ft(kind).parse("-").unwrap(), None);
        }
    }

    #[test]
    fn test_bool_accepts_exactly_t_and_f() {
        let bool_ty = ft(TypeKind::Bool);
        assert_eq!(bool_ty.parse("T").unwrap(), Some(Value::Bool(true)));
        assert_eq!(bool_ty.parse("F").unwrap(), Some(Value::Bool(false)));
        assert!(bool_ty.parse("true").is_err());
        assert!(bool_ty.parse("t").is_err());
    }

    #[test]
    fn test_numeric_scalars() {
        assert_eq!(ft(TypeKind::Count).parse("42").unwrap(), Some(Value::Count(42)));
        assert!(ft(TypeKind::Count).parse("-1").is_err());
        assert_eq!(ft(TypeKind::Int).parse("-7").unwrap(), Some(Value::Int(-7)));
        assert_eq!(ft(TypeKind::Port).parse("443").unwrap(), Some(Value::Port(443)));
        assert!(ft(TypeKind::Port).parse("70000").is_err());
    }

    #[test]
    fn test_double_truncates_not_rounds() {
        let double = ft(TypeKind::Double);
        let parsed = double.parse("1.1234565").unwrap();
        assert_eq!(double.to_ascii(parsed.as_ref()).unwrap(), "1.123456");

        let parsed = double.parse("1.1234567").unwrap();
        assert_eq!(double.to_ascii(parsed.as_ref()).unwrap(), "1.123456");
    }

    #[test]
    fn test_time_roundtrip() {
        let time = ft(TypeKind::Time);
        let parsed = time.parse("1577836800.000000").unwrap().unwrap();
        match &parsed {
            Value::Time(t) => assert_eq!(t.timestamp(), 1_577_836_800),
            other => panic!("expected time, got {other:?}"),
        }
        assert_eq!(
            time.to_ascii(Some(&parsed)).unwrap(),
            "1577836800.000000"
        );
    }

    #[test]
    fn test_interval_wire_form() {
        let iv = ft(TypeKind::Interval);
        let parsed = iv.parse("3.141592").unwrap().unwrap();
        assert_eq!(iv.to_ascii(Some(&parsed)).unwrap(), "3.141592");
        assert_eq!(
            iv.to_json(Some(&parsed)).unwrap(),
            serde_json::json!(3.141592)
        );
    }

    #[test]
    fn test_string_empty_vs_unset() {
        let string = ft(TypeKind::String);
        assert_eq!(string.parse("-").unwrap(), None);
        assert_eq!(
            string.parse("(empty)").unwrap(),
            Some(Value::String("".into()))
        );
        assert_eq!(string.to_ascii(None).unwrap(), "-");
        assert_eq!(
            string.to_ascii(Some(&Value::String("".into()))).unwrap(),
            "(empty)"
        );
    }

    #[test]
    fn test_string_escapes() {
        let string = ft(TypeKind::String);
        let parsed = string.parse("a\\x09b").unwrap().unwrap();
        assert_eq!(parsed, Value::String("a\tb".into()));
        assert_eq!(string.to_ascii(Some(&parsed)).unwrap(), "a\\x09b");

        let parsed = string.parse("c:\\\\path").unwrap().unwrap();
        assert_eq!(parsed, Value::String("c:\\path".into()));
    }

    #[test]
    fn test_high_byte_escape_is_byte_stable() {
        let string = ft(TypeKind::String);
        let parsed = string.parse("a\\xffb").unwrap().unwrap();
        assert_eq!(parsed, Value::String("a\u{ff}b".into()));
        assert_eq!(string.to_ascii(Some(&parsed)).unwrap(), "a\\xffb");
    }

    #[test]
    fn test_addr_and_subnet() {
        let addr = ft(TypeKind::Addr);
        assert_eq!(
            addr.parse("192.168.1.1").unwrap(),
            Some(Value::Addr("192.168.1.1".parse::<IpAddr>().unwrap()))
        );
        assert!(addr.parse("999.1.1.1").is_err());

        let subnet = ft(TypeKind::Subnet);
        let parsed = subnet.parse("10.0.0.0/8").unwrap().unwrap();
        assert_eq!(subnet.to_ascii(Some(&parsed)).unwrap(), "10.0.0.0/8");
    }

    #[test]
    fn test_enum_resolves_through_binding() {
        let mut reg = EnumNamespaceRegistry::new();
        reg.register("Notice", ["ACTION_LOG"]);
        let binding = EnumBinding::resolve(&reg, &["Notice"], false);
        let enum_ty = ft(TypeKind::Enum(binding));

        let parsed = enum_ty.parse("Notice::ACTION_LOG").unwrap().unwrap();
        assert_eq!(
            parsed,
            Value::Enum(EnumValue::new("Notice", "ACTION_LOG"))
        );
        assert_eq!(
            enum_ty.to_ascii(Some(&parsed)).unwrap(),
            "Notice::ACTION_LOG"
        );
    }

    #[test]
    fn test_unresolvable_enum_is_fabricated_not_fatal() {
        let enum_ty = ft(TypeKind::Enum(EnumBinding::empty()));
        let parsed = enum_ty.parse("Mystery::WHO_KNOWS").unwrap().unwrap();
        assert_eq!(
            parsed,
            Value::Enum(EnumValue::new("Mystery", "WHO_KNOWS"))
        );
    }

    #[test]
    fn test_set_and_vector_parse() {
        let set = ft(TypeKind::Set(Box::new(TypeKind::Count)));
        assert_eq!(
            set.parse("1,2,3").unwrap(),
            Some(Value::Set(vec![
                Value::Count(1),
                Value::Count(2),
                Value::Count(3)
            ]))
        );
        assert_eq!(set.parse("(empty)").unwrap(), Some(Value::Set(vec![])));
        assert_eq!(set.parse("-").unwrap(), None);

        let vector = ft(TypeKind::Vector(Box::new(TypeKind::String)));
        assert_eq!(
            vector.parse("a,b").unwrap(),
            Some(Value::Vector(vec![
                Value::String("a".into()),
                Value::String("b".into())
            ]))
        );
    }

    #[test]
    fn test_container_ascii_roundtrip() {
        let vector = ft(TypeKind::Vector(Box::new(TypeKind::Count)));
        let parsed = vector.parse("10,20").unwrap();
        assert_eq!(vector.to_ascii(parsed.as_ref()).unwrap(), "10,20");

        let empty = vector.parse("(empty)").unwrap();
        assert_eq!(vector.to_ascii(empty.as_ref()).unwrap(), "(empty)");
        assert_eq!(vector.to_ascii(None).unwrap(), "-");
    }

    #[test]
    fn test_separator_in_container_element_roundtrips() {
        let vector = ft(TypeKind::Vector(Box::new(TypeKind::String)));
        let value = Value::Vector(vec![
            Value::String("a,b".into()),
            Value::String("c".into()),
        ]);
        let rendered = vector.to_ascii(Some(&value)).unwrap();
        assert_eq!(rendered, "a\\x2cb,c");
        assert_eq!(vector.parse(&rendered).unwrap(), Some(value));
    }

    #[test]
    fn test_unset_inside_container_rejected() {
        let set = ft(TypeKind::Set(Box::new(TypeKind::Count)));
        assert!(set.parse("1,-,3").is_err());
    }

    #[test]
    fn test_record_kind_is_declaration_only() {
        let record = ft(TypeKind::Record(IndexMap::new()));
        assert!(record.parse("x").is_err());
        assert!(record.to_ascii(Some(&Value::Count(1))).is_err());
        assert!(record.to_json(Some(&Value::Count(1))).is_err());
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(
            ft(TypeKind::Count).from_json(&serde_json::json!(42)).unwrap(),
            Some(Value::Count(42))
        );
        assert_eq!(
            ft(TypeKind::Bool).from_json(&serde_json::json!(true)).unwrap(),
            Some(Value::Bool(true))
        );
        assert_eq!(ft(TypeKind::Count).from_json(&Json::Null).unwrap(), None);
        assert!(ft(TypeKind::Count)
            .from_json(&serde_json::json!("notanumber"))
            .is_err());
    }

    #[test]
    fn test_from_json_strings_use_token_grammar() {
        let addr = ft(TypeKind::Addr);
        assert_eq!(
            addr.from_json(&serde_json::json!("10.0.0.1")).unwrap(),
            Some(Value::Addr("10.0.0.1".parse::<IpAddr>().unwrap()))
        );

        let time = ft(TypeKind::Time);
        let from_string = time
            .from_json(&serde_json::json!("1577836800.000000"))
            .unwrap();
        let from_number = time.from_json(&serde_json::json!(1577836800.0)).unwrap();
        assert_eq!(from_string, from_number);
    }

    #[test]
    fn test_from_json_string_kind_keeps_placeholder_literals() {
        // "-" is a placeholder on the ASCII wire, not in JSON.
        let string = ft(TypeKind::String);
        assert_eq!(
            string.from_json(&serde_json::json!("-")).unwrap(),
            Some(Value::String("-".into()))
        );
    }

    #[test]
    fn test_from_json_containers() {
        let vector = ft(TypeKind::Vector(Box::new(TypeKind::Count)));
        assert_eq!(
            vector.from_json(&serde_json::json!([1, 2])).unwrap(),
            Some(Value::Vector(vec![Value::Count(1), Value::Count(2)]))
        );
        assert!(vector.from_json(&serde_json::json!([1, null])).is_err());
        assert!(vector.from_json(&serde_json::json!(7)).is_err());
    }

    #[test]
    fn test_any_json_fallback_for_non_finite() {
        let any = ft(TypeKind::Any);
        let rendered = any.to_json(Some(&Value::Double(f64::NAN))).unwrap();
        assert_eq!(rendered["data"], serde_json::json!("NaN"));
        assert!(rendered["error"].is_string());
    }

    #[test]
    fn test_double_json_rejects_non_finite() {
        let double = ft(TypeKind::Double);
        assert!(double.to_json(Some(&Value::Double(f64::INFINITY))).is_err());
    }

    #[test]
    fn test_check_rejects_kind_mismatch() {
        assert!(ft(TypeKind::Count).check(&Value::Count(1)).is_ok());
        assert!(ft(TypeKind::Count).check(&Value::Int(1)).is_err());
        assert!(ft(TypeKind::Any).check(&Value::Int(1)).is_ok());

        let set = ft(TypeKind::Set(Box::new(TypeKind::Count)));
        assert!(set.check(&Value::Set(vec![Value::Count(1)])).is_ok());
        assert!(set.check(&Value::Set(vec![Value::Int(1)])).is_err());
    }

    #[test]
    fn test_zeek_names() {
        assert_eq!(TypeKind::Count.zeek_name(), "count");
        assert_eq!(
            TypeKind::Set(Box::new(TypeKind::String)).zeek_name(),
            "set[string]"
        );
        assert_eq!(
            TypeKind::Vector(Box::new(TypeKind::Set(Box::new(TypeKind::Port)))).zeek_name(),
            "vector[set[port]]"
        );
    }

    #[test]
    fn test_same_kind() {
        assert!(TypeKind::Count.same_kind(&TypeKind::Count));
        assert!(!TypeKind::Count.same_kind(&TypeKind::Int));
        assert!(TypeKind::Enum(EnumBinding::empty())
            .same_kind(&TypeKind::Enum(EnumBinding::empty())));
        assert!(TypeKind::Set(Box::new(TypeKind::Count))
            .same_kind(&TypeKind::Set(Box::new(TypeKind::Count))));
        assert!(!TypeKind::Set(Box::new(TypeKind::Count))
            .same_kind(&TypeKind::Vector(Box::new(TypeKind::Count))));
    }
}
