//! Runtime values for Zeek log fields.
//!
//! [`Value`] holds one coerced field value. Unset fields are represented as
//! `Option<Value>::None` by the schema layer, never as a `Value` variant.

use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use compact_str::CompactString;

use crate::error::TypeError;
use crate::types::EnumValue;

/// One coerced Zeek field value.
///
/// Containers hold their elements in input order; `Set` equality is
/// order-insensitive (Zeek does not define a serialization order for sets).
#[derive(Debug, Clone)]
pub enum Value {
    /// Boolean (`T`/`F` on the wire)
    Bool(bool),
    /// Unsigned 64-bit counter
    Count(u64),
    /// Signed 64-bit integer
    Int(i64),
    /// 64-bit floating point
    Double(f64),
    /// Absolute instant (epoch seconds with microsecond precision on the wire)
    Time(DateTime<Utc>),
    /// Signed duration with microsecond precision
    Interval(Interval),
    /// UTF-8 string
    String(CompactString),
    /// IP address (v4 or v6)
    Addr(IpAddr),
    /// Transport port number
    Port(u16),
    /// IP network in CIDR notation
    Subnet(Subnet),
    /// Enum literal resolved through the namespace registry
    Enum(EnumValue),
    /// Unordered collection of same-typed elements
    Set(Vec<Value>),
    /// Ordered collection of same-typed elements
    Vector(Vec<Value>),
    /// Schema-less passthrough value
    Any(serde_json::Value),
}

impl Value {
    /// Human-readable kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Count(_) => "count",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Time(_) => "time",
            Value::Interval(_) => "interval",
            Value::String(_) => "string",
            Value::Addr(_) => "addr",
            Value::Port(_) => "port",
            Value::Subnet(_) => "subnet",
            Value::Enum(_) => "enum",
            Value::Set(_) => "set",
            Value::Vector(_) => "vector",
            Value::Any(_) => "any",
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Count(v) => Some(*v),
            Value::Port(v) => Some(*v as u64),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Count(v) => i64::try_from(*v).ok(),
            Value::Port(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Interval(v) => Some(v.as_secs_f64()),
            _ => None,
        }
    }

    /// Try to get as str reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get as an IP address.
    pub fn as_addr(&self) -> Option<IpAddr> {
        match self {
            Value::Addr(a) => Some(*a),
            _ => None,
        }
    }

    /// Try to get as a slice of container elements.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Set(items) | Value::Vector(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", if *v { "T" } else { "F" }),
            Value::Count(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{}", format_double(*v)),
            Value::Time(v) => write!(f, "{}", format_decimal_micros(v.timestamp_micros())),
            Value::Interval(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Addr(a) => write!(f, "{a}"),
            Value::Port(p) => write!(f, "{p}"),
            Value::Subnet(s) => write!(f, "{s}"),
            Value::Enum(e) => write!(f, "{e}"),
            Value::Set(items) | Value::Vector(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Any(v) => write!(f, "{v}"),
        }
    }
}

// Manual PartialEq: Set comparison is order-insensitive, everything else is
// structural.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Count(a), Value::Count(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Interval(a), Value::Interval(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Addr(a), Value::Addr(b)) => a == b,
            (Value::Port(a), Value::Port(b)) => a == b,
            (Value::Subnet(a), Value::Subnet(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len()
                    && a.iter().all(|x| b.contains(x))
                    && b.iter().all(|y| a.contains(y))
            }
            (Value::Any(a), Value::Any(b)) => a == b,
            _ => false,
        }
    }
}

/// Signed duration with microsecond precision.
///
/// Stored as total microseconds; the wire form is seconds with exactly six
/// fractional digits. The split accessors expose Zeek's native
/// seconds / 3-digit-millis / 3-digit-micros decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    micros: i64,
}

impl Interval {
    /// Create from total microseconds.
    pub const fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    /// Create from whole seconds.
    pub const fn from_secs(secs: i64) -> Self {
        Self {
            micros: secs * 1_000_000,
        }
    }

    /// Total microseconds.
    pub const fn as_micros(&self) -> i64 {
        self.micros
    }

    /// Whole-second part (toward zero).
    pub const fn secs(&self) -> i64 {
        self.micros / 1_000_000
    }

    /// Millisecond part, 0..=999.
    pub const fn millis_part(&self) -> u32 {
        ((self.micros % 1_000_000).unsigned_abs() / 1_000) as u32
    }

    /// Microsecond part, 0..=999.
    pub const fn micros_part(&self) -> u32 {
        (self.micros.unsigned_abs() % 1_000) as u32
    }

    /// Duration as fractional seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.micros as f64 / 1e6
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_decimal_micros(self.micros))
    }
}

impl FromStr for Interval {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, TypeError> {
        parse_decimal_micros(s, "interval").map(Interval::from_micros)
    }
}

/// IP network in CIDR notation.
///
/// Hand-rolled over `std::net` (the prefix check is the only extra logic;
/// no need for a dedicated crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    addr: IpAddr,
    prefix: u8,
}

impl Subnet {
    /// Create a subnet, validating the prefix against the address family.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, TypeError> {
        let max = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix > max {
            return Err(TypeError::value(format!(
                "invalid subnet prefix {prefix} for {addr} (max {max})"
            )));
        }
        Ok(Self { addr, prefix })
    }

    /// Network address.
    pub const fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Prefix length.
    pub const fn prefix(&self) -> u8 {
        self.prefix
    }
}

impl std::fmt::Display for Subnet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl FromStr for Subnet {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, TypeError> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| TypeError::value(format!("invalid subnet: {s}")))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| TypeError::value(format!("invalid subnet address: {s}")))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| TypeError::value(format!("invalid subnet prefix: {s}")))?;
        Subnet::new(addr, prefix)
    }
}

/// Parse a decimal-seconds string (`"12.345678"`) into total microseconds.
///
/// Fractional digits beyond six are dropped; missing digits are treated as
/// zero. Used by `time` and `interval` which share the wire grammar.
pub(crate) fn parse_decimal_micros(raw: &str, what: &str) -> Result<i64, TypeError> {
    let err = || TypeError::value(format!("invalid {what}: {raw}"));

    let (neg, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let (secs_str, frac_str) = match body.split_once('.') {
        Some((s, f)) => (s, f),
        None => (body, ""),
    };
    if secs_str.is_empty() || !secs_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    if !frac_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }

    let secs: i64 = secs_str.parse().map_err(|_| err())?;
    let mut micros: i64 = 0;
    for i in 0..6 {
        let digit = frac_str.as_bytes().get(i).map_or(0, |b| (b - b'0') as i64);
        micros = micros * 10 + digit;
    }

    let total = secs
        .checked_mul(1_000_000)
        .and_then(|s| s.checked_add(micros))
        .ok_or_else(err)?;
    Ok(if neg { -total } else { total })
}

/// Render total microseconds as decimal seconds with exactly six fractional
/// digits.
pub(crate) fn format_decimal_micros(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let abs = micros.unsigned_abs();
    format!("{}{}.{:06}", sign, abs / 1_000_000, abs % 1_000_000)
}

/// Render a double with exactly six fractional digits, truncating (never
/// rounding) the tail: `1.1234567` becomes `"1.123456"`.
pub(crate) fn format_double(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let sign = if v.is_sign_negative() { "-" } else { "" };
    let abs = v.abs();
    // From 2^53 a double is integral, so fixed rendering cannot round.
    if abs >= 9_007_199_254_740_992.0 {
        return format!("{v:.6}");
    }
    let micros = (abs * 1e6).trunc() as u128;
    format!("{sign}{}.{:06}", micros / 1_000_000, micros % 1_000_000)
}
