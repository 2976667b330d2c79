//! JSON value model
//!
//! A closed tagged union over the six JSON shapes. Mappings keep the
//! caller's key order so deduplicated items come back exactly as supplied;
//! only the comparison key is ever reordered.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{Error, Result};

/// Key/value storage for `JsonValue::Mapping`, in insertion order
pub type Map = IndexMap<String, JsonValue>;

/// A JSON-representable value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<JsonValue>),
    Mapping(Map),
}

impl JsonValue {
    /// True for sequences and mappings
    pub fn is_composite(&self) -> bool {
        matches!(self, JsonValue::Sequence(_) | JsonValue::Mapping(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Sequence(_) => "sequence",
            JsonValue::Mapping(_) => "mapping",
        }
    }

    pub fn as_mapping(&self) -> Option<&Map> {
        match self {
            JsonValue::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

// ── Numbers ────────────────────────────────────────────────

/// A JSON number: 64-bit integer or `f64`.
///
/// Integers and floats never compare equal (`1` is not `1.0`). Non-negative
/// integers share one representation whichever constructor built them.
/// Non-finite floats can be constructed but are rejected by the normalizer.
#[derive(Debug, Clone, Copy)]
pub struct Number(N);

#[derive(Debug, Clone, Copy)]
enum N {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    pub fn from_f64(f: f64) -> Self {
        Number(N::Float(f))
    }

    pub fn is_finite(&self) -> bool {
        match self.0 {
            N::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            N::PosInt(u) => i64::try_from(u).ok(),
            N::NegInt(i) => Some(i),
            N::Float(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            N::PosInt(u) => Some(u),
            _ => None,
        }
    }

    /// Numeric value as `f64`, lossy for integers beyond 2^53
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            N::PosInt(u) => u as f64,
            N::NegInt(i) => i as f64,
            N::Float(f) => f,
        }
    }

    fn exact_int(&self) -> Option<i128> {
        match self.0 {
            N::PosInt(u) => Some(i128::from(u)),
            N::NegInt(i) => Some(i128::from(i)),
            N::Float(_) => None,
        }
    }
}

impl Ord for Number {
    /// Exact numeric value first, then integer before float, then
    /// `f64::total_cmp` between floats.
    ///
    /// The tie-breaks make the order total and consistent with `Eq`:
    /// `1 < 1.0`, `0 < -0.0 < 0.0`, and integers beyond 2^53 are never
    /// rounded before comparison.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.exact_int(), other.exact_int()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(a), None) => cmp_int_float(a, other.as_f64()).then(Ordering::Less),
            (None, Some(b)) => cmp_int_float(b, self.as_f64())
                .reverse()
                .then(Ordering::Greater),
            (None, None) => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

/// Exact numeric comparison of an integer with a float. `Equal` on a tie.
///
/// NaN sorts by sign, matching where `total_cmp` puts it among floats.
fn cmp_int_float(i: i128, f: f64) -> Ordering {
    const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
    const NEG_TWO_POW_63: f64 = -9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= TWO_POW_64 {
        return Ordering::Less;
    }
    if f < NEG_TWO_POW_63 {
        return Ordering::Greater;
    }
    // |trunc| < 2^64 here, so the cast is exact
    let whole = f.trunc();
    i.cmp(&(whole as i128))
        .then_with(|| 0.0f64.total_cmp(&(f - whole)))
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.0 {
            N::Float(f) => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
            _ => {
                0u8.hash(state);
                self.exact_int().hash(state);
            }
        }
    }
}

impl fmt::Display for Number {
    /// Integers in decimal; floats always carry a fraction or exponent (`1.0`, never `1`)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            N::PosInt(u) => write!(f, "{}", u),
            N::NegInt(i) => write!(f, "{}", i),
            N::Float(x) => {
                // Debug is shortest round-trip and switches to an exponent
                // for very large and very small magnitudes
                let s = format!("{:?}", x);
                if !x.is_finite() || s.contains(['.', 'e']) {
                    f.write_str(&s)
                } else {
                    write!(f, "{}.0", s)
                }
            }
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        if i < 0 {
            Number(N::NegInt(i))
        } else {
            Number(N::PosInt(i as u64))
        }
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::from(i64::from(i))
    }
}

impl From<u64> for Number {
    fn from(u: u64) -> Self {
        Number(N::PosInt(u))
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::from_f64(f)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            N::PosInt(u) => serializer.serialize_u64(u),
            N::NegInt(i) => serializer.serialize_i64(i),
            N::Float(f) => serializer.serialize_f64(f),
        }
    }
}

// ── Conversions ────────────────────────────────────────────

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Bool(b)
    }
}

impl From<Number> for JsonValue {
    fn from(n: Number) -> Self {
        JsonValue::Number(n)
    }
}

impl From<i32> for JsonValue {
    fn from(i: i32) -> Self {
        JsonValue::Number(i.into())
    }
}

impl From<i64> for JsonValue {
    fn from(i: i64) -> Self {
        JsonValue::Number(i.into())
    }
}

impl From<u64> for JsonValue {
    fn from(u: u64) -> Self {
        JsonValue::Number(u.into())
    }
}

impl From<f64> for JsonValue {
    fn from(f: f64) -> Self {
        JsonValue::Number(f.into())
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Sequence(items)
    }
}

impl From<Map> for JsonValue {
    fn from(map: Map) -> Self {
        JsonValue::Mapping(map)
    }
}

impl From<serde_json::Number> for Number {
    fn from(n: serde_json::Number) -> Self {
        if let Some(u) = n.as_u64() {
            Number::from(u)
        } else if let Some(i) = n.as_i64() {
            Number::from(i)
        } else {
            Number::from_f64(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(b) => JsonValue::Bool(b),
            serde_json::Value::Number(n) => JsonValue::Number(n.into()),
            serde_json::Value::String(s) => JsonValue::String(s),
            serde_json::Value::Array(items) => {
                JsonValue::Sequence(items.into_iter().map(JsonValue::from).collect())
            }
            serde_json::Value::Object(map) => JsonValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::Number(n) => n.serialize(serializer),
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            JsonValue::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(JsonValue::from)
    }
}

impl FromStr for JsonValue {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        parse_value(text)
    }
}

// ── Text entry points ──────────────────────────────────────

/// Parse one JSON document, keeping mapping key order
///
/// # Errors
/// Returns `ParseError` if `text` is not valid JSON.
pub fn parse_value(text: &str) -> Result<JsonValue> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(JsonValue::from)
        .map_err(|e| Error::ParseError(e.to_string()))
}

/// Parse a JSON array document into the items to deduplicate
///
/// # Errors
/// Returns `ParseError` if `text` is not valid JSON or its top level is not
/// an array.
pub fn parse_items(text: &str) -> Result<Vec<JsonValue>> {
    match parse_value(text)? {
        JsonValue::Sequence(items) => Ok(items),
        other => Err(Error::ParseError(format!(
            "expected a JSON array of items, found {}",
            other.type_name()
        ))),
    }
}
