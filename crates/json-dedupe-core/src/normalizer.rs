//! Canonical normalizer — converts a JSON value to its comparison form
//!
//! The canonical form is the single representative used for equality,
//! hashing, and fingerprints. It is never handed back as deduplicated
//! output; callers always get their original values.
//!
//! # Rules (applied bottom-up)
//!
//! - Primitives are unchanged.
//! - Mappings become `(key, value)` pairs sorted by key (byte order).
//! - Sequences whose elements are all primitive keep their order.
//! - Sequences with at least one sequence or mapping element are sorted
//!   by the total order on canonical forms.
//!
//! # Total order
//!
//! `Null < Bool < Number < String < Sequence < Mapping`, then within a type:
//! `false < true`, numbers as defined on [`Number`], strings by bytes,
//! sequences and mappings lexicographically by element / pair.
//!
//! # Guarantees
//!
//! - **Idempotent**: `normalize(&normalize(x)?.to_value()) == normalize(x)`
//! - **Deterministic**: same input always produces same output
//! - **Key-order independent**: permuting mapping keys never changes the result

use sha2::{Digest, Sha256};

use crate::value::{parse_value, JsonValue, Map, Number};
use crate::{Error, Result};

/// Canonical comparison form of a [`JsonValue`]
///
/// Variant order is the type rank; the derived `Ord` relies on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalForm {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<CanonicalForm>),
    Mapping(Vec<(String, CanonicalForm)>),
}

impl CanonicalForm {
    /// Rebuild a `JsonValue`, mapping keys in sorted order
    pub fn to_value(&self) -> JsonValue {
        match self {
            CanonicalForm::Null => JsonValue::Null,
            CanonicalForm::Bool(b) => JsonValue::Bool(*b),
            CanonicalForm::Number(n) => JsonValue::Number(*n),
            CanonicalForm::String(s) => JsonValue::String(s.clone()),
            CanonicalForm::Sequence(items) => {
                JsonValue::Sequence(items.iter().map(CanonicalForm::to_value).collect())
            }
            CanonicalForm::Mapping(pairs) => JsonValue::Mapping(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect::<Map>(),
            ),
        }
    }
}

impl std::fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&serialize_canonical(self))
    }
}

// ── Public API ─────────────────────────────────────────────

/// Normalize a value to canonical form
///
/// # Errors
/// Returns `UnsupportedType` for a non-finite number, with a JSON Pointer to
/// where it was found.
pub fn normalize(value: &JsonValue) -> Result<CanonicalForm> {
    match value {
        JsonValue::Null => Ok(CanonicalForm::Null),
        JsonValue::Bool(b) => Ok(CanonicalForm::Bool(*b)),
        JsonValue::Number(n) if n.is_finite() => Ok(CanonicalForm::Number(*n)),
        JsonValue::Number(n) => Err(Error::unsupported(format!("non-finite number {}", n))),
        JsonValue::String(s) => Ok(CanonicalForm::String(s.clone())),
        JsonValue::Mapping(map) => {
            let mut pairs = map
                .iter()
                .map(|(key, v)| {
                    normalize(v)
                        .map(|c| (key.clone(), c))
                        .map_err(|e| e.within(key))
                })
                .collect::<Result<Vec<_>>>()?;
            // Keys are unique, so an unstable sort is still deterministic
            pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
            Ok(CanonicalForm::Mapping(pairs))
        }
        JsonValue::Sequence(items) => {
            let mut elements = items
                .iter()
                .enumerate()
                .map(|(i, item)| normalize(item).map_err(|e| e.within(i)))
                .collect::<Result<Vec<_>>>()?;
            if items.iter().any(JsonValue::is_composite) {
                elements.sort();
            }
            Ok(CanonicalForm::Sequence(elements))
        }
    }
}

/// Normalize one JSON document to canonical text
///
/// # Errors
/// Returns `ParseError` for invalid JSON.
pub fn normalize_str(text: &str) -> Result<String> {
    let value = parse_value(text)?;
    let canonical = normalize(&value)?;
    Ok(serialize_canonical(&canonical))
}

/// Whether two values are duplicates of each other
pub fn is_equivalent(a: &JsonValue, b: &JsonValue) -> Result<bool> {
    Ok(normalize(a)? == normalize(b)?)
}

// ── Canonical Serializer ───────────────────────────────────

/// Serialize a canonical form to compact, deterministic JSON text
///
/// Mappings render as objects with sorted keys, sequences in canonical
/// order, floats always with a fraction so `1` and `1.0` stay distinct.
pub fn serialize_canonical(canonical: &CanonicalForm) -> String {
    let mut out = String::new();
    write_canonical(&mut out, canonical);
    out
}

fn write_canonical(out: &mut String, canonical: &CanonicalForm) {
    match canonical {
        CanonicalForm::Null => out.push_str("null"),
        CanonicalForm::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        CanonicalForm::Number(n) => out.push_str(&n.to_string()),
        CanonicalForm::String(s) => write_json_string(out, s),
        CanonicalForm::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        CanonicalForm::Mapping(pairs) => {
            out.push('{');
            for (i, (key, value)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_json_string(out, key);
                out.push(':');
                write_canonical(out, value);
            }
            out.push('}');
        }
    }
}

fn write_json_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

// ── SHA-256 Fingerprint ────────────────────────────────────

/// SHA-256 over the canonical text, lowercase hex
///
/// Equivalent values always share a fingerprint.
pub fn compute_fingerprint(canonical: &CanonicalForm) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serialize_canonical(canonical).as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Normalize then fingerprint
pub fn fingerprint(value: &JsonValue) -> Result<String> {
    Ok(compute_fingerprint(&normalize(value)?))
}
