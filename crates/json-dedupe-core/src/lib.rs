//! json-dedupe core - structural deduplication of JSON values
//!
//! This is the single source of truth for equivalence semantics.
//! The CLI and the language bindings (Python, Go) call into this crate.
//!
//! # Architecture
//!
//! ```text
//! JSON text → JsonValue → Normalizer → CanonicalForm → seen-set
//!                 ↓                          ↓
//!           Deduplicator ← first occurrences  Fingerprint (SHA-256)
//! ```
//!
//! # Equivalence
//!
//! - **Mappings**: key order is irrelevant
//! - **Primitive sequences**: order matters, at any nesting depth
//! - **Composite sequences** (any element a sequence or mapping): compared
//!   as multisets
//! - **Numbers**: `1` and `1.0` are distinct
//!
//! # Example
//!
//! ```
//! use json_dedupe_core::{deduplicate_json, Result};
//!
//! fn main() -> Result<()> {
//!     let out = deduplicate_json(r#"[{"a":1,"b":2},{"b":2,"a":1},[1,2],[2,1]]"#)?;
//!     assert_eq!(out, r#"[{"a":1,"b":2},[1,2],[2,1]]"#);
//!     Ok(())
//! }
//! ```

pub mod dedupe;
pub mod error;
pub mod normalizer;
pub mod selftest;
pub mod value;

pub use dedupe::{deduplicate, deduplicate_json, deduplicate_owned, unique_indices};
pub use error::{Error, Result};
pub use normalizer::{
    compute_fingerprint, fingerprint, is_equivalent, normalize, normalize_str,
    serialize_canonical, CanonicalForm,
};
pub use value::{parse_items, parse_value, JsonValue, Map, Number};

/// Version of the json-dedupe-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_core_types_are_send_sync() {
        assert_send_sync::<JsonValue>();
        assert_send_sync::<CanonicalForm>();
        assert_send_sync::<Error>();
    }

    #[test]
    fn test_value_serialization() {
        let value = parse_value(r#"{"id":7,"tags":["a","b"],"meta":{"z":null,"y":-0.5}}"#).unwrap();
        let json = serde_json::to_string(&value).unwrap();
        let deserialized: JsonValue = serde_json::from_str(&json).unwrap();
        assert_eq!(value, deserialized);
        assert_eq!(json, r#"{"id":7,"tags":["a","b"],"meta":{"z":null,"y":-0.5}}"#);
    }

    #[test]
    fn test_concurrent_calls_agree() {
        let input = r#"[{"a":[{"x":1},{"y":2}]},{"a":[{"y":2},{"x":1}]},{"b":[1,2]},{"b":[2,1]}]"#;
        let expected = deduplicate_json(input).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(move || deduplicate_json(input).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_determinism_100_iterations() {
        let input = r#"[{"k":[{"b":2},{"a":1}]},{"k":[{"a":1},{"b":2}]},{"k":["x","y"]},{"k":["y","x"]}]"#;
        let first = deduplicate_json(input).unwrap();
        for i in 0..100 {
            let result = deduplicate_json(input).unwrap();
            assert_eq!(first, result, "Non-determinism at iteration {}", i);
        }
    }
}
