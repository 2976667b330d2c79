//! Deduplicator — keeps the first occurrence of each canonical form
//!
//! Items are compared by their canonical form and returned untouched, in
//! input order. The input is never mutated.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::normalizer::normalize;
use crate::value::{parse_items, JsonValue};
use crate::{Error, Result};

/// Indices of the first occurrence of each distinct item, ascending
///
/// # Errors
/// Propagates `UnsupportedType` from the normalizer with the item index
/// prefixed to its path. No partial result is returned.
pub fn unique_indices(items: &[JsonValue]) -> Result<Vec<usize>> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut kept = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let canonical = normalize(item).map_err(|e| e.within(index))?;
        if seen.insert(canonical) {
            kept.push(index);
        } else {
            trace!(index, "dropping duplicate item");
        }
    }

    debug!(
        total = items.len(),
        kept = kept.len(),
        removed = items.len() - kept.len(),
        "deduplicated items"
    );
    Ok(kept)
}

/// Remove structural duplicates, keeping first occurrences in input order
///
/// Returned items are clones of the originals: key order and sequence order
/// are exactly as supplied.
///
/// # Example
/// ```
/// use json_dedupe_core::{deduplicate, parse_items};
///
/// let items = parse_items(r#"[{"a":1,"b":2},{"b":2,"a":1},[1,2],[2,1]]"#).unwrap();
/// let kept = deduplicate(&items).unwrap();
/// assert_eq!(kept.len(), 3);
/// ```
pub fn deduplicate(items: &[JsonValue]) -> Result<Vec<JsonValue>> {
    Ok(unique_indices(items)?
        .into_iter()
        .map(|i| items[i].clone())
        .collect())
}

/// Owned variant of [`deduplicate`] that moves survivors instead of cloning
pub fn deduplicate_owned(items: Vec<JsonValue>) -> Result<Vec<JsonValue>> {
    let mut keep = unique_indices(&items)?.into_iter().peekable();
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            if keep.peek() == Some(&i) {
                keep.next();
                Some(item)
            } else {
                None
            }
        })
        .collect())
}

/// Parse a JSON array, deduplicate it, and render compact JSON
///
/// # Errors
/// `ParseError` if `text` is not a JSON array, otherwise as [`deduplicate`].
pub fn deduplicate_json(text: &str) -> Result<String> {
    let kept = deduplicate_owned(parse_items(text)?)?;
    serde_json::to_string(&kept).map_err(|e| Error::SerializationError(e.to_string()))
}
