//! Python bindings for json-dedupe
//!
//! Thin wrapper around `json-dedupe-core` — ZERO equivalence logic here.
//! The only work done on this side is translating Python objects into
//! `JsonValue`s, rejecting anything that is not JSON-shaped.

use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};

use json_dedupe_core::{Error, JsonValue, Map, Number};

fn to_py_err(e: Error) -> PyErr {
    match e {
        Error::UnsupportedType { .. } => PyTypeError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

/// Convert a Python object to a `JsonValue`.
///
/// Accepts None, bool, int (64-bit range), float, str, list, tuple, and
/// dict with str keys. Everything else is `UnsupportedType`.
fn to_value(obj: &Bound<'_, PyAny>) -> Result<JsonValue, Error> {
    if obj.is_none() {
        return Ok(JsonValue::Null);
    }
    // bool is a subclass of int, so it must be checked first
    if let Ok(b) = obj.downcast::<PyBool>() {
        return Ok(JsonValue::Bool(b.is_true()));
    }
    if obj.is_instance_of::<PyInt>() {
        if let Ok(i) = obj.extract::<i64>() {
            return Ok(JsonValue::Number(Number::from(i)));
        }
        if let Ok(u) = obj.extract::<u64>() {
            return Ok(JsonValue::Number(Number::from(u)));
        }
        return Err(Error::unsupported("int outside the 64-bit range"));
    }
    if let Ok(f) = obj.downcast::<PyFloat>() {
        return Ok(JsonValue::Number(Number::from_f64(f.value())));
    }
    if let Ok(s) = obj.downcast::<PyString>() {
        let text = s
            .to_str()
            .map_err(|_| Error::unsupported("str that is not valid UTF-8"))?;
        return Ok(JsonValue::String(text.to_owned()));
    }
    if let Ok(list) = obj.downcast::<PyList>() {
        return list
            .iter()
            .enumerate()
            .map(|(i, item)| to_value(&item).map_err(|e| e.within(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Sequence);
    }
    if let Ok(tuple) = obj.downcast::<PyTuple>() {
        return tuple
            .iter()
            .enumerate()
            .map(|(i, item)| to_value(&item).map_err(|e| e.within(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Sequence);
    }
    if let Ok(dict) = obj.downcast::<PyDict>() {
        let mut map = Map::with_capacity(dict.len());
        for (key, value) in dict.iter() {
            let key = match key.downcast::<PyString>() {
                Ok(k) => k
                    .to_str()
                    .map_err(|_| Error::unsupported("dict key that is not valid UTF-8"))?
                    .to_owned(),
                Err(_) => return Err(Error::unsupported(format!("dict key of type {}", type_name(&key)))),
            };
            let value = to_value(&value).map_err(|e| e.within(&key))?;
            map.insert(key, value);
        }
        return Ok(JsonValue::Mapping(map));
    }
    Err(Error::unsupported(type_name(obj)))
}

fn type_name(obj: &Bound<'_, PyAny>) -> String {
    obj.get_type()
        .name()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string())
}

/// Deduplicate a list of JSON-like objects.
///
/// Mapping key order is ignored, lists of primitives are order-sensitive,
/// and lists containing dicts or lists are compared as multisets.
///
/// Args:
///     items: list of JSON-like objects (dict, list, str, int, float, bool, None)
///
/// Returns:
///     A new list holding the first occurrence of each distinct item.
///     The elements are the caller's own objects, not copies.
///
/// Raises:
///     TypeError: If an item contains a value that is not JSON-shaped
#[pyfunction]
fn solve<'py>(items: &Bound<'py, PyList>) -> PyResult<Bound<'py, PyList>> {
    let originals: Vec<Bound<'py, PyAny>> = items.iter().collect();
    let values = originals
        .iter()
        .enumerate()
        .map(|(i, obj)| to_value(obj).map_err(|e| e.within(i)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_py_err)?;

    let kept = json_dedupe_core::unique_indices(&values).map_err(to_py_err)?;
    PyList::new(items.py(), kept.into_iter().map(|i| originals[i].clone()))
}

/// Deduplicate a JSON array given as text.
///
/// Returns:
///     Compact JSON text of the deduplicated array, original key order kept
///
/// Raises:
///     ValueError: If the text is not a JSON array
#[pyfunction]
fn deduplicate_json(text: &str) -> PyResult<String> {
    json_dedupe_core::deduplicate_json(text).map_err(to_py_err)
}

/// Canonical text of a JSON-like object.
///
/// Equivalent objects produce identical text.
///
/// Raises:
///     TypeError: If the object is not JSON-shaped
#[pyfunction]
fn normalize(obj: &Bound<'_, PyAny>) -> PyResult<String> {
    let value = to_value(obj).map_err(to_py_err)?;
    let canonical = json_dedupe_core::normalize(&value).map_err(to_py_err)?;
    Ok(json_dedupe_core::serialize_canonical(&canonical))
}

/// SHA-256 fingerprint (hex) of an object's canonical form.
///
/// Raises:
///     TypeError: If the object is not JSON-shaped
#[pyfunction]
fn fingerprint(obj: &Bound<'_, PyAny>) -> PyResult<String> {
    let value = to_value(obj).map_err(to_py_err)?;
    json_dedupe_core::fingerprint(&value).map_err(to_py_err)
}

/// Whether two objects are duplicates of each other.
///
/// Raises:
///     TypeError: If either object is not JSON-shaped
#[pyfunction]
fn is_equivalent(a: &Bound<'_, PyAny>, b: &Bound<'_, PyAny>) -> PyResult<bool> {
    let a = to_value(a).map_err(to_py_err)?;
    let b = to_value(b).map_err(to_py_err)?;
    json_dedupe_core::is_equivalent(&a, &b).map_err(to_py_err)
}

/// json_dedupe Python module — structural deduplication of JSON values
#[pymodule]
fn json_dedupe(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(solve, m)?)?;
    m.add_function(wrap_pyfunction!(deduplicate_json, m)?)?;
    m.add_function(wrap_pyfunction!(normalize, m)?)?;
    m.add_function(wrap_pyfunction!(fingerprint, m)?)?;
    m.add_function(wrap_pyfunction!(is_equivalent, m)?)?;
    Ok(())
}
