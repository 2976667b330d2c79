//! C-FFI layer for json-dedupe — used by Go (cgo) and other FFI consumers.
//!
//! ZERO logic here. All calls delegate to `json-dedupe-core`.
//!
//! # Memory Contract
//!
//! All functions that return `*mut c_char` allocate via `CString`.
//! The caller MUST free the returned string by calling `jd_free_string()`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use json_dedupe_core::{
    deduplicate_json, fingerprint, is_equivalent, normalize_str, parse_value, Result,
};

/// Result from a json-dedupe FFI call.
/// If `error` is null, the call succeeded and `result` contains the output.
/// If `error` is non-null, the call failed and `error` contains the error message.
/// The caller MUST free both `result` and `error` with `jd_free_string()`.
#[repr(C)]
pub struct JdResult {
    pub result: *mut c_char,
    pub error: *mut c_char,
}

impl JdResult {
    fn ok(value: String) -> Self {
        JdResult {
            result: into_c_string(value),
            error: std::ptr::null_mut(),
        }
    }

    fn err(msg: String) -> Self {
        JdResult {
            result: std::ptr::null_mut(),
            error: into_c_string(msg),
        }
    }

    fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(value) => JdResult::ok(value),
            Err(e) => JdResult::err(e.to_string()),
        }
    }
}

/// Interior NULs cannot cross the C boundary; drop them.
fn into_c_string(s: String) -> *mut c_char {
    let bytes: Vec<u8> = s.into_bytes().into_iter().filter(|&b| b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Helper: convert a C string pointer to a Rust &str.
/// Returns None if the pointer is null or not valid UTF-8.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Deduplicate a JSON array. Returns compact JSON of the surviving items.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `jd_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn jd_deduplicate(text: *const c_char) -> JdResult {
    match cstr_to_str(text) {
        Some(text) => JdResult::from_result(deduplicate_json(text)),
        None => JdResult::err("null or invalid UTF-8 input".into()),
    }
}

/// Canonical text of one JSON document.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `jd_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn jd_normalize(text: *const c_char) -> JdResult {
    match cstr_to_str(text) {
        Some(text) => JdResult::from_result(normalize_str(text)),
        None => JdResult::err("null or invalid UTF-8 input".into()),
    }
}

/// SHA-256 fingerprint (hex) of one JSON document's canonical form.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `jd_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn jd_fingerprint(text: *const c_char) -> JdResult {
    match cstr_to_str(text) {
        Some(text) => JdResult::from_result(parse_value(text).and_then(|v| fingerprint(&v))),
        None => JdResult::err("null or invalid UTF-8 input".into()),
    }
}

/// Whether two JSON documents are duplicates. Result is `"true"` or `"false"`.
///
/// # Safety
/// `a` and `b` must be valid null-terminated UTF-8 C strings.
/// The caller must free the returned strings with `jd_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn jd_equivalent(a: *const c_char, b: *const c_char) -> JdResult {
    let a = match cstr_to_str(a) {
        Some(s) => s,
        None => return JdResult::err("null or invalid UTF-8 first document".into()),
    };
    let b = match cstr_to_str(b) {
        Some(s) => s,
        None => return JdResult::err("null or invalid UTF-8 second document".into()),
    };

    let result = parse_value(a).and_then(|a| {
        let b = parse_value(b)?;
        is_equivalent(&a, &b)
    });
    JdResult::from_result(result.map(|eq| eq.to_string()))
}

/// Free a string previously returned by a json-dedupe FFI function.
///
/// # Safety
/// `ptr` must be a pointer previously returned by a json-dedupe FFI function,
/// or null (in which case this is a no-op).
#[no_mangle]
pub unsafe extern "C" fn jd_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take(result: JdResult) -> std::result::Result<String, String> {
        let out = if result.error.is_null() {
            Ok(CStr::from_ptr(result.result).to_string_lossy().into_owned())
        } else {
            Err(CStr::from_ptr(result.error).to_string_lossy().into_owned())
        };
        jd_free_string(result.result);
        jd_free_string(result.error);
        out
    }

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn test_deduplicate() {
        let input = c(r#"[{"a":1,"b":2},{"b":2,"a":1}]"#);
        let out = unsafe { take(jd_deduplicate(input.as_ptr())) };
        assert_eq!(out, Ok(r#"[{"a":1,"b":2}]"#.to_string()));
    }

    #[test]
    fn test_deduplicate_rejects_non_array() {
        let input = c("42");
        let out = unsafe { take(jd_deduplicate(input.as_ptr())) };
        assert!(out.unwrap_err().contains("expected a JSON array"));
    }

    #[test]
    fn test_null_input() {
        let out = unsafe { take(jd_normalize(std::ptr::null())) };
        assert_eq!(out, Err("null or invalid UTF-8 input".to_string()));
    }

    #[test]
    fn test_normalize_and_fingerprint() {
        let input = c(r#"{"b":[{"y":1},{"x":2}],"a":[2,1]}"#);
        let canonical = unsafe { take(jd_normalize(input.as_ptr())) }.unwrap();
        assert_eq!(canonical, r#"{"a":[2,1],"b":[{"x":2},{"y":1}]}"#);
        let hash = unsafe { take(jd_fingerprint(input.as_ptr())) }.unwrap();
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_equivalent() {
        let a = c(r#"[{"k":1},{"k":2}]"#);
        let b = c(r#"[{"k":2},{"k":1}]"#);
        let d = c("[1,2]");
        let e = c("[2,1]");
        unsafe {
            assert_eq!(take(jd_equivalent(a.as_ptr(), b.as_ptr())), Ok("true".into()));
            assert_eq!(take(jd_equivalent(d.as_ptr(), e.as_ptr())), Ok("false".into()));
        }
    }

    #[test]
    fn test_free_null_is_noop() {
        unsafe { jd_free_string(std::ptr::null_mut()) };
    }
}
