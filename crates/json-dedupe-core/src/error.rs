//! Error types for json-dedupe
//!
//! All fallible operations return `Result<T, Error>`.
//! Normalization has a single failure mode, `UnsupportedType`; the text
//! entry points add parse and serialization failures on top of it.

use std::fmt;

/// json-dedupe error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A value outside the JSON domain was reached during normalization.
    ///
    /// `path` is a JSON Pointer (RFC 6901) to the offending value.
    #[error("Unsupported type: {found} at {}", display_pointer(.path))]
    UnsupportedType { found: String, path: String },

    /// Input text is not JSON, or not the expected document shape
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Output could not be rendered as JSON text
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// `UnsupportedType` located at the root of the value being normalized
    pub fn unsupported(found: impl Into<String>) -> Self {
        Error::UnsupportedType {
            found: found.into(),
            path: String::new(),
        }
    }

    /// Prefix the location of an `UnsupportedType` with one parent segment.
    ///
    /// Errors are built at the leaf and gain a segment per level while the
    /// recursion unwinds. Other variants pass through untouched.
    pub fn within(self, segment: impl fmt::Display) -> Self {
        match self {
            Error::UnsupportedType { found, path } => Error::UnsupportedType {
                found,
                path: format!("/{}{}", escape_segment(&segment.to_string()), path),
            },
            other => other,
        }
    }
}

fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn display_pointer(path: &str) -> &str {
    if path.is_empty() {
        "document root"
    } else {
        path
    }
}

/// Result type alias for json-dedupe operations
pub type Result<T> = std::result::Result<T, Error>;
