//! Provides JSON parsing utilities for asset documents.
//!
//! Documents are read as strict JSON first. Hand-edited asset packs often
//! carry comments or trailing commas, so a failed strict parse is retried
//! with the JSON5 parser before giving up.
//!
//! # Examples
//! ```
//! use serde_json::json;
//!
//! use legends_import::formats::shared::json_str_or_none;
//!
//! assert_eq!(json_str_or_none(&json!("hello")), Some("hello"));
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::formats::{ImportError, ImportResult};

/// Extracts a string from a JSON value, returning None if empty.
///
/// # Examples
/// ```
/// use serde_json::json;
///
/// use legends_import::formats::shared::json_str_or_none;
///
/// assert_eq!(json_str_or_none(&json!("value")), Some("value"));
/// assert_eq!(json_str_or_none(&json!("")), None);
/// ```
pub fn json_str_or_none(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Parses document bytes into `T`, accepting JSON5 as a fallback.
///
/// `what` names the document in error messages.
///
/// # Errors
/// Returns [`ImportError::Format`] for invalid UTF-8 or unparseable content.
///
/// # Examples
/// ```
/// use serde_json::Value;
///
/// use legends_import::formats::shared::parse_document;
///
/// let value: Value = parse_document(b"{ // comment\n \"a\": 1 }", "test").unwrap();
/// assert_eq!(value["a"].as_f64(), Some(1.0));
/// ```
pub fn parse_document<T: DeserializeOwned>(data: &[u8], what: &str) -> ImportResult<T> {
    let text = std::str::from_utf8(data)
        .map_err(|_| ImportError::format(format!("Invalid UTF-8 in {what}")))?;

    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(strict) => json5::from_str(text).map_err(|_| {
            ImportError::format(format!("Failed to parse {what}: {strict}"))
        }),
    }
}

/// Splits a namespaced key `"<prefix>:<suffix>"` into its two parts.
///
/// A key without `:` yields an empty suffix.
///
/// # Examples
/// ```
/// use legends_import::formats::shared::split_namespaced;
///
/// assert_eq!(split_namespaced("pig:base_entity_face"), ("pig", "base_entity_face"));
/// assert_eq!(split_namespaced("pig"), ("pig", ""));
/// ```
pub fn split_namespaced(key: &str) -> (&str, &str) {
    match key.split_once(':') {
        Some((prefix, suffix)) => (prefix, suffix),
        None => (key, ""),
    }
}

/// Finds the top-level entry whose key ends in `:<suffix>`, e.g. the
/// `minecraft:geometry` entry for suffix `geometry`.
///
/// # Examples
/// ```
/// use serde_json::json;
///
/// use legends_import::formats::shared::find_namespaced;
///
/// let doc = json!({"format_version": "1.8.0", "minecraft:geometry": []});
/// let (key, _) = find_namespaced(doc.as_object().unwrap(), "geometry").unwrap();
/// assert_eq!(key, "minecraft:geometry");
/// ```
pub fn find_namespaced<'a>(
    object: &'a Map<String, Value>,
    suffix: &str,
) -> Option<(&'a str, &'a Value)> {
    object
        .iter()
        .find(|(key, _)| split_namespaced(key).1 == suffix)
        .map(|(key, value)| (key.as_str(), value))
}

/// Finds the top-level entry whose key starts with `<prefix>:`, e.g. the
/// `pig_body:base_entity` entry of a meta-material document.
///
/// # Examples
/// ```
/// use serde_json::json;
///
/// use legends_import::formats::shared::find_by_prefix;
///
/// let doc = json!({"pig_body:base_entity": {}});
/// let (key, _) = find_by_prefix(doc.as_object().unwrap(), "pig_body").unwrap();
/// assert_eq!(key, "pig_body:base_entity");
/// ```
pub fn find_by_prefix<'a>(
    object: &'a Map<String, Value>,
    prefix: &str,
) -> Option<(&'a str, &'a Value)> {
    object
        .iter()
        .find(|(key, _)| split_namespaced(key).0 == prefix)
        .map(|(key, value)| (key.as_str(), value))
}
