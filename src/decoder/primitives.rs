//! Primitive decoders.
//!
//! Each primitive is a single shape test. A mismatch is reported as one leaf
//! carrying the offending input.

use regex::Regex;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::guard::Guard;
use crate::validation::{failure, Decoded};

use super::Decoder;

/// Expected-shape message for arrays of anything.
pub(crate) const UNKNOWN_ARRAY: &str = "Array<unknown>";

/// Expected-shape message for objects of anything.
pub(crate) const UNKNOWN_RECORD: &str = "Record<string, unknown>";

/// Stand-in for a missing property or tuple slot.
pub(crate) static NULL: Value = Value::Null;

/// Accepts any JSON value unchanged.
pub fn unknown() -> Decoder<Value, Value> {
    Decoder::new(|input: &Value| Validation::Success(input.clone()))
}

/// Returns its input unchanged.
pub fn id<A: Clone + 'static>() -> Decoder<A, A> {
    Decoder::new(|input: &A| Validation::Success(input.clone()))
}

/// Decodes a JSON string.
pub fn string() -> Decoder<Value, String> {
    Decoder::new(|input: &Value| match input {
        Value::String(s) => Validation::Success(s.clone()),
        other => failure(other.clone(), "string"),
    })
}

/// Decodes a JSON number as `f64`.
pub fn number() -> Decoder<Value, f64> {
    Decoder::new(|input: &Value| match input.as_f64() {
        Some(n) => Validation::Success(n),
        None => failure(input.clone(), "number"),
    })
}

/// Decodes a JSON boolean.
pub fn boolean() -> Decoder<Value, bool> {
    Decoder::new(|input: &Value| match input {
        Value::Bool(b) => Validation::Success(*b),
        other => failure(other.clone(), "boolean"),
    })
}

/// Decodes any JSON array without looking at its elements.
pub fn unknown_array() -> Decoder<Value, Vec<Value>> {
    Decoder::new(|input: &Value| match input {
        Value::Array(items) => Validation::Success(items.clone()),
        other => failure(other.clone(), UNKNOWN_ARRAY),
    })
}

/// Decodes any JSON object without looking at its values.
pub fn unknown_record() -> Decoder<Value, Map<String, Value>> {
    Decoder::new(|input: &Value| match input {
        Value::Object(fields) => Validation::Success(fields.clone()),
        other => failure(other.clone(), UNKNOWN_RECORD),
    })
}

/// Accepts exactly one of the given values.
///
/// The failure message lists the accepted values as JSON, separated by ` | `,
/// or `never` when the list is empty.
///
/// # Example
///
/// ```rust
/// use schemable::{decoder, draw::draw};
/// use serde_json::json;
///
/// let method = decoder::literal(["GET", "POST"]);
///
/// assert!(method.decode(&json!("GET")).is_success());
///
/// let errors = method.decode(&json!("PUT")).into_result().unwrap_err();
/// assert_eq!(draw(&errors), "cannot decode \"PUT\", should be \"GET\" | \"POST\"");
/// ```
pub fn literal<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Decoder<Value, Value> {
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    let expected = literal_message(&values);
    Decoder::new(move |input: &Value| {
        if values.contains(input) {
            Validation::Success(input.clone())
        } else {
            failure(input.clone(), expected.as_str())
        }
    })
}

pub(crate) fn literal_message(values: &[Value]) -> String {
    if values.is_empty() {
        "never".to_string()
    } else {
        values
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Builds a decoder from a guard; accepted input is returned unchanged.
pub fn from_guard(guard: Guard<Value>, expected: impl Into<String>) -> Decoder<Value, Value> {
    let expected = expected.into();
    Decoder::new(move |input: &Value| -> Decoded<Value> {
        if guard.is(input) {
            Validation::Success(input.clone())
        } else {
            failure(input.clone(), expected.as_str())
        }
    })
}

/// Decodes a string that matches `regex`.
///
/// # Example
///
/// ```rust
/// use regex::Regex;
/// use schemable::decoder;
/// use serde_json::json;
///
/// let slug = decoder::pattern(Regex::new(r"^[a-z0-9-]+$").unwrap());
///
/// assert!(slug.decode(&json!("hello-world")).is_success());
/// assert!(slug.decode(&json!("Hello World")).is_failure());
/// ```
pub fn pattern(regex: Regex) -> Decoder<Value, String> {
    let id = format!("string matching /{}/", regex.as_str());
    string().refine(move |s| regex.is_match(s), id)
}
