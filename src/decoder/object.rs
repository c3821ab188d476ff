//! Object decoders.
//!
//! [`struct_`] and [`partial`] decode a fixed set of declared properties;
//! [`record`] decodes every property against one codomain decoder. All three
//! check the object shape first and then accumulate every property failure
//! as a [`DecodeError::Key`].

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{DecodeError, Requiredness};
use crate::free_semigroup::FreeSemigroup;
use crate::validation::{failure, map_errors, traverse_keyed, Decoded};

use super::{Decoder, NULL, UNKNOWN_RECORD};

pub(crate) type Props<D> = Vec<(String, D)>;

pub(crate) fn collect_props<K: Into<String>, D>(
    props: impl IntoIterator<Item = (K, D)>,
) -> Props<D> {
    props.into_iter().map(|(k, d)| (k.into(), d)).collect()
}

fn keyed<A>(key: &str, kind: Requiredness, result: Decoded<A>) -> Decoded<A> {
    map_errors(result, |e| FreeSemigroup::of(DecodeError::key(key, kind, e)))
}

/// Decodes an object with required properties.
///
/// Every declared property is decoded against its raw value; a missing
/// property is presented to its decoder as `null`. All failures are reported,
/// each as a `required` [`DecodeError::Key`], in declaration order. The output
/// contains the declared properties only, in declaration order.
///
/// # Example
///
/// ```rust
/// use schemable::decoder;
/// use serde_json::json;
///
/// let point = decoder::struct_(vec![
///     ("x", decoder::number().into_value()),
///     ("y", decoder::number().into_value()),
/// ]);
///
/// let decoded = point.decode(&json!({"y": 2, "x": 1, "z": 3})).into_result().unwrap();
/// assert_eq!(serde_json::Value::Object(decoded), json!({"x": 1.0, "y": 2.0}));
/// ```
pub fn struct_<K: Into<String>>(
    props: impl IntoIterator<Item = (K, Decoder<Value, Value>)>,
) -> Decoder<Value, Map<String, Value>> {
    let props = collect_props(props);
    Decoder::new(move |input: &Value| {
        let fields = match input.as_object() {
            Some(fields) => fields,
            None => return failure(input.clone(), UNKNOWN_RECORD),
        };

        traverse_keyed(props.iter().map(|(k, d)| (k.as_str(), d)), |key, decoder| {
            let raw = fields.get(key).unwrap_or(&NULL);
            keyed(key, Requiredness::Required, decoder.decode(raw))
        })
        .map(|decoded| decoded.into_iter().collect())
    })
}

/// Decodes an object whose properties may all be absent.
///
/// - An absent property contributes nothing to the output.
/// - A property present as `null` is kept as `null` without running its decoder.
///   JSON has no `undefined`, so `null` is how an input says "not given";
///   `partial(vec![("a", number())])` accepts `{"a": null}`. Wrapping the
///   property in [`nullable`](super::nullable) changes nothing here.
/// - Any other present property is decoded; failures are `optional`
///   [`DecodeError::Key`] nodes.
///
/// # Example
///
/// ```rust
/// use schemable::decoder;
/// use serde_json::{json, Value};
///
/// let patch = decoder::partial(vec![("name", decoder::string().into_value())]);
///
/// let empty = patch.decode(&json!({})).into_result().unwrap();
/// assert_eq!(Value::Object(empty), json!({}));
///
/// let cleared = patch.decode(&json!({"name": null})).into_result().unwrap();
/// assert_eq!(Value::Object(cleared), json!({"name": null}));
///
/// assert!(patch.decode(&json!({"name": 1})).is_failure());
/// ```
pub fn partial<K: Into<String>>(
    props: impl IntoIterator<Item = (K, Decoder<Value, Value>)>,
) -> Decoder<Value, Map<String, Value>> {
    let props = collect_props(props);
    Decoder::new(move |input: &Value| {
        let fields = match input.as_object() {
            Some(fields) => fields,
            None => return failure(input.clone(), UNKNOWN_RECORD),
        };

        let present = props
            .iter()
            .filter_map(|(k, d)| fields.get(k).map(|raw| (k.as_str(), (d, raw))));

        traverse_keyed(present, |key, (decoder, raw)| {
            if raw.is_null() {
                Validation::Success(Value::Null)
            } else {
                keyed(key, Requiredness::Optional, decoder.decode(raw))
            }
        })
        .map(|decoded| decoded.into_iter().collect())
    })
}

/// Decodes an object whose every value matches `codomain`.
///
/// Keys keep their input order in the output and in the failure tree.
pub fn record<A: 'static>(codomain: Decoder<Value, A>) -> Decoder<Value, IndexMap<String, A>> {
    Decoder::new(move |input: &Value| {
        let fields = match input.as_object() {
            Some(fields) => fields,
            None => return failure(input.clone(), UNKNOWN_RECORD),
        };

        traverse_keyed(fields.iter(), |key, raw| {
            keyed(key, Requiredness::Required, codomain.decode(raw))
        })
    })
}
