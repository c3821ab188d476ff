//! Array and tuple decoders.

use serde_json::Value;

use crate::error::{DecodeError, Requiredness};
use crate::free_semigroup::FreeSemigroup;
use crate::validation::{both, failure, map_errors, traverse_indexed, Decoded};

use super::{Decoder, NULL, UNKNOWN_ARRAY};

fn indexed<A>(index: usize, kind: Requiredness, result: Decoded<A>) -> Decoded<A> {
    map_errors(result, |e| FreeSemigroup::of(DecodeError::index(index, kind, e)))
}

/// Decodes an array whose every element matches `item`.
///
/// Elements are visited iteratively; each failure is reported as an
/// `optional` [`DecodeError::Index`] at its position.
///
/// # Example
///
/// ```rust
/// use schemable::decoder;
/// use serde_json::json;
///
/// let numbers = decoder::array(decoder::number());
///
/// assert_eq!(numbers.decode(&json!([1, 2, 3])).into_result().unwrap(), vec![1.0, 2.0, 3.0]);
///
/// let errors = numbers.decode(&json!([1, "x", 3, "y"])).into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
pub fn array<A: 'static>(item: Decoder<Value, A>) -> Decoder<Value, Vec<A>> {
    Decoder::new(move |input: &Value| {
        let items = match input.as_array() {
            Some(items) => items,
            None => return failure(input.clone(), UNKNOWN_ARRAY),
        };

        traverse_indexed(items, |i, raw| {
            indexed(i, Requiredness::Optional, item.decode(raw))
        })
    })
}

/// Decodes a fixed-length array position by position.
///
/// Component failures are `required` [`DecodeError::Index`] nodes. A missing
/// trailing position is presented to its decoder as `null`. Elements beyond
/// the last component are rejected, each reported as an `optional` index that
/// should be `never`.
///
/// # Example
///
/// ```rust
/// use schemable::decoder;
/// use serde_json::json;
///
/// let pair = decoder::tuple(vec![
///     decoder::string().into_value(),
///     decoder::number().into_value(),
/// ]);
///
/// assert_eq!(pair.decode(&json!(["a", 1])).into_result().unwrap(), vec![json!("a"), json!(1.0)]);
/// assert!(pair.decode(&json!(["a"])).is_failure());
/// assert!(pair.decode(&json!(["a", 1, true])).is_failure());
/// ```
pub fn tuple<A: 'static>(components: Vec<Decoder<Value, A>>) -> Decoder<Value, Vec<A>> {
    Decoder::new(move |input: &Value| {
        let items = match input.as_array() {
            Some(items) => items,
            None => return failure(input.clone(), UNKNOWN_ARRAY),
        };

        let slots = traverse_indexed(&components, |i, component| {
            let raw = items.get(i).unwrap_or(&NULL);
            indexed(i, Requiredness::Required, component.decode(raw))
        });

        let arity = components.len();
        let extra = traverse_indexed(items.iter().skip(arity), |offset, raw| -> Decoded<()> {
            indexed(
                arity + offset,
                Requiredness::Optional,
                failure(raw.clone(), "never"),
            )
        });

        both(slots, extra).map(|(values, _)| values)
    })
}
