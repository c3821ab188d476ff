//! Encoders: total functions from a typed value back to output.
//!
//! An [`Encoder`] never fails. The shape combinators here mirror the decoder
//! ones over `serde_json::Value`, so that a struct decoded by
//! [`decoder::struct_`](crate::decoder::struct_) can be written back with
//! [`struct_`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::decoder::{merge, NULL};
use crate::registry::Registry;

/// Type alias for the function stored in an [`Encoder`].
pub(crate) type EncodeFn<O, A> = Arc<dyn Fn(&A) -> O + Send + Sync>;

/// A reusable, total conversion from `A` to `O`.
///
/// # Example
///
/// ```rust
/// use schemable::{encoder, Encoder};
/// use serde_json::{json, Value};
///
/// let celsius: Encoder<Value, f64> = encoder::to_value();
/// let kelvin = celsius.contramap(|k: &f64| k - 273.15);
///
/// assert_eq!(kelvin.encode(&273.15), json!(0.0));
/// ```
pub struct Encoder<O, A> {
    run: EncodeFn<O, A>,
}

impl<O, A> Clone for Encoder<O, A> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<O, A> fmt::Debug for Encoder<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder").finish_non_exhaustive()
    }
}

impl<O: 'static, A: 'static> Encoder<O, A> {
    /// Creates an encoder from a conversion function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&A) -> O + Send + Sync + 'static,
    {
        Self { run: Arc::new(f) }
    }

    /// Runs the encoder.
    pub fn encode(&self, value: &A) -> O {
        (self.run)(value)
    }

    /// Adapts the encoder to a new source type.
    pub fn contramap<B: 'static>(
        self,
        f: impl Fn(&B) -> A + Send + Sync + 'static,
    ) -> Encoder<O, B> {
        Encoder::new(move |b: &B| self.encode(&f(b)))
    }

    /// Encodes with `self`, then encodes the result with `next`.
    pub fn compose<P: 'static>(self, next: Encoder<P, O>) -> Encoder<P, A> {
        Encoder::new(move |a: &A| next.encode(&self.encode(a)))
    }
}

/// Returns its input unchanged.
pub fn id<A: Clone + 'static>() -> Encoder<A, A> {
    Encoder::new(|a: &A| a.clone())
}

/// Converts any value with a JSON representation.
pub fn to_value<A: Clone + Into<Value> + 'static>() -> Encoder<Value, A> {
    Encoder::new(|a: &A| a.clone().into())
}

/// Encodes `None` as `null` and `Some` with `or`.
pub fn nullable<A: 'static>(or: Encoder<Value, A>) -> Encoder<Value, Option<A>> {
    Encoder::new(move |value: &Option<A>| match value {
        Some(a) => or.encode(a),
        None => Value::Null,
    })
}

fn collect_props<K: Into<String>>(
    props: impl IntoIterator<Item = (K, Encoder<Value, Value>)>,
) -> Vec<(String, Encoder<Value, Value>)> {
    props.into_iter().map(|(k, e)| (k.into(), e)).collect()
}

/// Encodes every declared property, in declaration order.
///
/// A declared property missing from the value is encoded from `null`.
/// Undeclared properties are dropped.
pub fn struct_<K: Into<String>>(
    props: impl IntoIterator<Item = (K, Encoder<Value, Value>)>,
) -> Encoder<Value, Map<String, Value>> {
    let props = collect_props(props);
    Encoder::new(move |fields: &Map<String, Value>| {
        let encoded: Map<String, Value> = props
            .iter()
            .map(|(k, e)| (k.clone(), e.encode(fields.get(k).unwrap_or(&NULL))))
            .collect();
        Value::Object(encoded)
    })
}

/// Encodes the declared properties that are present.
///
/// A property holding `null` stays `null`.
pub fn partial<K: Into<String>>(
    props: impl IntoIterator<Item = (K, Encoder<Value, Value>)>,
) -> Encoder<Value, Map<String, Value>> {
    let props = collect_props(props);
    Encoder::new(move |fields: &Map<String, Value>| {
        let encoded: Map<String, Value> = props
            .iter()
            .filter_map(|(k, e)| {
                fields.get(k).map(|raw| {
                    let value = if raw.is_null() { Value::Null } else { e.encode(raw) };
                    (k.clone(), value)
                })
            })
            .collect();
        Value::Object(encoded)
    })
}

/// Encodes every entry with `codomain`, keeping key order.
pub fn record<A: 'static>(codomain: Encoder<Value, A>) -> Encoder<Value, IndexMap<String, A>> {
    Encoder::new(move |entries: &IndexMap<String, A>| {
        Value::Object(
            entries
                .iter()
                .map(|(k, a)| (k.clone(), codomain.encode(a)))
                .collect(),
        )
    })
}

/// Encodes every element with `item`.
pub fn array<A: 'static>(item: Encoder<Value, A>) -> Encoder<Value, Vec<A>> {
    Encoder::new(move |items: &Vec<A>| Value::Array(items.iter().map(|a| item.encode(a)).collect()))
}

/// Encodes each position with its component.
///
/// Positions beyond the last component are dropped.
pub fn tuple<A: 'static>(components: Vec<Encoder<Value, A>>) -> Encoder<Value, Vec<A>> {
    Encoder::new(move |items: &Vec<A>| {
        Value::Array(
            items
                .iter()
                .zip(&components)
                .map(|(a, e)| e.encode(a))
                .collect(),
        )
    })
}

/// Encodes with both encoders and shallow-merges the results, right over left.
pub fn intersect(
    left: Encoder<Value, Value>,
    right: Encoder<Value, Value>,
) -> Encoder<Value, Value> {
    Encoder::new(move |value: &Value| merge(left.encode(value), right.encode(value)))
}

/// Encodes with the member named by the value's `tag` property.
///
/// A value whose tag names no member is passed through unchanged.
///
/// # Example
///
/// ```rust
/// use schemable::encoder;
/// use serde_json::{json, Value};
///
/// let shape = encoder::sum("type", vec![(
///     "circle",
///     encoder::to_value::<Value>().contramap(|v: &Value| {
///         json!({"type": "circle", "r": v["radius"]})
///     }),
/// )]);
///
/// assert_eq!(
///     shape.encode(&json!({"type": "circle", "radius": 2})),
///     json!({"type": "circle", "r": 2})
/// );
/// assert_eq!(shape.encode(&json!({"type": "square"})), json!({"type": "square"}));
/// ```
pub fn sum<K: Into<String>>(
    tag: impl Into<String>,
    members: impl IntoIterator<Item = (K, Encoder<Value, Value>)>,
) -> Encoder<Value, Value> {
    let tag = tag.into();
    let members: IndexMap<String, Encoder<Value, Value>> =
        members.into_iter().map(|(k, e)| (k.into(), e)).collect();
    Encoder::new(move |value: &Value| {
        match value.get(&tag).and_then(Value::as_str).and_then(|t| members.get(t)) {
            Some(member) => member.encode(value),
            None => value.clone(),
        }
    })
}

/// A recursive encoder resolved through `registry`.
pub fn lazy<O: 'static, A: 'static>(
    registry: &Registry<Encoder<O, A>>,
    id: impl Into<String>,
    thunk: impl Fn() -> Encoder<O, A> + Send + Sync + 'static,
) -> Encoder<O, A> {
    let definition = registry.define(id, thunk);
    Encoder::new(move |a: &A| definition.force().encode(a))
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Encoder<Value, Value>>();
    assert_sync::<Encoder<Value, Value>>();
};
