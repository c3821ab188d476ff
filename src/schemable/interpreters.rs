//! The decoder, guard and encoder interpreters.
//!
//! All three work at the JSON level: decoders produce `serde_json::Value`,
//! guards test it, encoders rewrite it. Primitive shapes keep the input value
//! as it was, so an integer stays an integer after decoding.

use serde_json::{Map, Value};

use crate::decoder::{self, Decoder, UNKNOWN_ARRAY, UNKNOWN_RECORD};
use crate::encoder::{self, Encoder};
use crate::guard::{self, Guard};
use crate::registry::Registry;
use crate::validation::{failure, success};

use super::{Compiled, Schemable, WithRefine, WithUnion, WithUnknownContainers};

/// Interprets schemas as [`Decoder`]s.
#[derive(Clone, Debug, Default)]
pub struct DecoderInterpreter {
    registry: Registry<Decoder<Value, Value>>,
    compiled: Compiled<Decoder<Value, Value>>,
}

impl DecoderInterpreter {
    /// Creates an interpreter with an empty registry and cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry holding this interpreter's lazy definitions.
    pub fn registry(&self) -> &Registry<Decoder<Value, Value>> {
        &self.registry
    }
}

impl Schemable for DecoderInterpreter {
    type Repr = Decoder<Value, Value>;

    fn literal<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Self::Repr {
        decoder::literal(values)
    }

    fn string(&self) -> Self::Repr {
        decoder::from_guard(guard::string(), "string")
    }

    fn number(&self) -> Self::Repr {
        decoder::from_guard(guard::number(), "number")
    }

    fn boolean(&self) -> Self::Repr {
        decoder::from_guard(guard::boolean(), "boolean")
    }

    fn nullable(&self, or: Self::Repr) -> Self::Repr {
        decoder::nullable(or).map(|value| value.unwrap_or(Value::Null))
    }

    fn struct_<K: Into<String>>(
        &self,
        props: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr {
        decoder::struct_(props).into_value()
    }

    fn partial<K: Into<String>>(
        &self,
        props: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr {
        decoder::partial(props).into_value()
    }

    fn record(&self, codomain: Self::Repr) -> Self::Repr {
        decoder::record(codomain).map(|entries| Value::Object(entries.into_iter().collect()))
    }

    fn array(&self, item: Self::Repr) -> Self::Repr {
        decoder::array(item).into_value()
    }

    fn tuple(&self, components: Vec<Self::Repr>) -> Self::Repr {
        decoder::tuple(components).into_value()
    }

    fn intersect(&self, left: Self::Repr, right: Self::Repr) -> Self::Repr {
        decoder::intersect(left, right)
    }

    fn sum<K: Into<String>>(
        &self,
        tag: &str,
        members: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr {
        decoder::sum(tag, members)
    }

    fn lazy<F>(&self, id: &str, f: F) -> Self::Repr
    where
        F: Fn(&Self) -> Self::Repr + Send + Sync + 'static,
    {
        let interpreter = self.clone();
        decoder::lazy(&self.registry, id, move || f(&interpreter))
    }

    fn compiled(&self) -> &Compiled<Self::Repr> {
        &self.compiled
    }
}

impl WithUnknownContainers for DecoderInterpreter {
    fn unknown_array(&self) -> Self::Repr {
        decoder::from_guard(guard::unknown_array(), UNKNOWN_ARRAY)
    }

    fn unknown_record(&self) -> Self::Repr {
        decoder::from_guard(guard::unknown_record(), UNKNOWN_RECORD)
    }
}

impl WithUnion for DecoderInterpreter {
    fn union(&self, members: Vec<Self::Repr>) -> Self::Repr {
        decoder::union(members)
    }
}

impl WithRefine for DecoderInterpreter {
    fn refine<P>(&self, from: Self::Repr, predicate: P, id: &str) -> Self::Repr
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let id = id.to_string();
        Decoder::new(move |input: &Value| {
            from.decode(input).and_then(|decoded| {
                if predicate(input) {
                    success(decoded)
                } else {
                    failure(decoded, id.as_str())
                }
            })
        })
    }
}

/// Interprets schemas as [`Guard`]s.
#[derive(Clone, Debug, Default)]
pub struct GuardInterpreter {
    registry: Registry<Guard<Value>>,
    compiled: Compiled<Guard<Value>>,
}

impl GuardInterpreter {
    /// Creates an interpreter with an empty registry and cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry holding this interpreter's lazy definitions.
    pub fn registry(&self) -> &Registry<Guard<Value>> {
        &self.registry
    }
}

impl Schemable for GuardInterpreter {
    type Repr = Guard<Value>;

    fn literal<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Self::Repr {
        guard::literal(values)
    }

    fn string(&self) -> Self::Repr {
        guard::string()
    }

    fn number(&self) -> Self::Repr {
        guard::number()
    }

    fn boolean(&self) -> Self::Repr {
        guard::boolean()
    }

    fn nullable(&self, or: Self::Repr) -> Self::Repr {
        guard::nullable(or)
    }

    fn struct_<K: Into<String>>(
        &self,
        props: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr {
        guard::struct_(props)
    }

    fn partial<K: Into<String>>(
        &self,
        props: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr {
        guard::partial(props)
    }

    fn record(&self, codomain: Self::Repr) -> Self::Repr {
        guard::record(codomain)
    }

    fn array(&self, item: Self::Repr) -> Self::Repr {
        guard::array(item)
    }

    fn tuple(&self, components: Vec<Self::Repr>) -> Self::Repr {
        guard::tuple(components)
    }

    fn intersect(&self, left: Self::Repr, right: Self::Repr) -> Self::Repr {
        guard::intersect(left, right)
    }

    fn sum<K: Into<String>>(
        &self,
        tag: &str,
        members: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr {
        guard::sum(tag, members)
    }

    fn lazy<F>(&self, id: &str, f: F) -> Self::Repr
    where
        F: Fn(&Self) -> Self::Repr + Send + Sync + 'static,
    {
        let interpreter = self.clone();
        guard::lazy(&self.registry, id, move || f(&interpreter))
    }

    fn compiled(&self) -> &Compiled<Self::Repr> {
        &self.compiled
    }
}

impl WithUnknownContainers for GuardInterpreter {
    fn unknown_array(&self) -> Self::Repr {
        guard::unknown_array()
    }

    fn unknown_record(&self) -> Self::Repr {
        guard::unknown_record()
    }
}

impl WithUnion for GuardInterpreter {
    fn union(&self, members: Vec<Self::Repr>) -> Self::Repr {
        guard::union(members)
    }
}

impl WithRefine for GuardInterpreter {
    fn refine<P>(&self, from: Self::Repr, predicate: P, _id: &str) -> Self::Repr
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        from.refine(predicate)
    }
}

/// Interprets schemas as [`Encoder`]s.
///
/// Encoding is total: a value of the wrong shape is not rejected, it is
/// encoded as well as the shape allows (a non-object as an object with every
/// declared property taken from `null`, a non-array as an empty array).
#[derive(Clone, Debug, Default)]
pub struct EncoderInterpreter {
    registry: Registry<Encoder<Value, Value>>,
    compiled: Compiled<Encoder<Value, Value>>,
}

impl EncoderInterpreter {
    /// Creates an interpreter with an empty registry and cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry holding this interpreter's lazy definitions.
    pub fn registry(&self) -> &Registry<Encoder<Value, Value>> {
        &self.registry
    }
}

fn fields(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn items(value: &Value) -> Vec<Value> {
    value.as_array().cloned().unwrap_or_default()
}

impl Schemable for EncoderInterpreter {
    type Repr = Encoder<Value, Value>;

    fn literal<V: Into<Value>>(&self, _values: impl IntoIterator<Item = V>) -> Self::Repr {
        encoder::id()
    }

    fn string(&self) -> Self::Repr {
        encoder::id()
    }

    fn number(&self) -> Self::Repr {
        encoder::id()
    }

    fn boolean(&self) -> Self::Repr {
        encoder::id()
    }

    fn nullable(&self, or: Self::Repr) -> Self::Repr {
        encoder::nullable(or).contramap(|value: &Value| match value {
            Value::Null => None,
            other => Some(other.clone()),
        })
    }

    fn struct_<K: Into<String>>(
        &self,
        props: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr {
        encoder::struct_(props).contramap(fields)
    }

    fn partial<K: Into<String>>(
        &self,
        props: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr {
        encoder::partial(props).contramap(fields)
    }

    fn record(&self, codomain: Self::Repr) -> Self::Repr {
        encoder::record(codomain).contramap(|value: &Value| fields(value).into_iter().collect())
    }

    fn array(&self, item: Self::Repr) -> Self::Repr {
        encoder::array(item).contramap(items)
    }

    fn tuple(&self, components: Vec<Self::Repr>) -> Self::Repr {
        encoder::tuple(components).contramap(items)
    }

    fn intersect(&self, left: Self::Repr, right: Self::Repr) -> Self::Repr {
        encoder::intersect(left, right)
    }

    fn sum<K: Into<String>>(
        &self,
        tag: &str,
        members: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr {
        encoder::sum(tag, members)
    }

    fn lazy<F>(&self, id: &str, f: F) -> Self::Repr
    where
        F: Fn(&Self) -> Self::Repr + Send + Sync + 'static,
    {
        let interpreter = self.clone();
        encoder::lazy(&self.registry, id, move || f(&interpreter))
    }

    fn compiled(&self) -> &Compiled<Self::Repr> {
        &self.compiled
    }
}

impl WithUnknownContainers for EncoderInterpreter {
    fn unknown_array(&self) -> Self::Repr {
        encoder::id()
    }

    fn unknown_record(&self) -> Self::Repr {
        encoder::id()
    }
}

impl WithRefine for EncoderInterpreter {
    fn refine<P>(&self, from: Self::Repr, _predicate: P, _id: &str) -> Self::Repr
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        from
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::draw;
    use crate::schemable::Schema;
    use serde_json::json;

    struct Shape;

    impl<S: WithUnion> Schema<S> for Shape {
        fn interpret(&self, s: &S) -> S::Repr {
            s.sum(
                "kind",
                vec![
                    (
                        "circle",
                        s.struct_(vec![("kind", s.literal(["circle"])), ("radius", s.number())]),
                    ),
                    (
                        "label",
                        s.struct_(vec![
                            ("kind", s.literal(["label"])),
                            ("text", s.union(vec![s.string(), s.number()])),
                        ]),
                    ),
                ],
            )
        }
    }

    #[test]
    fn test_decoder_keeps_integers() {
        let d = DecoderInterpreter::new().make(&Shape);
        let decoded = d
            .decode(&json!({"kind": "circle", "radius": 2}))
            .into_result()
            .unwrap();
        assert_eq!(decoded, json!({"kind": "circle", "radius": 2}));
    }

    #[test]
    fn test_decoder_and_guard_agree() {
        let d = DecoderInterpreter::new().make(&Shape);
        let g = GuardInterpreter::new().make(&Shape);

        let inputs = [
            json!({"kind": "circle", "radius": 1}),
            json!({"kind": "circle"}),
            json!({"kind": "label", "text": 3}),
            json!({"kind": "label", "text": true}),
            json!({"kind": "triangle"}),
            json!([]),
        ];
        for input in &inputs {
            assert_eq!(d.decode(input).is_success(), g.is(input), "input {}", input);
        }
    }

    #[test]
    fn test_refine_interpretations() {
        struct Even;

        impl<S: WithRefine> Schema<S> for Even {
            fn interpret(&self, s: &S) -> S::Repr {
                s.refine(
                    s.number(),
                    |v| v.as_i64().is_some_and(|n| n % 2 == 0),
                    "Even",
                )
            }
        }

        let d = DecoderInterpreter::new().make(&Even);
        let errors = d.decode(&json!(3)).into_result().unwrap_err();
        assert_eq!(draw(&errors), "cannot decode 3, should be Even");

        assert!(GuardInterpreter::new().make(&Even).is(&json!(4)));
        assert!(!GuardInterpreter::new().make(&Even).is(&json!(5)));

        assert_eq!(EncoderInterpreter::new().make(&Even).encode(&json!(5)), json!(5));
    }

    #[test]
    fn test_refine_predicate_sees_input() {
        struct Closed;

        impl<S: WithRefine> Schema<S> for Closed {
            fn interpret(&self, s: &S) -> S::Repr {
                s.refine(
                    s.struct_(vec![("a", s.number())]),
                    |v| v.as_object().is_some_and(|o| o.len() == 1),
                    "Closed",
                )
            }
        }

        let d = DecoderInterpreter::new().make(&Closed);
        let g = GuardInterpreter::new().make(&Closed);

        let open = json!({"a": 1, "b": 2});
        assert!(d.decode(&open).is_failure());
        assert!(!g.is(&open));

        let closed = json!({"a": 1});
        assert_eq!(d.decode(&closed).into_result().unwrap(), closed);
        assert!(g.is(&closed));
    }

    #[test]
    fn test_encoder_interpretation() {
        struct Profile;

        impl<S: WithUnknownContainers> Schema<S> for Profile {
            fn interpret(&self, s: &S) -> S::Repr {
                s.struct_(vec![
                    ("name", s.string()),
                    ("nick", s.nullable(s.string())),
                    ("extra", s.unknown_record()),
                    ("scores", s.record(s.number())),
                    ("pair", s.tuple(vec![s.string(), s.number()])),
                ])
            }
        }

        let e = EncoderInterpreter::new().make(&Profile);
        let value = json!({
            "name": "Ada",
            "nick": null,
            "extra": {"x": 1},
            "scores": {"math": 10},
            "pair": ["a", 1],
            "ignored": true
        });
        assert_eq!(
            e.encode(&value),
            json!({
                "name": "Ada",
                "nick": null,
                "extra": {"x": 1},
                "scores": {"math": 10},
                "pair": ["a", 1]
            })
        );

        let d = DecoderInterpreter::new().make(&Profile);
        let decoded = d.decode(&value).into_result().unwrap();
        assert_eq!(e.encode(&decoded), decoded);
    }
}
