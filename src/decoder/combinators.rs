//! Decoder combinators for unions, intersections, tagged unions, nullable
//! values and recursive definitions.

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{DecodeError, Requiredness};
use crate::free_semigroup::FreeSemigroup;
use crate::registry::Registry;
use crate::validation::{both, failure, map_errors};

use super::primitives::literal_message;
use super::{Decoder, NULL, UNKNOWN_RECORD};

/// Decodes with the first member that succeeds.
///
/// Members are tried in order and the first success is returned without
/// running the rest. If every member fails, every failure is reported as a
/// [`DecodeError::Member`] with its branch index. An empty union rejects
/// everything as `never`.
///
/// # Example
///
/// ```rust
/// use schemable::decoder;
/// use serde_json::json;
///
/// let id = decoder::union(vec![
///     decoder::string().into_value(),
///     decoder::number().into_value(),
/// ]);
///
/// assert!(id.decode(&json!("abc")).is_success());
/// assert!(id.decode(&json!(42)).is_success());
///
/// let errors = id.decode(&json!(true)).into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
pub fn union<A: 'static>(members: Vec<Decoder<Value, A>>) -> Decoder<Value, A> {
    Decoder::new(move |input: &Value| {
        let mut errors = Vec::with_capacity(members.len());
        for (i, member) in members.iter().enumerate() {
            match member.decode(input) {
                Validation::Success(value) => return Validation::Success(value),
                Validation::Failure(e) => errors.push(FreeSemigroup::of(DecodeError::member(i, e))),
            }
        }
        let mut errors = errors.into_iter();
        match errors.next() {
            Some(first) => Validation::Failure(FreeSemigroup::concat_all(first, errors)),
            None => failure(input.clone(), "never"),
        }
    })
}

/// Shallow-merges two decoded values, right over left.
///
/// Two objects merge key by key with `right` winning collisions; any other
/// pair resolves to `right`.
pub(crate) fn merge(left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Object(mut l), Value::Object(r)) => {
            l.extend(r);
            Value::Object(l)
        }
        (_, right) => right,
    }
}

/// Decodes with both decoders and merges the results.
///
/// Both sides always run; their failures are accumulated.
///
/// # Example
///
/// ```rust
/// use schemable::decoder;
/// use serde_json::json;
///
/// let named = decoder::struct_(vec![("name", decoder::string().into_value())]).into_value();
/// let aged = decoder::struct_(vec![("age", decoder::number().into_value())]).into_value();
/// let person = decoder::intersect(named, aged);
///
/// let decoded = person.decode(&json!({"name": "Ada", "age": 36})).into_result().unwrap();
/// assert_eq!(decoded, json!({"name": "Ada", "age": 36.0}));
///
/// let errors = person.decode(&json!({})).into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
pub fn intersect(
    left: Decoder<Value, Value>,
    right: Decoder<Value, Value>,
) -> Decoder<Value, Value> {
    Decoder::new(move |input: &Value| {
        both(left.decode(input), right.decode(input)).map(|(l, r)| merge(l, r))
    })
}

/// Decodes a tagged union by dispatching on the `tag` property.
///
/// The tag value selects exactly one member in constant time and only that
/// member runs, against the whole input. A missing, non-string or unknown
/// tag fails with a `required` [`DecodeError::Key`] on the tag whose leaf
/// lists every legal tag in declaration order. A member's own failures are
/// returned as they are, since they already describe properties of the same
/// object the tag lives in.
///
/// # Example
///
/// ```rust
/// use schemable::{decoder, draw::draw};
/// use serde_json::json;
///
/// let shape = decoder::sum("type", vec![
///     ("circle", decoder::struct_(vec![("radius", decoder::number().into_value())]).into_value()),
///     ("square", decoder::struct_(vec![("side", decoder::number().into_value())]).into_value()),
/// ]);
///
/// assert!(shape.decode(&json!({"type": "circle", "radius": 1})).is_success());
///
/// let errors = shape.decode(&json!({"type": "hexagon"})).into_result().unwrap_err();
/// assert_eq!(
///     draw(&errors),
///     "required property \"type\"\n└─ cannot decode \"hexagon\", should be \"circle\" | \"square\""
/// );
/// ```
pub fn sum<A: 'static, K: Into<String>>(
    tag: impl Into<String>,
    members: impl IntoIterator<Item = (K, Decoder<Value, A>)>,
) -> Decoder<Value, A> {
    let tag = tag.into();
    let members: IndexMap<String, Decoder<Value, A>> =
        members.into_iter().map(|(k, d)| (k.into(), d)).collect();
    let tags: Vec<Value> = members.keys().map(|k| Value::from(k.as_str())).collect();
    let expected = literal_message(&tags);

    Decoder::new(move |input: &Value| {
        let fields = match input.as_object() {
            Some(fields) => fields,
            None => return failure(input.clone(), UNKNOWN_RECORD),
        };

        let raw = fields.get(&tag).unwrap_or(&NULL);
        match raw.as_str().and_then(|t| members.get(t)) {
            Some(member) => member.decode(input),
            None => Validation::Failure(FreeSemigroup::of(DecodeError::key(
                tag.as_str(),
                Requiredness::Required,
                FreeSemigroup::of(DecodeError::leaf(raw.clone(), expected.as_str())),
            ))),
        }
    })
}

/// Accepts `null` or whatever `or` accepts.
///
/// When the input is neither, both alternatives are reported: member 0
/// (`null`) and member 1 (the failures of `or`).
pub fn nullable<A: 'static>(or: Decoder<Value, A>) -> Decoder<Value, Option<A>> {
    Decoder::new(move |input: &Value| {
        if input.is_null() {
            return Validation::Success(None);
        }
        match or.decode(input) {
            Validation::Success(value) => Validation::Success(Some(value)),
            Validation::Failure(e) => Validation::Failure(FreeSemigroup::concat(
                FreeSemigroup::of(DecodeError::member(
                    0,
                    FreeSemigroup::of(DecodeError::leaf(input.clone(), "null")),
                )),
                FreeSemigroup::of(DecodeError::member(1, e)),
            )),
        }
    })
}

/// A recursive decoder resolved through `registry`.
///
/// The thunk is registered under `id` and runs at most once, the first time
/// any decoder built from this definition is used. Defining the same `id`
/// again, which is what a self-referential thunk does, reuses the existing
/// definition. Every failure surfacing through the definition is wrapped
/// once in [`DecodeError::Lazy`].
///
/// Recursion depth at decode time follows the nesting of the input. Cyclic
/// input cannot be expressed as a JSON value, so it is never a concern here.
pub fn lazy<I: 'static, A: 'static>(
    registry: &Registry<Decoder<I, A>>,
    id: impl Into<String>,
    thunk: impl Fn() -> Decoder<I, A> + Send + Sync + 'static,
) -> Decoder<I, A> {
    let definition = registry.define(id, thunk);
    Decoder::new(move |input: &I| {
        map_errors(definition.force().decode(input), |e| {
            FreeSemigroup::of(DecodeError::lazy(definition.id(), e))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{array, number, string, struct_};
    use crate::draw::draw;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn members(errors: &crate::error::DecodeErrors) -> Vec<usize> {
        errors
            .iter()
            .map(|e| match e {
                DecodeError::Member { index, .. } => *index,
                other => panic!("expected member error, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_union_reports_every_branch() {
        let d = union(vec![string().into_value(), number().into_value()]);
        let errors = d.decode(&json!(true)).into_result().unwrap_err();
        assert_eq!(members(&errors), vec![0, 1]);
    }

    #[test]
    fn test_union_stops_at_first_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let spy: Decoder<Value, Value> = Decoder::new(move |input: &Value| {
            counter.fetch_add(1, Ordering::SeqCst);
            failure(input.clone(), "spy")
        });

        let d = union(vec![string().into_value(), spy]);
        assert_eq!(d.decode(&json!("a")).into_result().unwrap(), json!("a"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(d.decode(&json!(1)).is_failure());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_union() {
        let d: Decoder<Value, Value> = union(Vec::new());
        let errors = d.decode(&json!(1)).into_result().unwrap_err();
        assert_eq!(draw(&errors), "cannot decode 1, should be never");
    }

    #[test]
    fn test_merge() {
        assert_eq!(
            merge(json!({"a": 1, "b": 1}), json!({"b": 2, "c": 2})),
            json!({"a": 1, "b": 2, "c": 2})
        );
        assert_eq!(merge(json!({"a": 1}), json!(3)), json!(3));
        assert_eq!(merge(json!("x"), json!("y")), json!("y"));
    }

    #[test]
    fn test_intersect_accumulates_both_sides() {
        let left = struct_(vec![("a", string().into_value())]).into_value();
        let right = struct_(vec![("b", number().into_value())]).into_value();
        let errors = intersect(left, right)
            .decode(&json!({"a": 1, "b": "x"}))
            .into_result()
            .unwrap_err();
        let expected = [
            "required property \"a\"",
            "└─ cannot decode 1, should be string",
            "required property \"b\"",
            "└─ cannot decode \"x\", should be number",
        ]
        .join("\n");
        assert_eq!(draw(&errors), expected);
    }

    fn shape() -> Decoder<Value, Value> {
        sum(
            "type",
            vec![
                (
                    "circle",
                    struct_(vec![("radius", number().into_value())]).into_value(),
                ),
                (
                    "square",
                    struct_(vec![("side", number().into_value())]).into_value(),
                ),
            ],
        )
    }

    #[test]
    fn test_sum_dispatches_to_one_member() {
        let decoded = shape()
            .decode(&json!({"type": "square", "side": 2}))
            .into_result()
            .unwrap();
        assert_eq!(decoded, json!({"side": 2.0}));
    }

    #[test]
    fn test_sum_member_errors_are_not_wrapped() {
        let errors = shape()
            .decode(&json!({"type": "circle", "radius": "big"}))
            .into_result()
            .unwrap_err();
        assert_eq!(
            draw(&errors),
            "required property \"radius\"\n└─ cannot decode \"big\", should be number"
        );
    }

    #[test]
    fn test_sum_missing_tag() {
        let errors = shape().decode(&json!({})).into_result().unwrap_err();
        assert_eq!(
            draw(&errors),
            "required property \"type\"\n└─ cannot decode null, should be \"circle\" | \"square\""
        );
    }

    #[test]
    fn test_sum_non_string_tag() {
        let errors = shape().decode(&json!({"type": 1})).into_result().unwrap_err();
        assert!(draw(&errors).contains("cannot decode 1"));
    }

    #[test]
    fn test_sum_rejects_non_object() {
        let errors = shape().decode(&json!("circle")).into_result().unwrap_err();
        assert_eq!(
            draw(&errors),
            "cannot decode \"circle\", should be Record<string, unknown>"
        );
    }

    #[test]
    fn test_sum_without_members() {
        let d: Decoder<Value, Value> = sum("kind", Vec::<(&str, Decoder<Value, Value>)>::new());
        let errors = d.decode(&json!({"kind": "a"})).into_result().unwrap_err();
        assert!(draw(&errors).ends_with("should be never"));
    }

    #[test]
    fn test_nullable() {
        let d = nullable(number());
        assert_eq!(d.decode(&json!(null)).into_result().unwrap(), None);
        assert_eq!(d.decode(&json!(2)).into_result().unwrap(), Some(2.0));

        let errors = d.decode(&json!("x")).into_result().unwrap_err();
        let expected = [
            "member 0",
            "└─ cannot decode \"x\", should be null",
            "member 1",
            "└─ cannot decode \"x\", should be number",
        ]
        .join("\n");
        assert_eq!(draw(&errors), expected);
    }

    fn tree(
        registry: &Registry<Decoder<Value, Value>>,
        calls: Arc<AtomicUsize>,
    ) -> Decoder<Value, Value> {
        let inner = registry.clone();
        lazy(registry, "Tree", move || {
            calls.fetch_add(1, Ordering::SeqCst);
            struct_(vec![
                ("value", number().into_value()),
                (
                    "children",
                    array(tree(&inner, Arc::clone(&calls))).into_value(),
                ),
            ])
            .into_value()
        })
    }

    #[test]
    fn test_lazy_thunk_runs_once() {
        let registry = Registry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let d = tree(&registry, Arc::clone(&calls));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let input = json!({"value": 1, "children": [
            {"value": 2, "children": []},
            {"value": 3, "children": [{"value": 4, "children": []}]}
        ]});
        assert!(d.decode(&input).is_success());
        assert!(d.decode(&input).is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lazy_wraps_each_level_once() {
        let registry = Registry::new();
        let d = tree(&registry, Arc::new(AtomicUsize::new(0)));

        let errors = d
            .decode(&json!({"value": 1, "children": [{"value": "x", "children": []}]}))
            .into_result()
            .unwrap_err();

        let expected = [
            "lazy type Tree",
            "└─ required property \"children\"",
            "   └─ optional index 0",
            "      └─ lazy type Tree",
            "         └─ required property \"value\"",
            "            └─ cannot decode \"x\", should be number",
        ]
        .join("\n");
        assert_eq!(draw(&errors), expected);
    }
}
