//! Property-based tests for error accumulation, guard/decoder agreement
//! and codec round-trips.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use schemable::{
    decoder, Codec, DecoderInterpreter, FreeSemigroup, GuardInterpreter, Schema, Schemable,
    WithRefine, WithUnion,
};
use serde_json::{Map, Value};
use stillwater::prelude::*;

fn arbitrary_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-100i64..100).prop_map(Value::from),
        (-100.0f64..100.0).prop_map(Value::from),
        "[a-c]{0,2}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::vec(("[a-e]|kind", inner), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn tree_from(values: &[i32]) -> FreeSemigroup<i32> {
    let mut iter = values.iter().copied();
    let first = FreeSemigroup::of(iter.next().unwrap_or_default());
    iter.fold(first, |acc, v| FreeSemigroup::concat(acc, FreeSemigroup::of(v)))
}

/// A shape that touches every combinator the interpreters share.
struct Everything;

impl<S: WithUnion + WithRefine> Schema<S> for Everything {
    fn interpret(&self, s: &S) -> S::Repr {
        s.union(vec![
            s.sum(
                "kind",
                vec![
                    (
                        "a",
                        s.struct_(vec![
                            ("kind", s.literal(["a"])),
                            ("b", s.nullable(s.number())),
                        ]),
                    ),
                    (
                        "b",
                        s.intersect(
                            s.struct_(vec![("kind", s.literal(["b"]))]),
                            s.partial(vec![("c", s.string()), ("d", s.array(s.boolean()))]),
                        ),
                    ),
                ],
            ),
            s.intersect(
                s.struct_(vec![("a", s.record(s.number()))]),
                s.partial(vec![("e", s.tuple(vec![s.string(), s.nullable(s.boolean())]))]),
            ),
            s.array(s.refine(s.number(), |v| v.as_f64().is_some_and(|n| n >= 0.0), "NonNegative")),
            s.literal([Value::Null]),
            s.refine(
                s.struct_(vec![("b", s.number())]),
                |v| v.as_object().is_some_and(|o| o.len() == 1),
                "OnlyB",
            ),
        ])
    }
}

proptest! {
    #[test]
    fn concat_is_associative(
        a in prop::collection::vec(any::<i32>(), 1..6),
        b in prop::collection::vec(any::<i32>(), 1..6),
        c in prop::collection::vec(any::<i32>(), 1..6),
    ) {
        let left = FreeSemigroup::concat(
            FreeSemigroup::concat(tree_from(&a), tree_from(&b)),
            tree_from(&c),
        );
        let right = FreeSemigroup::concat(
            tree_from(&a),
            FreeSemigroup::concat(tree_from(&b), tree_from(&c)),
        );
        prop_assert_eq!(left.to_vec(), right.to_vec());
        prop_assert_eq!(left.to_vec(), [a, b, c].concat());
    }

    #[test]
    fn combine_matches_concat(
        a in prop::collection::vec(any::<i32>(), 1..6),
        b in prop::collection::vec(any::<i32>(), 1..6),
    ) {
        let combined = tree_from(&a).combine(tree_from(&b));
        prop_assert_eq!(combined.len(), a.len() + b.len());
        prop_assert_eq!(combined.into_vec(), [a, b].concat());
    }

    #[test]
    fn concat_all_keeps_leaf_order(items in prop::collection::vec(any::<i32>(), 1..200)) {
        let all = FreeSemigroup::concat_all(
            FreeSemigroup::of(items[0]),
            items[1..].iter().copied().map(FreeSemigroup::of),
        );
        prop_assert_eq!(all.to_vec(), items);
    }

    #[test]
    fn array_reports_one_error_per_bad_element(
        items in prop::collection::vec(arbitrary_json(), 0..20),
    ) {
        let bad = items.iter().filter(|v| !v.is_number()).count();
        let result = decoder::array(decoder::number()).decode(&Value::from(items));
        match result.into_result() {
            Ok(_) => prop_assert_eq!(bad, 0),
            Err(errors) => prop_assert_eq!(errors.len(), bad),
        }
    }

    #[test]
    fn guard_agrees_with_decoder(input in arbitrary_json()) {
        let d = DecoderInterpreter::new().make(&Everything);
        let g = GuardInterpreter::new().make(&Everything);
        prop_assert_eq!(d.decode(&input).is_success(), g.is(&input));
    }

    #[test]
    fn from_decoder_codec_round_trips(input in arbitrary_json()) {
        let c = Codec::from_decoder(DecoderInterpreter::new().make(&Everything));
        if let Ok(decoded) = c.decode(&input).into_result() {
            let again = c.decode(&c.encode(&decoded)).into_result();
            prop_assert_eq!(again.ok(), Some(decoded));
        }
    }
}
