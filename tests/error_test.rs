//! Integration tests for DecodeError trees and their rendering.

use schemable::draw::{draw, stringify, to_forest};
use schemable::{decoder, DecodeError, DecodeErrors, DecodeFailure, FreeSemigroup, Requiredness};
use serde_json::{json, Value};
use stillwater::prelude::*;
use stillwater::Validation;

fn leaf(actual: Value, expected: &str) -> DecodeErrors {
    FreeSemigroup::of(DecodeError::leaf(actual, expected))
}

#[test]
fn test_errors_combine_via_semigroup() {
    let a = leaf(json!(1), "string");
    let b = leaf(json!(2), "boolean");

    let combined = a.combine(b);
    assert_eq!(combined.len(), 2);
    assert!(!combined.is_empty());
}

#[test]
fn test_draw_every_variant() {
    let errors = FreeSemigroup::concat(
        FreeSemigroup::of(DecodeError::wrap(
            "invalid user",
            FreeSemigroup::of(DecodeError::key(
                "tags",
                Requiredness::Optional,
                FreeSemigroup::of(DecodeError::index(
                    2,
                    Requiredness::Required,
                    FreeSemigroup::concat(
                        FreeSemigroup::of(DecodeError::member(0, leaf(json!(true), "string"))),
                        FreeSemigroup::of(DecodeError::member(1, leaf(json!(true), "number"))),
                    ),
                )),
            )),
        )),
        FreeSemigroup::of(DecodeError::lazy("Node", leaf(json!(null), "Record<string, unknown>"))),
    );

    let expected = [
        "invalid user",
        "└─ optional property \"tags\"",
        "   └─ required index 2",
        "      ├─ member 0",
        "      │  └─ cannot decode true, should be string",
        "      └─ member 1",
        "         └─ cannot decode true, should be number",
        "lazy type Node",
        "└─ cannot decode null, should be Record<string, unknown>",
    ]
    .join("\n");

    assert_eq!(draw(&errors), expected);
}

#[test]
fn test_forest_has_one_root_per_sibling() {
    let errors = FreeSemigroup::concat(
        FreeSemigroup::concat(leaf(json!(1), "a"), leaf(json!(2), "b")),
        leaf(json!(3), "c"),
    );

    let forest = to_forest(&errors);
    let labels: Vec<_> = forest.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "cannot decode 1, should be a",
            "cannot decode 2, should be b",
            "cannot decode 3, should be c",
        ]
    );
}

#[test]
fn test_every_leaf_drawn_once() {
    let d = decoder::struct_(vec![
        ("a", decoder::string().into_value()),
        ("b", decoder::array(decoder::number()).into_value()),
        ("c", decoder::boolean().into_value()),
    ]);

    let errors = d
        .decode(&json!({"a": 1, "b": [1, "x", "y"], "c": "no"}))
        .into_result()
        .unwrap_err();

    let rendered = draw(&errors);
    assert_eq!(rendered.matches("cannot decode").count(), 4);
    assert_eq!(rendered.matches("cannot decode \"x\"").count(), 1);

    let a = rendered.find("property \"a\"").unwrap();
    let b = rendered.find("property \"b\"").unwrap();
    let c = rendered.find("property \"c\"").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn test_stringify() {
    let ok: Validation<Value, DecodeErrors> = Validation::Success(json!({"a": 1}));
    assert_eq!(stringify(&ok), "{\n  \"a\": 1\n}");

    let bad: Validation<Value, DecodeErrors> = Validation::Failure(leaf(json!("x"), "number"));
    assert_eq!(stringify(&bad), "cannot decode \"x\", should be number");
}

#[test]
fn test_decode_failure_is_a_std_error() {
    fn parse(input: &Value) -> Result<f64, Box<dyn std::error::Error>> {
        Ok(decoder::number().decode_result(input)?)
    }

    assert_eq!(parse(&json!(2)).unwrap(), 2.0);

    let err = parse(&json!("two")).unwrap_err();
    assert_eq!(err.to_string(), "cannot decode \"two\", should be number");
}

#[test]
fn test_decode_failure_keeps_the_tree() {
    let failure = DecodeFailure::new(leaf(json!(1), "string"));
    assert_eq!(failure.errors.len(), 1);
    assert_eq!(failure.into_errors().len(), 1);
}
