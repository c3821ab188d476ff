//! Human-readable rendering of decode failures.
//!
//! A failure tree is first flattened into a forest of labelled [`Tree`] nodes,
//! then drawn with box-drawing connectors:
//!
//! ```text
//! required property "name"
//! └─ cannot decode null, should be string
//! required property "age"
//! └─ cannot decode "x", should be number
//! ```
//!
//! The output is meant for people. Programs should walk the
//! [`DecodeError`](super::DecodeError) tree or use [`failures`](crate::path::failures).

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;
use stillwater::Validation;

use super::decode_error::{DecodeErrorFold, DecodeErrors, Requiredness};

/// A labelled rose tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<T> {
    /// Label of this node.
    pub value: T,
    /// Children in order.
    pub forest: Vec<Tree<T>>,
}

impl<T> Tree<T> {
    /// Creates a node with the given children.
    pub fn new(value: T, forest: Vec<Tree<T>>) -> Self {
        Self { value, forest }
    }

    /// Creates a node without children.
    pub fn leaf(value: T) -> Self {
        Self::new(value, Vec::new())
    }
}

struct Labeller;

impl<E: Display> DecodeErrorFold<E> for Labeller {
    type Output = Tree<String>;

    fn leaf(&self, actual: &Value, error: &E) -> Tree<String> {
        Tree::leaf(format!("cannot decode {}, should be {}", actual, error))
    }

    fn key(&self, key: &str, kind: Requiredness, errors: &DecodeErrors<E>) -> Tree<String> {
        Tree::new(
            format!("{} property {}", kind, Value::from(key)),
            to_forest(errors),
        )
    }

    fn index(&self, index: usize, kind: Requiredness, errors: &DecodeErrors<E>) -> Tree<String> {
        Tree::new(format!("{} index {}", kind, index), to_forest(errors))
    }

    fn member(&self, index: usize, errors: &DecodeErrors<E>) -> Tree<String> {
        Tree::new(format!("member {}", index), to_forest(errors))
    }

    fn lazy(&self, id: &str, errors: &DecodeErrors<E>) -> Tree<String> {
        Tree::new(format!("lazy type {}", id), to_forest(errors))
    }

    fn wrap(&self, error: &E, errors: &DecodeErrors<E>) -> Tree<String> {
        Tree::new(error.to_string(), to_forest(errors))
    }
}

/// Converts one accumulation into its ordered list of root trees.
pub fn to_forest<E: Display>(errors: &DecodeErrors<E>) -> Vec<Tree<String>> {
    errors.iter().map(|e| e.fold(&Labeller)).collect()
}

/// Converts a single error node into a labelled tree.
pub fn to_tree<E: Display>(error: &super::DecodeError<E>) -> Tree<String> {
    error.fold(&Labeller)
}

/// Renders one tree with its label on the first line.
pub fn draw_tree(tree: &Tree<String>) -> String {
    let mut out = tree.value.clone();
    draw_forest(&mut out, "\n", &tree.forest);
    out
}

fn draw_forest(out: &mut String, indentation: &str, forest: &[Tree<String>]) {
    let len = forest.len();
    for (i, tree) in forest.iter().enumerate() {
        let is_last = i + 1 == len;
        out.push_str(indentation);
        out.push_str(if is_last { "└" } else { "├" });
        out.push_str("─ ");
        out.push_str(&tree.value);

        let next = if len > 1 && !is_last { "│  " } else { "   " };
        draw_forest(out, &format!("{}{}", indentation, next), &tree.forest);
    }
}

/// Renders a failure tree, one root per paragraph.
///
/// # Example
///
/// ```rust
/// use schemable::decoder;
/// use schemable::draw::draw;
/// use serde_json::json;
/// use stillwater::Validation;
///
/// let person = decoder::struct_(vec![
///     ("name", decoder::string().into_value()),
///     ("age", decoder::number().into_value()),
/// ]);
///
/// match person.decode(&json!({"age": "x"})) {
///     Validation::Failure(errors) => assert_eq!(
///         draw(&errors),
///         "required property \"name\"\n\
///          └─ cannot decode null, should be string\n\
///          required property \"age\"\n\
///          └─ cannot decode \"x\", should be number"
///     ),
///     Validation::Success(_) => unreachable!(),
/// }
/// ```
pub fn draw<E: Display>(errors: &DecodeErrors<E>) -> String {
    to_forest(errors)
        .iter()
        .map(draw_tree)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty JSON for a success, the drawn tree for a failure.
pub fn stringify<A: Serialize, E: Display>(result: &Validation<A, DecodeErrors<E>>) -> String {
    match result {
        Validation::Success(value) => serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("<unserializable value: {}>", e)),
        Validation::Failure(errors) => draw(errors),
    }
}
