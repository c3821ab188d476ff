//! Accumulating result helpers.
//!
//! Decoders return [`Decoded`], a `stillwater::Validation` whose failure side
//! is a [`DecodeErrors`] tree. This module provides the two operations the
//! combinators are built from:
//!
//! - [`both`]: the accumulating `ap`. When both sides fail, both failures are
//!   kept.
//! - [`traverse_indexed`] / [`traverse_keyed`]: run a decoding step over every
//!   element or entry, collecting successes and failures in input order.
//!
//! Short-circuiting sequencing is `Validation::and_then`.

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{DecodeError, DecodeErrors};
use crate::free_semigroup::FreeSemigroup;

/// The result of running a decoder.
pub type Decoded<A> = Validation<A, DecodeErrors>;

/// Wraps a decoded value.
pub fn success<A>(value: A) -> Decoded<A> {
    Validation::Success(value)
}

/// A single-leaf failure for `actual`.
pub fn failure<A>(actual: Value, expected: impl Into<String>) -> Decoded<A> {
    Validation::Failure(FreeSemigroup::of(DecodeError::leaf(actual, expected)))
}

/// Combines two independent results, accumulating both failures.
///
/// # Example
///
/// ```rust
/// use schemable::validation::{both, failure, success, Decoded};
/// use serde_json::json;
/// use stillwater::Validation;
///
/// let ok: Decoded<(i32, i32)> = both(success(1), success(2));
/// assert!(matches!(ok, Validation::Success((1, 2))));
///
/// let bad: Decoded<(i32, i32)> = both(failure(json!(1), "a"), failure(json!(2), "b"));
/// match bad {
///     Validation::Failure(errors) => assert_eq!(errors.len(), 2),
///     Validation::Success(_) => unreachable!(),
/// }
/// ```
pub fn both<A, B, E>(
    left: Validation<A, FreeSemigroup<E>>,
    right: Validation<B, FreeSemigroup<E>>,
) -> Validation<(A, B), FreeSemigroup<E>> {
    match (left, right) {
        (Validation::Success(a), Validation::Success(b)) => Validation::Success((a, b)),
        (Validation::Failure(e), Validation::Success(_))
        | (Validation::Success(_), Validation::Failure(e)) => Validation::Failure(e),
        (Validation::Failure(l), Validation::Failure(r)) => {
            Validation::Failure(FreeSemigroup::concat(l, r))
        }
    }
}

/// Applies `f` to every item with its position and accumulates all failures.
///
/// Items are visited in order; the successes keep that order and so do the
/// failures in the returned tree.
pub fn traverse_indexed<T, A, E, F>(
    items: impl IntoIterator<Item = T>,
    mut f: F,
) -> Validation<Vec<A>, FreeSemigroup<E>>
where
    F: FnMut(usize, T) -> Validation<A, FreeSemigroup<E>>,
{
    let mut values = Vec::new();
    let mut errors = Vec::new();

    for (i, item) in items.into_iter().enumerate() {
        match f(i, item) {
            Validation::Success(v) => values.push(v),
            Validation::Failure(e) => errors.push(e),
        }
    }

    let mut errors = errors.into_iter();
    match errors.next() {
        Some(first) => Validation::Failure(FreeSemigroup::concat_all(first, errors)),
        None => Validation::Success(values),
    }
}

/// Applies `f` to every entry and accumulates all failures.
///
/// Entry order is preserved in the output map and in the failure tree.
pub fn traverse_keyed<K, T, A, E, F>(
    entries: impl IntoIterator<Item = (K, T)>,
    mut f: F,
) -> Validation<IndexMap<String, A>, FreeSemigroup<E>>
where
    K: Into<String>,
    F: FnMut(&str, T) -> Validation<A, FreeSemigroup<E>>,
{
    let mut values = IndexMap::new();
    let mut errors = Vec::new();

    for (key, item) in entries {
        let key = key.into();
        match f(&key, item) {
            Validation::Success(v) => {
                values.insert(key, v);
            }
            Validation::Failure(e) => errors.push(e),
        }
    }

    let mut errors = errors.into_iter();
    match errors.next() {
        Some(first) => Validation::Failure(FreeSemigroup::concat_all(first, errors)),
        None => Validation::Success(values),
    }
}

/// Maps the failure side of a result, leaving successes untouched.
pub fn map_errors<A, E, F>(
    result: Validation<A, FreeSemigroup<E>>,
    f: F,
) -> Validation<A, FreeSemigroup<E>>
where
    F: FnOnce(FreeSemigroup<E>) -> FreeSemigroup<E>,
{
    match result {
        Validation::Success(a) => Validation::Success(a),
        Validation::Failure(e) => Validation::Failure(f(e)),
    }
}
