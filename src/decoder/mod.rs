//! Decoders: pure functions from untyped input to a typed value or a
//! [`DecodeErrors`] tree.
//!
//! Sibling checks (object fields, array elements, tuple slots, union
//! branches, intersection operands) always run to completion and accumulate
//! every failure. Dependent steps ([`Decoder::compose`], [`Decoder::parse`],
//! [`Decoder::refine`]) short-circuit.
//!
//! # Example
//!
//! ```rust
//! use schemable::decoder;
//! use serde_json::json;
//!
//! let person = decoder::struct_(vec![
//!     ("name", decoder::string().into_value()),
//!     ("age", decoder::number().into_value()),
//! ]);
//!
//! let result = person.decode(&json!({"name": "Ada", "age": 36}));
//! assert!(result.is_success());
//!
//! // Both fields are reported, not just the first.
//! let result = person.decode(&json!({}));
//! match result.into_result() {
//!     Err(errors) => assert_eq!(errors.len(), 2),
//!     Ok(_) => unreachable!(),
//! }
//! ```

mod array;
mod combinators;
mod object;
mod primitives;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{DecodeError, DecodeErrors, DecodeFailure};
use crate::free_semigroup::FreeSemigroup;
use crate::validation::{map_errors, Decoded};

pub use array::{array, tuple};
pub use combinators::{intersect, lazy, nullable, sum, union};
pub use object::{partial, record, struct_};
pub use primitives::{
    boolean, from_guard, id, literal, number, pattern, string, unknown, unknown_array,
    unknown_record,
};

pub(crate) use combinators::merge;
pub(crate) use primitives::{NULL, UNKNOWN_ARRAY, UNKNOWN_RECORD};

/// Type alias for the decoding function stored in a [`Decoder`].
pub(crate) type DecodeFn<I, A> = Arc<dyn Fn(&I) -> Decoded<A> + Send + Sync>;

/// A reusable decoder from `I` to `A`.
///
/// Decoders are cheap to clone: clones share the same underlying function.
pub struct Decoder<I, A> {
    run: DecodeFn<I, A>,
}

impl<I, A> Clone for Decoder<I, A> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<I, A> fmt::Debug for Decoder<I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder").finish_non_exhaustive()
    }
}

impl<I: 'static, A: 'static> Decoder<I, A> {
    /// Creates a decoder from a decoding function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&I) -> Decoded<A> + Send + Sync + 'static,
    {
        Self { run: Arc::new(f) }
    }

    /// Runs the decoder.
    pub fn decode(&self, input: &I) -> Decoded<A> {
        (self.run)(input)
    }

    /// Runs the decoder and converts a failure into a [`DecodeFailure`].
    pub fn decode_result(&self, input: &I) -> Result<A, DecodeFailure> {
        self.decode(input).into_result().map_err(DecodeFailure::new)
    }

    /// Transforms the decoded value.
    pub fn map<B: 'static>(self, f: impl Fn(A) -> B + Send + Sync + 'static) -> Decoder<I, B> {
        Decoder::new(move |input| self.decode(input).map(&f))
    }

    /// Feeds the decoded value into a second decoder.
    ///
    /// The second step only runs when the first succeeds.
    pub fn compose<B: 'static>(self, next: Decoder<A, B>) -> Decoder<I, B> {
        Decoder::new(move |input| self.decode(input).and_then(|a| next.decode(&a)))
    }

    /// Follows a successful decode with a fallible conversion.
    pub fn parse<B: 'static>(
        self,
        f: impl Fn(A) -> Decoded<B> + Send + Sync + 'static,
    ) -> Decoder<I, B> {
        Decoder::new(move |input| self.decode(input).and_then(&f))
    }

    /// Adds a post-decode predicate.
    ///
    /// A value that decodes but fails `predicate` is reported as a fresh leaf
    /// carrying the decoded value and `id` as the expected shape.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schemable::decoder;
    /// use serde_json::json;
    ///
    /// let positive = decoder::number().refine(|n| *n > 0.0, "PositiveNumber");
    ///
    /// assert!(positive.decode(&json!(3)).is_success());
    /// assert!(positive.decode(&json!(-3)).is_failure());
    /// ```
    pub fn refine(
        self,
        predicate: impl Fn(&A) -> bool + Send + Sync + 'static,
        id: impl Into<String>,
    ) -> Self
    where
        A: Serialize,
    {
        let id = id.into();
        Decoder::new(move |input| {
            self.decode(input).and_then(|a| {
                if predicate(&a) {
                    Validation::Success(a)
                } else {
                    let actual = serde_json::to_value(&a).unwrap_or(Value::Null);
                    Validation::Failure(FreeSemigroup::of(DecodeError::leaf(actual, id.as_str())))
                }
            })
        })
    }

    /// Tries `that` when this decoder fails.
    ///
    /// If both fail, both failure trees are kept.
    pub fn alt(self, that: Decoder<I, A>) -> Self {
        Decoder::new(move |input| match self.decode(input) {
            Validation::Success(a) => Validation::Success(a),
            Validation::Failure(first) => {
                map_errors(that.decode(input), |second| FreeSemigroup::concat(first, second))
            }
        })
    }

    /// Rewrites a failure tree with access to the original input.
    pub fn map_left_with_input(
        self,
        f: impl Fn(&I, DecodeErrors) -> DecodeErrors + Send + Sync + 'static,
    ) -> Self {
        Decoder::new(move |input| map_errors(self.decode(input), |e| f(input, e)))
    }

    /// Wraps any failure in a [`DecodeError::Wrap`] with a computed message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schemable::{decoder, draw::draw};
    /// use serde_json::json;
    ///
    /// let id = decoder::string().with_message(|input, _| format!("bad id: {}", input));
    ///
    /// let errors = id.decode(&json!(7)).into_result().unwrap_err();
    /// assert_eq!(draw(&errors), "bad id: 7\n└─ cannot decode 7, should be string");
    /// ```
    pub fn with_message(
        self,
        message: impl Fn(&I, &DecodeErrors) -> String + Send + Sync + 'static,
    ) -> Self {
        self.map_left_with_input(move |input, e| {
            let text = message(input, &e);
            FreeSemigroup::of(DecodeError::wrap(text, e))
        })
    }

    /// Erases the output type into a JSON value.
    pub fn into_value(self) -> Decoder<I, Value>
    where
        A: Into<Value>,
    {
        self.map(Into::into)
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Decoder<Value, Value>>();
    assert_sync::<Decoder<Value, Value>>();
};
