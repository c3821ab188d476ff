//! Decode error tree types.
//!
//! This module provides [`DecodeError`], a single node of a decode failure,
//! and [`DecodeErrors`], the non-empty accumulation of sibling nodes that
//! every decoder returns on failure.

use std::fmt::{self, Display};

use serde_json::Value;

use crate::free_semigroup::FreeSemigroup;

/// Whether a keyed or indexed slot must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requiredness {
    /// The slot must be present and valid.
    Required,
    /// The slot may be absent; if present it must be valid.
    Optional,
}

impl Display for Requiredness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requiredness::Required => write!(f, "required"),
            Requiredness::Optional => write!(f, "optional"),
        }
    }
}

/// Accumulated sibling failures.
pub type DecodeErrors<E = String> = FreeSemigroup<DecodeError<E>>;

/// One node of a decode failure tree.
///
/// Leaves carry the offending input and a description of the expected shape.
/// Every other variant locates its children: a property, a position, a union
/// branch, a recursive definition, or a user-supplied context message.
/// Children are always a [`DecodeErrors`] accumulation so that sibling
/// failures combine instead of one being picked.
///
/// # Example
///
/// ```rust
/// use schemable::{DecodeError, FreeSemigroup, Requiredness};
/// use serde_json::json;
///
/// let missing: DecodeError = DecodeError::key(
///     "name",
///     Requiredness::Required,
///     FreeSemigroup::of(DecodeError::leaf(json!(null), "string")),
/// );
///
/// assert!(matches!(missing, DecodeError::Key { .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError<E = String> {
    /// The input itself has the wrong shape.
    Leaf {
        /// The offending value.
        actual: Value,
        /// What was expected instead.
        error: E,
    },
    /// A failure inside an object property.
    Key {
        /// Property name.
        key: String,
        /// Whether the property was required.
        kind: Requiredness,
        /// Failures of the property value.
        errors: FreeSemigroup<DecodeError<E>>,
    },
    /// A failure inside an array element or tuple component.
    Index {
        /// Zero-based position.
        index: usize,
        /// Whether the position was required.
        kind: Requiredness,
        /// Failures of the element.
        errors: FreeSemigroup<DecodeError<E>>,
    },
    /// A failed union branch.
    Member {
        /// Zero-based branch position in declaration order.
        index: usize,
        /// Failures of that branch.
        errors: FreeSemigroup<DecodeError<E>>,
    },
    /// A failure surfacing through a named recursive definition.
    Lazy {
        /// Identifier of the definition.
        id: String,
        /// Failures of the resolved decoder.
        errors: FreeSemigroup<DecodeError<E>>,
    },
    /// A user-supplied context message around other failures.
    Wrap {
        /// The context message.
        error: E,
        /// The wrapped failures.
        errors: FreeSemigroup<DecodeError<E>>,
    },
}

impl<E> DecodeError<E> {
    /// Creates a leaf error.
    pub fn leaf(actual: Value, error: impl Into<E>) -> Self {
        DecodeError::Leaf {
            actual,
            error: error.into(),
        }
    }

    /// Creates a property error.
    pub fn key(key: impl Into<String>, kind: Requiredness, errors: FreeSemigroup<Self>) -> Self {
        DecodeError::Key {
            key: key.into(),
            kind,
            errors,
        }
    }

    /// Creates a positional error.
    pub fn index(index: usize, kind: Requiredness, errors: FreeSemigroup<Self>) -> Self {
        DecodeError::Index {
            index,
            kind,
            errors,
        }
    }

    /// Creates a union-branch error.
    pub fn member(index: usize, errors: FreeSemigroup<Self>) -> Self {
        DecodeError::Member { index, errors }
    }

    /// Creates a recursive-definition error.
    pub fn lazy(id: impl Into<String>, errors: FreeSemigroup<Self>) -> Self {
        DecodeError::Lazy {
            id: id.into(),
            errors,
        }
    }

    /// Creates a context-message error.
    pub fn wrap(error: impl Into<E>, errors: FreeSemigroup<Self>) -> Self {
        DecodeError::Wrap {
            error: error.into(),
            errors,
        }
    }

    /// Exhaustive case analysis over the six variants.
    pub fn fold<F: DecodeErrorFold<E>>(&self, folder: &F) -> F::Output {
        match self {
            DecodeError::Leaf { actual, error } => folder.leaf(actual, error),
            DecodeError::Key { key, kind, errors } => folder.key(key, *kind, errors),
            DecodeError::Index {
                index,
                kind,
                errors,
            } => folder.index(*index, *kind, errors),
            DecodeError::Member { index, errors } => folder.member(*index, errors),
            DecodeError::Lazy { id, errors } => folder.lazy(id, errors),
            DecodeError::Wrap { error, errors } => folder.wrap(error, errors),
        }
    }
}

/// One handler per [`DecodeError`] variant.
///
/// None of the methods has a default, so a consumer that forgets a case does
/// not compile.
pub trait DecodeErrorFold<E> {
    /// Result of folding one node.
    type Output;

    /// Handles [`DecodeError::Leaf`].
    fn leaf(&self, actual: &Value, error: &E) -> Self::Output;

    /// Handles [`DecodeError::Key`].
    fn key(&self, key: &str, kind: Requiredness, errors: &DecodeErrors<E>) -> Self::Output;

    /// Handles [`DecodeError::Index`].
    fn index(&self, index: usize, kind: Requiredness, errors: &DecodeErrors<E>) -> Self::Output;

    /// Handles [`DecodeError::Member`].
    fn member(&self, index: usize, errors: &DecodeErrors<E>) -> Self::Output;

    /// Handles [`DecodeError::Lazy`].
    fn lazy(&self, id: &str, errors: &DecodeErrors<E>) -> Self::Output;

    /// Handles [`DecodeError::Wrap`].
    fn wrap(&self, error: &E, errors: &DecodeErrors<E>) -> Self::Output;
}

/// A decode failure as a standard error, rendered with [`draw`](crate::draw::draw).
///
/// Returned by [`Decoder::decode_result`](crate::Decoder::decode_result) for
/// callers that want to use `?`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", crate::draw::draw(.errors))]
pub struct DecodeFailure {
    /// The full failure tree.
    pub errors: DecodeErrors,
}

impl DecodeFailure {
    /// Wraps a failure tree.
    pub fn new(errors: DecodeErrors) -> Self {
        Self { errors }
    }

    /// Returns the failure tree.
    pub fn into_errors(self) -> DecodeErrors {
        self.errors
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<DecodeErrors>();
    assert_sync::<DecodeErrors>();
    assert_send::<DecodeFailure>();
    assert_sync::<DecodeFailure>();
};
