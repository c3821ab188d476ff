//! Paths to failing values.
//!
//! This module provides [`ErrorPath`] and [`PathSegment`] for locating a leaf
//! inside a [`DecodeErrors`] tree, and [`failures`], which flattens a tree
//! into one [`LeafFailure`] per leaf for consumers that want records rather
//! than a rendered tree.

use std::fmt::{self, Display};

use serde_json::Value;

use crate::error::{DecodeError, DecodeErrors, Requiredness};

/// A segment of an error path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object property (e.g., `user`, `email`)
    Key(String, Requiredness),
    /// An array or tuple position (e.g., `[0]`)
    Index(usize, Requiredness),
    /// A union branch, shown as `<1>`
    Member(usize),
    /// A named recursive definition; not shown when displayed
    Lazy(String),
}

/// The location of a leaf failure, outermost segment first.
///
/// # Example
///
/// ```rust
/// use schemable::{ErrorPath, Requiredness};
///
/// let path = ErrorPath::root()
///     .push_key("users", Requiredness::Required)
///     .push_index(0, Requiredness::Optional)
///     .push_key("email", Requiredness::Required);
///
/// assert_eq!(path.to_string(), "users[0].email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ErrorPath {
    segments: Vec<PathSegment>,
}

impl ErrorPath {
    /// Creates an empty path representing the decoded input itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with `segment` appended.
    pub fn push(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Returns a new path with a property segment appended.
    pub fn push_key(&self, key: impl Into<String>, kind: Requiredness) -> Self {
        self.push(PathSegment::Key(key.into(), kind))
    }

    /// Returns a new path with a position segment appended.
    pub fn push_index(&self, index: usize, kind: Requiredness) -> Self {
        self.push(PathSegment::Index(index, kind))
    }

    /// Returns true if this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(name, _) => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(i, _) => write!(f, "[{}]", i)?,
                PathSegment::Member(i) => write!(f, "<{}>", i)?,
                PathSegment::Lazy(_) => continue,
            }
            first = false;
        }
        Ok(())
    }
}

/// One leaf of a failure tree with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafFailure<E = String> {
    /// Where the failing value sits in the input.
    pub path: ErrorPath,
    /// The value that was rejected.
    pub actual: Value,
    /// What was expected instead.
    pub expected: E,
    /// Messages of the [`DecodeError::Wrap`] nodes above the leaf, outermost first.
    pub notes: Vec<E>,
}

/// Flattens a failure tree into one record per leaf, in tree order.
///
/// # Example
///
/// ```rust
/// use schemable::{decoder, path::failures};
/// use serde_json::json;
///
/// let users = decoder::struct_(vec![(
///     "users",
///     decoder::array(
///         decoder::struct_(vec![("email", decoder::string().into_value())]).into_value(),
///     )
///         .into_value(),
/// )]);
///
/// let errors = users
///     .decode(&json!({"users": [{"email": 1}]}))
///     .into_result()
///     .unwrap_err();
///
/// let leaves = failures(&errors);
/// assert_eq!(leaves.len(), 1);
/// assert_eq!(leaves[0].path.to_string(), "users[0].email");
/// assert_eq!(leaves[0].expected, "string");
/// ```
pub fn failures<E: Clone>(errors: &DecodeErrors<E>) -> Vec<LeafFailure<E>> {
    let mut out = Vec::new();
    collect(errors, &ErrorPath::root(), &[], &mut out);
    out
}

fn collect<E: Clone>(
    errors: &DecodeErrors<E>,
    path: &ErrorPath,
    notes: &[E],
    out: &mut Vec<LeafFailure<E>>,
) {
    for error in errors.iter() {
        match error {
            DecodeError::Leaf { actual, error } => out.push(LeafFailure {
                path: path.clone(),
                actual: actual.clone(),
                expected: error.clone(),
                notes: notes.to_vec(),
            }),
            DecodeError::Key { key, kind, errors } => {
                collect(errors, &path.push_key(key.as_str(), *kind), notes, out)
            }
            DecodeError::Index { index, kind, errors } => {
                collect(errors, &path.push_index(*index, *kind), notes, out)
            }
            DecodeError::Member { index, errors } => {
                collect(errors, &path.push(PathSegment::Member(*index)), notes, out)
            }
            DecodeError::Lazy { id, errors } => {
                collect(errors, &path.push(PathSegment::Lazy(id.clone())), notes, out)
            }
            DecodeError::Wrap { error, errors } => {
                let mut inner = notes.to_vec();
                inner.push(error.clone());
                collect(errors, path, &inner, out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::free_semigroup::FreeSemigroup;
    use serde_json::json;

    fn leaf(actual: Value, expected: &str) -> DecodeErrors {
        FreeSemigroup::of(DecodeError::leaf(actual, expected))
    }

    #[test]
    fn test_root_path_is_empty() {
        let path = ErrorPath::root();
        assert!(path.is_root());
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_display() {
        let path = ErrorPath::root()
            .push_key("body", Requiredness::Required)
            .push_index(42, Requiredness::Optional)
            .push_key("name", Requiredness::Optional);
        assert_eq!(path.to_string(), "body[42].name");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_display_members_and_hidden_lazy() {
        let path = ErrorPath::root()
            .push(PathSegment::Lazy("Tree".to_string()))
            .push_key("children", Requiredness::Required)
            .push(PathSegment::Member(1))
            .push(PathSegment::Lazy("Tree".to_string()))
            .push_key("value", Requiredness::Required);
        assert_eq!(path.to_string(), "children<1>.value");
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_path_immutability() {
        let base = ErrorPath::root().push_key("users", Requiredness::Required);
        let a = base.push_index(0, Requiredness::Optional);
        let b = base.push_index(1, Requiredness::Optional);

        assert_eq!(base.to_string(), "users");
        assert_eq!(a.to_string(), "users[0]");
        assert_eq!(b.to_string(), "users[1]");
        assert_eq!(b.last(), Some(&PathSegment::Index(1, Requiredness::Optional)));
    }

    #[test]
    fn test_failures_flattens_in_order() {
        let errors = FreeSemigroup::concat(
            FreeSemigroup::of(DecodeError::key(
                "a",
                Requiredness::Required,
                leaf(json!(1), "string"),
            )),
            FreeSemigroup::of(DecodeError::index(
                3,
                Requiredness::Optional,
                leaf(json!("x"), "number"),
            )),
        );

        let leaves = failures(&errors);
        let paths: Vec<_> = leaves.iter().map(|l| l.path.to_string()).collect();
        assert_eq!(paths, vec!["a", "[3]"]);
        assert_eq!(leaves[1].actual, json!("x"));
        assert_eq!(leaves[1].expected, "number");
    }

    #[test]
    fn test_failures_collects_wrap_notes() {
        let errors = FreeSemigroup::of(DecodeError::wrap(
            "bad user",
            FreeSemigroup::of(DecodeError::key(
                "email",
                Requiredness::Required,
                FreeSemigroup::of(DecodeError::wrap("bad email", leaf(json!(null), "string"))),
            )),
        ));

        let leaves = failures(&errors);
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].path.to_string(), "email");
        assert_eq!(leaves[0].notes, vec!["bad user".to_string(), "bad email".to_string()]);
    }

    #[test]
    fn test_failures_at_root() {
        let leaves = failures(&leaf(json!(true), "number"));
        assert!(leaves[0].path.is_root());
        assert!(leaves[0].notes.is_empty());
    }
}
