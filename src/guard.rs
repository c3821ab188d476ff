//! Guards: boolean membership tests.
//!
//! A [`Guard`] answers the same question a decoder does (is this input
//! acceptable?) without building a value or an error tree. Every combinator
//! short-circuits on the first rejection. For any shape, the guard and the
//! decoder built from the same combinators accept exactly the same inputs.
//!
//! # Example
//!
//! ```rust
//! use schemable::guard;
//! use serde_json::json;
//!
//! let person = guard::struct_(vec![
//!     ("name", guard::string()),
//!     ("tags", guard::array(guard::string())),
//! ]);
//!
//! assert!(person.is(&json!({"name": "Ada", "tags": ["math"]})));
//! assert!(!person.is(&json!({"name": "Ada"})));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::decoder::NULL;
use crate::registry::Registry;

/// Type alias for the predicate stored in a [`Guard`].
pub(crate) type GuardFn<I> = Arc<dyn Fn(&I) -> bool + Send + Sync>;

/// A reusable membership test over `I`.
pub struct Guard<I> {
    test: GuardFn<I>,
}

impl<I> Clone for Guard<I> {
    fn clone(&self) -> Self {
        Self {
            test: Arc::clone(&self.test),
        }
    }
}

impl<I> fmt::Debug for Guard<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

impl<I: 'static> Guard<I> {
    /// Creates a guard from a predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&I) -> bool + Send + Sync + 'static,
    {
        Self { test: Arc::new(f) }
    }

    /// Tests the input.
    pub fn is(&self, input: &I) -> bool {
        (self.test)(input)
    }

    /// Adds a predicate that runs only after this guard accepts.
    pub fn refine(self, predicate: impl Fn(&I) -> bool + Send + Sync + 'static) -> Self {
        Guard::new(move |input| self.is(input) && predicate(input))
    }

    /// Accepts what either guard accepts, trying `self` first.
    pub fn alt(self, that: Guard<I>) -> Self {
        Guard::new(move |input| self.is(input) || that.is(input))
    }
}

/// Accepts every value.
pub fn unknown() -> Guard<Value> {
    Guard::new(|_: &Value| true)
}

/// Accepts strings.
pub fn string() -> Guard<Value> {
    Guard::new(Value::is_string)
}

/// Accepts numbers.
pub fn number() -> Guard<Value> {
    Guard::new(Value::is_number)
}

/// Accepts booleans.
pub fn boolean() -> Guard<Value> {
    Guard::new(Value::is_boolean)
}

/// Accepts any array.
pub fn unknown_array() -> Guard<Value> {
    Guard::new(Value::is_array)
}

/// Accepts any object.
pub fn unknown_record() -> Guard<Value> {
    Guard::new(Value::is_object)
}

/// Accepts exactly one of the given values.
pub fn literal<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Guard<Value> {
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    Guard::new(move |input: &Value| values.contains(input))
}

/// Accepts strings matching `regex`.
pub fn pattern(regex: Regex) -> Guard<Value> {
    Guard::new(move |input: &Value| input.as_str().is_some_and(|s| regex.is_match(s)))
}

/// Accepts `null` or whatever `or` accepts.
pub fn nullable(or: Guard<Value>) -> Guard<Value> {
    Guard::new(move |input: &Value| input.is_null() || or.is(input))
}

fn collect_props<K: Into<String>>(
    props: impl IntoIterator<Item = (K, Guard<Value>)>,
) -> Vec<(String, Guard<Value>)> {
    props.into_iter().map(|(k, g)| (k.into(), g)).collect()
}

/// Accepts objects whose declared properties all pass; a missing property is
/// tested as `null`.
pub fn struct_<K: Into<String>>(
    props: impl IntoIterator<Item = (K, Guard<Value>)>,
) -> Guard<Value> {
    let props = collect_props(props);
    Guard::new(move |input: &Value| match input.as_object() {
        Some(fields) => props
            .iter()
            .all(|(k, g)| g.is(fields.get(k).unwrap_or(&NULL))),
        None => false,
    })
}

/// Accepts objects whose present, non-null declared properties pass.
///
/// A property present as `null` counts as absent, matching
/// [`decoder::partial`](crate::decoder::partial).
pub fn partial<K: Into<String>>(
    props: impl IntoIterator<Item = (K, Guard<Value>)>,
) -> Guard<Value> {
    let props = collect_props(props);
    Guard::new(move |input: &Value| match input.as_object() {
        Some(fields) => props.iter().all(|(k, g)| match fields.get(k) {
            None | Some(Value::Null) => true,
            Some(raw) => g.is(raw),
        }),
        None => false,
    })
}

/// Accepts objects whose every value passes `codomain`.
pub fn record(codomain: Guard<Value>) -> Guard<Value> {
    Guard::new(move |input: &Value| match input.as_object() {
        Some(fields) => fields.values().all(|v| codomain.is(v)),
        None => false,
    })
}

/// Accepts arrays whose every element passes `item`.
pub fn array(item: Guard<Value>) -> Guard<Value> {
    Guard::new(move |input: &Value| match input.as_array() {
        Some(items) => items.iter().all(|v| item.is(v)),
        None => false,
    })
}

/// Accepts arrays no longer than `components` whose positions all pass; a
/// missing trailing position is tested as `null`.
pub fn tuple(components: Vec<Guard<Value>>) -> Guard<Value> {
    Guard::new(move |input: &Value| match input.as_array() {
        Some(items) => {
            items.len() <= components.len()
                && components
                    .iter()
                    .enumerate()
                    .all(|(i, g)| g.is(items.get(i).unwrap_or(&NULL)))
        }
        None => false,
    })
}

/// Accepts what any member accepts.
pub fn union(members: Vec<Guard<Value>>) -> Guard<Value> {
    Guard::new(move |input: &Value| members.iter().any(|g| g.is(input)))
}

/// Accepts what both guards accept.
pub fn intersect(left: Guard<Value>, right: Guard<Value>) -> Guard<Value> {
    Guard::new(move |input: &Value| left.is(input) && right.is(input))
}

/// Accepts objects whose `tag` property names a member that accepts them.
pub fn sum<K: Into<String>>(
    tag: impl Into<String>,
    members: impl IntoIterator<Item = (K, Guard<Value>)>,
) -> Guard<Value> {
    let tag = tag.into();
    let members: IndexMap<String, Guard<Value>> =
        members.into_iter().map(|(k, g)| (k.into(), g)).collect();
    Guard::new(move |input: &Value| {
        input
            .get(&tag)
            .and_then(Value::as_str)
            .and_then(|t| members.get(t))
            .is_some_and(|g| g.is(input))
    })
}

/// A recursive guard resolved through `registry`.
///
/// Memoization follows [`decoder::lazy`](crate::decoder::lazy): one thunk run
/// per registry entry.
pub fn lazy<I: 'static>(
    registry: &Registry<Guard<I>>,
    id: impl Into<String>,
    thunk: impl Fn() -> Guard<I> + Send + Sync + 'static,
) -> Guard<I> {
    let definition = registry.define(id, thunk);
    Guard::new(move |input: &I| definition.force().is(input))
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Guard<Value>>();
    assert_sync::<Guard<Value>>();
};
