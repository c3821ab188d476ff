//! Traits for interpreter polymorphism.
//!
//! A [`Schema`] describes a shape once, against the [`Schemable`] interface.
//! Each interpreter decides what a shape becomes: a decoder, a guard, an
//! encoder. Operations that not every interpreter can support live in the
//! capability traits, and a schema that needs one simply adds it to its
//! bound.

use serde_json::Value;

use super::{Compiled, SchemaKey};

/// A shape description, interpretable by any `S` that offers what it uses.
///
/// Implement this generically over the interpreter:
///
/// ```rust
/// use schemable::{DecoderInterpreter, GuardInterpreter, Schema, Schemable};
/// use serde_json::json;
///
/// struct Point;
///
/// impl<S: Schemable> Schema<S> for Point {
///     fn interpret(&self, s: &S) -> S::Repr {
///         s.struct_(vec![("x", s.number()), ("y", s.number())])
///     }
/// }
///
/// let decoder = DecoderInterpreter::new().make(&Point);
/// let guard = GuardInterpreter::new().make(&Point);
///
/// let input = json!({"x": 1, "y": 2});
/// assert!(decoder.decode(&input).is_success());
/// assert!(guard.is(&input));
/// ```
///
/// A schema that carries data, so that two of its values describe different
/// shapes, is interpreted afresh on every [`Schemable::make`] unless it says
/// how its values are told apart:
///
/// ```rust
/// use schemable::{DecoderInterpreter, Schema, SchemaKey, Schemable};
/// use serde_json::json;
///
/// struct Code(&'static str);
///
/// impl<S: Schemable> Schema<S> for Code {
///     fn interpret(&self, s: &S) -> S::Repr {
///         s.literal([self.0])
///     }
///
///     fn key(&self) -> Option<SchemaKey> {
///         Some(SchemaKey::with::<Self, _>(self.0))
///     }
/// }
///
/// let interpreter = DecoderInterpreter::new();
/// assert!(interpreter.make(&Code("a")).decode(&json!("a")).is_success());
/// assert!(interpreter.make(&Code("b")).decode(&json!("b")).is_success());
/// assert_eq!(interpreter.compiled().len(), 2);
/// ```
pub trait Schema<S: Schemable>: 'static {
    /// Builds this shape with the interpreter `s`.
    fn interpret(&self, s: &S) -> S::Repr;

    /// The identity [`Schemable::make`] caches this schema under, or `None`
    /// to interpret it on every call.
    ///
    /// Zero-sized schemas are keyed by their type. Any other schema is not
    /// cached unless it overrides this.
    fn key(&self) -> Option<SchemaKey> {
        if std::mem::size_of_val(self) == 0 {
            Some(SchemaKey::of::<Self>())
        } else {
            None
        }
    }
}

/// The operations every interpreter supports.
///
/// Interpreters are cheap to clone; clones share their lazy registry and
/// their compile cache.
pub trait Schemable: Clone + Send + Sync + Sized + 'static {
    /// What a shape becomes under this interpreter.
    type Repr: Clone + Send + Sync + 'static;

    /// Exactly one of `values`.
    fn literal<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Self::Repr;

    /// Any string.
    fn string(&self) -> Self::Repr;

    /// Any number.
    fn number(&self) -> Self::Repr;

    /// Any boolean.
    fn boolean(&self) -> Self::Repr;

    /// `null` or `or`.
    fn nullable(&self, or: Self::Repr) -> Self::Repr;

    /// An object with the given required properties.
    fn struct_<K: Into<String>>(
        &self,
        props: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr;

    /// An object with the given optional properties.
    ///
    /// A property present as `null` counts as absent.
    fn partial<K: Into<String>>(
        &self,
        props: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr;

    /// An object whose every value is `codomain`.
    fn record(&self, codomain: Self::Repr) -> Self::Repr;

    /// An array whose every element is `item`.
    fn array(&self, item: Self::Repr) -> Self::Repr;

    /// A fixed-length array.
    fn tuple(&self, components: Vec<Self::Repr>) -> Self::Repr;

    /// Both shapes at once.
    fn intersect(&self, left: Self::Repr, right: Self::Repr) -> Self::Repr;

    /// A tagged union keyed by the `tag` property.
    fn sum<K: Into<String>>(
        &self,
        tag: &str,
        members: impl IntoIterator<Item = (K, Self::Repr)>,
    ) -> Self::Repr;

    /// A named recursive shape.
    ///
    /// `f` runs at most once per interpreter (and its clones), the first time
    /// the result is used. Calling `lazy` again from the same place with the
    /// same `id`, which is what `f` does when the shape refers to itself,
    /// returns a handle to the same definition. Another `lazy` call using the
    /// same `id` gets a definition of its own; `id` labels failures.
    fn lazy<F>(&self, id: &str, f: F) -> Self::Repr
    where
        F: Fn(&Self) -> Self::Repr + Send + Sync + 'static;

    /// The compile cache used by [`Schemable::make`].
    fn compiled(&self) -> &Compiled<Self::Repr>;

    /// Interprets `schema`, reusing the result of any earlier call for the
    /// same schema on this interpreter.
    ///
    /// Schemas are matched by [`Schema::key`]. A schema without a key is
    /// interpreted on every call. A schema that refers to itself must do so
    /// through [`Schemable::lazy`]; `make` does not guard against unbounded
    /// recursion.
    fn make<Sc: Schema<Self>>(&self, schema: &Sc) -> Self::Repr {
        let key = match schema.key() {
            Some(key) => key,
            None => {
                tracing::trace!(
                    schema = std::any::type_name::<Sc>(),
                    "interpreting uncached schema"
                );
                return schema.interpret(self);
            }
        };
        if let Some(hit) = self.compiled().get(&key) {
            return hit;
        }
        tracing::debug!(schema = key.name(), "compiling schema");
        let built = schema.interpret(self);
        self.compiled().insert(key, built)
    }
}

/// Containers whose contents are not inspected.
pub trait WithUnknownContainers: Schemable {
    /// Any array.
    fn unknown_array(&self) -> Self::Repr;

    /// Any object.
    fn unknown_record(&self) -> Self::Repr;
}

/// Untagged unions.
///
/// An encoder cannot tell which member produced a value, so the encoder
/// interpreter does not offer this.
pub trait WithUnion: Schemable {
    /// The first member that matches.
    fn union(&self, members: Vec<Self::Repr>) -> Self::Repr;
}

/// Post-checks on an already matching value.
pub trait WithRefine: Schemable {
    /// `from`, restricted to inputs passing `predicate`; `id` names the
    /// refined shape in failure messages.
    ///
    /// `predicate` sees the input exactly as given, before `from` reshapes
    /// it, so every interpreter accepts the same inputs.
    fn refine<P>(&self, from: Self::Repr, predicate: P, id: &str) -> Self::Repr
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static;
}
