//! Registry of named lazy definitions.
//!
//! This module provides [`Registry`], which owns the memoized thunks behind
//! recursive decoders, guards, encoders and codecs. A lazy node does not
//! capture mutable state of its own; it holds a handle ([`Definition`]) into
//! the registry of whoever assembles the schema graph.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;

/// A definition's identity: its id plus the type of the thunk that built it.
///
/// Every closure has its own type, so two `lazy` calls in different places
/// get different definitions even when they share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DefinitionKey {
    id: String,
    site: TypeId,
}

/// Type alias for the definition storage map.
type DefinitionMap<R> = Arc<RwLock<IndexMap<DefinitionKey, Arc<Definition<R>>>>>;

/// Type alias for the thunk stored in a definition.
type Thunk<R> = Box<dyn Fn() -> R + Send + Sync>;

/// A named, lazily built value.
///
/// The thunk runs at most once, on the first call to [`Definition::force`].
pub struct Definition<R> {
    id: String,
    thunk: Thunk<R>,
    resolved: OnceCell<R>,
}

impl<R> Definition<R> {
    /// Returns the identifier this definition was registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true once the thunk has run.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Returns the built value, running the thunk on first use.
    pub fn force(&self) -> &R {
        self.resolved.get_or_init(|| {
            tracing::debug!(id = %self.id, "resolving lazy definition");
            (self.thunk)()
        })
    }
}

impl<R> fmt::Debug for Definition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("id", &self.id)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// A thread-safe registry of lazy definitions.
///
/// A definition belongs to one call site: it is keyed by its id together
/// with the type of its thunk. Defining the same id again from the same
/// place returns the existing handle without touching its thunk, which is
/// what lets a recursive definition refer to itself: the inner reference
/// resolves to the same handle as the outer one, so the thunk runs once no
/// matter how deep the decoded input is.
///
/// The same id used from a different place gets a separate definition, and
/// a warning is logged. A thunk that captures data distinguishing one use
/// from another (a parameter of the shape) must put that data in the id.
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use schemable::{decoder, Decoder, Registry};
/// use serde_json::{json, Value};
///
/// fn list(registry: &Registry<Decoder<Value, Value>>) -> Decoder<Value, Value> {
///     let inner = registry.clone();
///     decoder::lazy(registry, "List", move || {
///         decoder::struct_(vec![
///             ("head", decoder::number().into_value()),
///             ("tail", decoder::nullable(list(&inner)).map(|t| t.unwrap_or(Value::Null))),
///         ])
///         .into_value()
///     })
/// }
///
/// let registry = Registry::new();
/// let decoder = list(&registry);
///
/// let input = json!({"head": 1, "tail": {"head": 2, "tail": null}});
/// assert!(decoder.decode(&input).is_success());
/// assert_eq!(registry.ids(), vec!["List".to_string()]);
/// ```
pub struct Registry<R> {
    definitions: DefinitionMap<R>,
}

impl<R> Registry<R> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            definitions: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Registers `thunk` under `id`, or returns the definition this call
    /// site registered earlier.
    pub fn define<F>(&self, id: impl Into<String>, thunk: F) -> Arc<Definition<R>>
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        let key = DefinitionKey {
            id: id.into(),
            site: TypeId::of::<F>(),
        };
        if let Some(existing) = self.definitions.read().get(&key) {
            tracing::trace!(id = %key.id, "reusing lazy definition");
            return Arc::clone(existing);
        }

        let mut definitions = self.definitions.write();
        if let Some(existing) = definitions.get(&key) {
            return Arc::clone(existing);
        }
        if definitions.keys().any(|other| other.id == key.id) {
            tracing::warn!(id = %key.id, "lazy id defined at more than one call site");
        }
        tracing::debug!(id = %key.id, "registering lazy definition");
        let definition = Arc::new(Definition {
            id: key.id.clone(),
            thunk: Box::new(thunk),
            resolved: OnceCell::new(),
        });
        definitions.insert(key, Arc::clone(&definition));
        definition
    }

    /// Returns the first definition registered under `id`.
    pub fn get(&self, id: &str) -> Option<Arc<Definition<R>>> {
        self.definitions
            .read()
            .iter()
            .find(|(key, _)| key.id == id)
            .map(|(_, definition)| Arc::clone(definition))
    }

    /// Returns every definition registered under `id`, oldest first.
    ///
    /// More than one means several call sites share the id.
    pub fn definitions(&self, id: &str) -> Vec<Arc<Definition<R>>> {
        self.definitions
            .read()
            .iter()
            .filter(|(key, _)| key.id == id)
            .map(|(_, definition)| Arc::clone(definition))
            .collect()
    }

    /// Returns true if `id` has been defined.
    pub fn contains(&self, id: &str) -> bool {
        self.definitions.read().keys().any(|key| key.id == id)
    }

    /// Returns all defined ids, sorted and without repeats.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .definitions
            .read()
            .keys()
            .map(|key| key.id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.read().len()
    }

    /// Returns true if nothing has been defined.
    pub fn is_empty(&self) -> bool {
        self.definitions.read().is_empty()
    }
}

impl<R> Default for Registry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for Registry<R> {
    fn clone(&self) -> Self {
        Self {
            definitions: Arc::clone(&self.definitions),
        }
    }
}

impl<R> fmt::Debug for Registry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("ids", &self.ids()).finish()
    }
}
