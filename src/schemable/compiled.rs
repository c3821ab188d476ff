//! Per-interpreter cache of compiled schemas.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;

/// Type alias for the cache storage map.
type CompiledMap<R> = Arc<RwLock<HashMap<SchemaKey, R>>>;

/// Data that tells two values of one schema type apart.
trait KeyData: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_data(&self, other: &dyn KeyData) -> bool;
    fn hash_data(&self, state: &mut dyn Hasher);
}

impl<D: Hash + Eq + fmt::Debug + Send + Sync + 'static> KeyData for D {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_data(&self, other: &dyn KeyData) -> bool {
        other.as_any().downcast_ref::<D>() == Some(self)
    }

    fn hash_data(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

/// Identity of a schema in the compile cache.
///
/// Two keys are equal when they name the same schema type and carry equal
/// data.
///
/// # Example
///
/// ```rust
/// use schemable::SchemaKey;
///
/// struct Limit(u32);
///
/// assert_eq!(SchemaKey::with::<Limit, _>(3u32), SchemaKey::with::<Limit, _>(3u32));
/// assert_ne!(SchemaKey::with::<Limit, _>(3u32), SchemaKey::with::<Limit, _>(4u32));
/// assert_ne!(SchemaKey::with::<Limit, _>(3u32), SchemaKey::of::<Limit>());
/// ```
#[derive(Clone)]
pub struct SchemaKey {
    schema: TypeId,
    name: &'static str,
    data: Option<Arc<dyn KeyData>>,
}

impl SchemaKey {
    /// Key shared by every value of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            schema: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            data: None,
        }
    }

    /// Key for the value of `T` identified by `data`.
    pub fn with<T, D>(data: D) -> Self
    where
        T: ?Sized + 'static,
        D: Hash + Eq + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            data: Some(Arc::new(data)),
            ..Self::of::<T>()
        }
    }

    /// Returns the schema type's name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for SchemaKey {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema
            && match (&self.data, &other.data) {
                (None, None) => true,
                (Some(a), Some(b)) => a.eq_data(b.as_ref()),
                _ => false,
            }
    }
}

impl Eq for SchemaKey {}

impl Hash for SchemaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.hash(state);
        if let Some(data) = &self.data {
            data.hash_data(state);
        }
    }
}

impl fmt::Debug for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut key = f.debug_struct("SchemaKey");
        key.field("schema", &self.name);
        if let Some(data) = &self.data {
            key.field("data", data);
        }
        key.finish()
    }
}

/// Compiled representations keyed by [`SchemaKey`].
///
/// Clones share the same storage. Building happens outside the lock, so a
/// schema may compile the schemas it is made of while being compiled itself.
pub struct Compiled<R> {
    entries: CompiledMap<R>,
}

impl<R: Clone> Compiled<R> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the cached representation for `key`.
    pub fn get(&self, key: &SchemaKey) -> Option<R> {
        self.entries.read().get(key).cloned()
    }

    /// Stores `built` under `key` unless an entry is already there, and
    /// returns whichever entry ends up cached.
    pub fn insert(&self, key: SchemaKey, built: R) -> R {
        self.entries.write().entry(key).or_insert(built).clone()
    }

    /// Returns the number of compiled schemas.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been compiled.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<R: Clone> Default for Compiled<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for Compiled<R> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<R> fmt::Debug for Compiled<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiled")
            .field("len", &self.entries.read().len())
            .finish()
    }
}
