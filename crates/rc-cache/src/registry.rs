//! Directory of named caches shared by the whole process.
//!
//! The registry is an explicit object created once at startup (see
//! `rc-app`) and shared by reference, not a hidden global.  Caches are
//! registered with a concrete key/value type and retrieved by name with the
//! same types; a lookup with the wrong types is reported, never coerced.
//!
//! Registration takes the write lock; lookups only take the read lock.

use std::any::Any;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{BoundedCache, CacheError, CacheResult, CacheStats};

/// Names of the caches the engine registers at startup.
pub mod names {
    pub const DISTANCE_MATRIX: &str  = "distance-matrix-cache";
    pub const ROUTE_GEOMETRY: &str   = "route-geometry-cache";
    pub const GEOMETRY_MERGER: &str  = "geometry-merge-cache";
    pub const GEOMETRY_BORDER: &str  = "geometry-border-cache";
    pub const SHAPEFILE_GEOMETRY: &str = "shapefile-geometry-cache";
    pub const SHAPEFILE_DATASET: &str  = "shapefile-dataset-cache";
}

/// Type-erased operations every registered cache supports.
trait ErasedCache: Send + Sync {
    fn stats(&self) -> CacheStats;
    fn clear(&self);
}

impl<K, V> ErasedCache for BoundedCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
    fn stats(&self) -> CacheStats {
        BoundedCache::stats(self)
    }

    fn clear(&self) {
        BoundedCache::clear(self)
    }
}

struct Registered {
    typed:  Arc<dyn Any + Send + Sync>,
    erased: Arc<dyn ErasedCache>,
}

/// Named collection of [`BoundedCache`]s.
///
/// Cache names are compared exactly (no case folding), so callers should use
/// the constants in [`names`].
#[derive(Default)]
pub struct CacheRegistry {
    caches: RwLock<FxHashMap<String, Registered>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new cache of `capacity_bytes` under `name`.
    ///
    /// # Errors
    ///
    /// [`CacheError::AlreadyExists`] if `name` is taken.
    pub fn create<K, V>(&self, name: &str, capacity_bytes: usize) -> CacheResult<Arc<BoundedCache<K, V>>>
    where
        K: Eq + Hash + Clone + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let mut caches = self.caches.write();
        if caches.contains_key(name) {
            return Err(CacheError::AlreadyExists(name.to_owned()));
        }
        let cache = Arc::new(BoundedCache::<K, V>::new(name, capacity_bytes));
        caches.insert(
            name.to_owned(),
            Registered {
                typed:  cache.clone(),
                erased: cache.clone(),
            },
        );
        tracing::debug!(cache = name, capacity_bytes, "registered cache");
        Ok(cache)
    }

    /// The cache registered under `name`, if it exists with these types.
    pub fn get<K, V>(&self, name: &str) -> Option<Arc<BoundedCache<K, V>>>
    where
        K: Eq + Hash + Clone + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        self.try_get(name).ok()
    }

    /// Like [`get`](Self::get) but says why a lookup failed.
    pub fn try_get<K, V>(&self, name: &str) -> CacheResult<Arc<BoundedCache<K, V>>>
    where
        K: Eq + Hash + Clone + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let caches = self.caches.read();
        let entry = caches
            .get(name)
            .ok_or_else(|| CacheError::NotFound(name.to_owned()))?;
        Arc::clone(&entry.typed)
            .downcast::<BoundedCache<K, V>>()
            .map_err(|_| CacheError::TypeMismatch(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.caches.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Stats for the cache registered under `name`, regardless of its types.
    pub fn stats(&self, name: &str) -> Option<CacheStats> {
        self.caches.read().get(name).map(|r| r.erased.stats())
    }

    /// Empty every registered cache.  Registrations are kept.
    pub fn clear_all(&self) {
        for r in self.caches.read().values() {
            r.erased.clear();
        }
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("names", &self.names())
            .finish()
    }
}
