//! Byte-size-bounded least-recently-used cache.
//!
//! # Data layout
//!
//! ```text
//! map:   K -> Entry { value: Arc<V>, size, stamp }
//! order: stamp -> K        (BTreeMap, ascending = least recently used first)
//! ```
//!
//! Every access takes a fresh stamp from a monotonically increasing clock, so
//! the first key in `order` is always the eviction victim.  All operations
//! are O(log n) under a single `parking_lot::Mutex`.
//!
//! # Size invariant
//!
//! `size_bytes() <= capacity_bytes()` holds after every operation.  An entry
//! whose own size exceeds the capacity is rejected without touching the
//! existing contents.

use std::collections::BTreeMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

// ── Stats ─────────────────────────────────────────────────────────────────────

/// Point-in-time counters for one cache.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits:           u64,
    pub misses:         u64,
    pub inserts:        u64,
    pub evictions:      u64,
    /// Inserts refused because the entry alone exceeded the capacity.
    pub rejected:       u64,
    pub entries:        usize,
    pub size_bytes:     usize,
    pub capacity_bytes: usize,
}

// ── Internal state ────────────────────────────────────────────────────────────

struct Entry<V> {
    value: Arc<V>,
    size:  usize,
    stamp: u64,
}

struct LruState<K, V> {
    map:   FxHashMap<K, Entry<V>>,
    order: BTreeMap<u64, K>,
    clock: u64,
    total: usize,
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> LruState<K, V> {
    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn remove(&mut self, key: &K) -> Option<Entry<V>> {
        let entry = self.map.remove(key)?;
        self.order.remove(&entry.stamp);
        self.total -= entry.size;
        Some(entry)
    }

    /// Drop the least recently used entry.  Returns `false` if empty.
    fn evict_one(&mut self) -> bool {
        let Some((_, key)) = self.order.pop_first() else {
            return false;
        };
        if let Some(entry) = self.map.remove(&key) {
            self.total -= entry.size;
            self.stats.evictions += 1;
        }
        true
    }
}

// ── BoundedCache ──────────────────────────────────────────────────────────────

/// Thread-safe LRU cache bounded by the sum of caller-estimated entry sizes.
///
/// # Example
///
/// ```
/// use rc_cache::BoundedCache;
///
/// let cache: BoundedCache<&str, u32> = BoundedCache::new("example", 100);
/// cache.put("a", 1, 60);
/// cache.put("b", 2, 60); // evicts "a"
/// assert!(cache.get(&"a").is_none());
/// assert_eq!(*cache.get(&"b").unwrap(), 2);
/// ```
pub struct BoundedCache<K, V> {
    name:           String,
    capacity_bytes: usize,
    state:          Mutex<LruState<K, V>>,
}

impl<K: Eq + Hash + Clone, V> BoundedCache<K, V> {
    pub fn new(name: impl Into<String>, capacity_bytes: usize) -> Self {
        Self {
            name: name.into(),
            capacity_bytes,
            state: Mutex::new(LruState {
                map:   FxHashMap::default(),
                order: BTreeMap::new(),
                clock: 0,
                total: 0,
                stats: CacheStats::default(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    /// Look up `key`, promoting it to most recently used on a hit.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut st = self.state.lock();
        let stamp = st.next_stamp();
        let Some(entry) = st.map.get_mut(key) else {
            st.stats.misses += 1;
            return None;
        };
        let old = std::mem::replace(&mut entry.stamp, stamp);
        let value = Arc::clone(&entry.value);
        if let Some(k) = st.order.remove(&old) {
            st.order.insert(stamp, k);
        }
        st.stats.hits += 1;
        Some(value)
    }

    /// `true` if `key` is cached.  Does not affect recency.
    pub fn contains(&self, key: &K) -> bool {
        self.state.lock().map.contains_key(key)
    }

    /// Insert `value` under `key`, charging `size_bytes` against capacity.
    ///
    /// Least recently used entries are evicted until the new entry fits.  An
    /// existing entry for `key` is replaced.  Returns `false` (and changes
    /// nothing) if `size_bytes` alone exceeds the capacity.
    pub fn put(&self, key: K, value: V, size_bytes: usize) -> bool {
        self.put_shared(key, Arc::new(value), size_bytes)
    }

    /// Like [`put`](Self::put) for a value that is already shared.
    pub fn put_shared(&self, key: K, value: Arc<V>, size_bytes: usize) -> bool {
        let mut st = self.state.lock();
        if size_bytes > self.capacity_bytes {
            st.stats.rejected += 1;
            tracing::warn!(
                cache = %self.name,
                size_bytes,
                capacity_bytes = self.capacity_bytes,
                "entry larger than cache capacity; not cached"
            );
            return false;
        }

        st.remove(&key);

        let before = st.stats.evictions;
        while st.total + size_bytes > self.capacity_bytes {
            if !st.evict_one() {
                break;
            }
        }
        let evicted = st.stats.evictions - before;
        if evicted > 0 {
            tracing::debug!(cache = %self.name, evicted, "evicted least recently used entries");
        }

        let stamp = st.next_stamp();
        st.order.insert(stamp, key.clone());
        st.map.insert(key, Entry { value, size: size_bytes, stamp });
        st.total += size_bytes;
        st.stats.inserts += 1;
        debug_assert!(st.total <= self.capacity_bytes);
        true
    }

    /// Remove `key`, returning its value if it was cached.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.state.lock().remove(key).map(|e| e.value)
    }

    pub fn clear(&self) {
        let mut st = self.state.lock();
        st.map.clear();
        st.order.clear();
        st.total = 0;
    }

    pub fn len(&self) -> usize {
        self.state.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the sizes of all live entries.
    pub fn size_bytes(&self) -> usize {
        self.state.lock().total
    }

    pub fn stats(&self) -> CacheStats {
        let st = self.state.lock();
        CacheStats {
            entries:        st.map.len(),
            size_bytes:     st.total,
            capacity_bytes: self.capacity_bytes,
            ..st.stats
        }
    }
}

impl<K, V> std::fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("name", &self.name)
            .field("capacity_bytes", &self.capacity_bytes)
            .finish_non_exhaustive()
    }
}
