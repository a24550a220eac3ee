//! `rc-cache` — size-bounded LRU caches and the cache registry.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`bounded`]  | `BoundedCache<K, V>`, `CacheStats`                        |
//! | [`registry`] | `CacheRegistry`, well-known cache names                   |
//! | [`error`]    | `CacheError`, `CacheResult<T>`                            |
//!
//! Caches account for **estimated byte sizes** supplied by the caller, not
//! entry counts.  Values are stored behind `Arc` so a hit hands out a cheap
//! shared reference and cached values are never mutated after insertion.

pub mod bounded;
pub mod error;
pub mod registry;


pub use bounded::{BoundedCache, CacheStats};
pub use error::{CacheError, CacheResult};
pub use registry::{CacheRegistry, names};

/// One mebibyte, for writing capacities.
pub const MB: usize = 1024 * 1024;
