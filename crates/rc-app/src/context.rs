//! The application context: every long-lived engine object, created once
//! and passed around explicitly.

use std::sync::atomic::{AtomicBool, Ordering};

use rc_cache::CacheRegistry;
use rc_crs::{CoordinateSystemRegistry, ShapefileImporter};
use rc_distance::DistanceEngine;
use rc_network::GraphLoader;

use crate::CachePolicy;

/// Owns the cache registry, the distance engine and the coordinate-system
/// registry.  Build one with [`crate::AppContextBuilder`].
pub struct AppContext<L: GraphLoader, I: ShapefileImporter> {
    policy:   CachePolicy,
    caches:   CacheRegistry,
    distance: DistanceEngine<L>,
    crs:      CoordinateSystemRegistry<I>,
    disposed: AtomicBool,
}

impl<L: GraphLoader, I: ShapefileImporter> AppContext<L, I> {
    pub(crate) fn new(
        policy:   CachePolicy,
        caches:   CacheRegistry,
        distance: DistanceEngine<L>,
        crs:      CoordinateSystemRegistry<I>,
    ) -> Self {
        Self { policy, caches, distance, crs, disposed: AtomicBool::new(false) }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn caches(&self) -> &CacheRegistry {
        &self.caches
    }

    pub fn distance(&self) -> &DistanceEngine<L> {
        &self.distance
    }

    pub fn crs(&self) -> &CoordinateSystemRegistry<I> {
        &self.crs
    }

    /// Release the loaded road graph and empty every cache.
    ///
    /// Only the first call does anything; it returns `true`.  Later calls
    /// return `false`.
    pub fn dispose(&self) -> bool {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.distance.dispose();
        self.caches.clear_all();
        tracing::info!("application context disposed");
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl<L: GraphLoader, I: ShapefileImporter> Drop for AppContext<L, I> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<L: GraphLoader, I: ShapefileImporter> std::fmt::Debug for AppContext<L, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("policy", &self.policy)
            .field("caches", &self.caches)
            .field("distance", &self.distance)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
