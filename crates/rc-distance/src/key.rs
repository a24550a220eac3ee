//! Cache keys.
//!
//! A key owns its own copy of the configuration, taken when the key is
//! built.  Later changes to the caller's configuration cannot reach a key
//! that is already in a cache.

use std::hash::{DefaultHasher, Hash, Hasher};

use rc_core::GeoPoint;

use crate::config::DistanceConfiguration;
use crate::points::PointSet;

/// Key of the distance-matrix cache.  The hash is computed once at
/// construction since point sets can be large.
#[derive(Clone, Debug)]
pub struct MatrixKey {
    config: DistanceConfiguration,
    points: PointSet,
    hash:   u64,
}

impl MatrixKey {
    pub fn new(config: &DistanceConfiguration, points: &PointSet) -> Self {
        let config = config.clone();
        let points = points.clone();
        let mut h = DefaultHasher::new();
        config.hash(&mut h);
        points.hash(&mut h);
        Self { config, points, hash: h.finish() }
    }

    pub fn config(&self) -> &DistanceConfiguration {
        &self.config
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }
}

impl PartialEq for MatrixKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.config == other.config && self.points == other.points
    }
}

impl Eq for MatrixKey {}

impl Hash for MatrixKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// Key of the route-geometry cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteKey {
    config: DistanceConfiguration,
    from:   GeoPoint,
    to:     GeoPoint,
}

impl RouteKey {
    pub fn new(config: &DistanceConfiguration, from: GeoPoint, to: GeoPoint) -> Self {
        Self {
            config: config.clone(),
            from:   from.normalized(),
            to:     to.normalized(),
        }
    }
}
