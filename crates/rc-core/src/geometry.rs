//! Vector geometry shared by route queries and shapefile lookups.
//!
//! All coordinates use **x = longitude (or easting), y = latitude (or
//! northing)** order.  [`GeoPoint`] stays latitude-first because that is how
//! point tables and the road graph speak; convert with [`Coord::from`].
//!
//! Feature geometry is `geo`'s [`Geometry`]; this module only adds the
//! conversions and size estimates the caches need.

use geo::CoordsIter;

pub use geo::{Coord, Geometry, LineString, MultiPolygon, Point, Polygon};

use crate::GeoPoint;

/// Bytes charged per route vertex when accounting route geometries in a
/// size-bounded cache.  A heuristic, not a measurement.
pub const ROUTE_BYTES_PER_POINT: usize = 40;

impl From<GeoPoint> for Coord {
    fn from(p: GeoPoint) -> Self {
        Coord { x: p.lon, y: p.lat }
    }
}

impl From<Coord> for GeoPoint {
    fn from(c: Coord) -> Self {
        GeoPoint::new(c.y, c.x)
    }
}

/// Total number of vertices, counting each ring's closing vertex.
pub fn vertex_count(geometry: &Geometry) -> usize {
    geometry.coords_count()
}

/// Rough in-memory footprint of a feature geometry, for cache accounting.
pub fn geometry_size_bytes(geometry: &Geometry) -> usize {
    std::mem::size_of::<Geometry>() + vertex_count(geometry) * std::mem::size_of::<Coord>()
}

// ── RouteGeometry ─────────────────────────────────────────────────────────────

/// An ordered path between two points.
///
/// Always holds at least two points.  When nothing better is known the path
/// is the straight line `[from, to]`.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteGeometry {
    points: Vec<GeoPoint>,
}

impl RouteGeometry {
    /// The two-point straight line from `from` to `to`.
    pub fn straight_line(from: GeoPoint, to: GeoPoint) -> Self {
        Self { points: vec![from, to] }
    }

    /// Wrap a path; returns `None` if it has fewer than two points.
    pub fn from_points(points: Vec<GeoPoint>) -> Option<Self> {
        (points.len() >= 2).then_some(Self { points })
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Sum of great-circle segment lengths in metres.
    pub fn length_m(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance_m(w[1])).sum()
    }

    /// Heuristic size for cache accounting: a fixed cost per vertex.
    pub fn estimated_size_bytes(&self) -> usize {
        ROUTE_BYTES_PER_POINT * self.points.len()
    }
}
