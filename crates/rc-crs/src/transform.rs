use geo::MapCoords;

use rc_core::{Coord, Geometry};

use crate::CoordinateSystem;

/// Conversion from one coordinate system to another through WGS84.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoordinateTransform {
    source: CoordinateSystem,
    target: CoordinateSystem,
}

impl CoordinateTransform {
    pub fn new(source: CoordinateSystem, target: CoordinateSystem) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> CoordinateSystem {
        self.source
    }

    pub fn target(&self) -> CoordinateSystem {
        self.target
    }

    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }

    /// The transform running the other way.
    pub fn inverse(&self) -> Self {
        Self { source: self.target, target: self.source }
    }

    #[inline]
    pub fn apply(&self, c: Coord) -> Coord {
        if self.is_identity() {
            return c;
        }
        self.target.from_wgs84(self.source.to_wgs84(c))
    }

    /// Transform every vertex of `geometry`.
    pub fn apply_geometry(&self, geometry: &Geometry) -> Geometry {
        if self.is_identity() {
            return geometry.clone();
        }
        geometry.map_coords(|c| self.apply(c))
    }
}
