//! `rc-crs` — coordinate systems and cached shapefile lookups.
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`system`]    | `CoordinateSystem`: WGS84, Web Mercator, UTM zones     |
//! | [`transform`] | `CoordinateTransform` for coordinates and geometries   |
//! | [`shapefile`] | `ShapefileLink`, the `ShapefileImporter` boundary      |
//! | [`registry`]  | `CoordinateSystemRegistry` with its two caches         |
//! | [`error`]     | `CrsError`, `CrsResult<T>`                             |
//!
//! Shapefile parsing is supplied by the caller through [`ShapefileImporter`].

pub mod error;
pub mod registry;
pub mod shapefile;
pub mod system;
pub mod transform;

#[cfg(test)]
mod tests;

pub use error::{CrsError, CrsResult};
pub use registry::{AxisOrder, CoordinateSystemRegistry, CrsHub, DatasetCache, GeometryCache};
pub use shapefile::{NoShapefileSupport, ShapefileImporter, ShapefileLink};
pub use system::CoordinateSystem;
pub use transform::CoordinateTransform;
