//! `rc-core` — foundational types for the `routecost` distance engine.
//!
//! This crate is a dependency of every other `rc-*` crate.  It intentionally
//! has no `rc-*` dependencies and minimal external ones (`csv`, `geo` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`geo`]       | `GeoPoint`, haversine great-circle distance             |
//! | [`geometry`]  | `geo` re-exports, `RouteGeometry`, size estimates       |
//! | [`units`]     | `DistanceUnit`, `TimeUnit`, `OutputType`                |
//! | [`value`]     | `Value` — a single table cell                           |
//! | [`table`]     | `Table`, `Dataset`, `TableSource`, tag resolution       |
//! | [`strings`]   | id standardisation                                      |
//! | [`context`]   | `ProcessingContext` (cancellation + status messages)    |
//! | [`error`]     | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to points and unit enums.   |

pub mod context;
pub mod error;
pub mod geo;
pub mod geometry;
pub mod strings;
pub mod table;
pub mod units;
pub mod value;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use context::{CancelFlag, NoopContext, PrefixedContext, ProcessingContext};
pub use error::{CoreError, CoreResult};
pub use self::geo::GeoPoint;
pub use geometry::{
    Coord, Geometry, LineString, MultiPolygon, Point, Polygon, RouteGeometry, geometry_size_bytes,
    vertex_count,
};
pub use strings::standardise;
pub use table::{Column, ColumnKind, Dataset, Table, TableSource};
pub use units::{DistanceUnit, OutputType, TimeUnit};
pub use value::Value;
