//! `rc-app` — the explicit application context for the routecost engine.
//!
//! Everything that lives for the whole process (the cache registry, the
//! distance engine with its loaded road graph, and the coordinate-system
//! registry) is created once by [`AppContextBuilder`] and handed around by
//! reference.  There are no hidden globals.
//!
//! # Caches created at startup
//!
//! | Name (see `rc_cache::names`) | Key → value                 | Default |
//! |------------------------------|-----------------------------|---------|
//! | `DISTANCE_MATRIX`            | `MatrixKey` → `CostMatrix`  | 128 MB  |
//! | `ROUTE_GEOMETRY`             | `RouteKey` → `RouteGeometry`| 64 MB   |
//! | `GEOMETRY_MERGER`            | `String` → `Geometry`       | 64 MB   |
//! | `GEOMETRY_BORDER`            | `String` → `Geometry`       | 64 MB   |
//! | `SHAPEFILE_GEOMETRY`         | `ShapefileLink` → `Geometry`| 256 MB  |
//! | `SHAPEFILE_DATASET`          | `PathBuf` → `Dataset`       | 512 MB  |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Road-network matrix rows run on Rayon's thread pool.   |

pub mod builder;
pub mod context;
pub mod error;
pub mod policy;
pub mod status;

#[cfg(test)]
mod tests;

pub use builder::AppContextBuilder;
pub use context::AppContext;
pub use error::{AppError, AppResult};
pub use policy::CachePolicy;
pub use status::LoggingContext;
