//! `rc-distance` — cost matrices and route geometries over located points.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`config`]       | `DistanceConfiguration`, `DistanceMethod`, `OutputConfig`  |
//! | [`points`]       | `PointSet`, `LocatedPoint`, point-table tags               |
//! | [`matrix`]       | `CostMatrix`, `Channel`                                    |
//! | [`output`]       | unit conversion and cost derivation                        |
//! | [`great_circle`] | straight-line matrices                                     |
//! | [`key`]          | `MatrixKey`, `RouteKey`                                    |
//! | [`engine`]       | `DistanceEngine`                                           |
//! | [`error`]        | `DistanceError`, `DistanceResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on configuration.     |
//! | `parallel` | Road-network matrix rows run across Rayon workers.      |

pub mod config;
pub mod engine;
pub mod error;
pub mod great_circle;
pub mod key;
pub mod matrix;
pub mod output;
pub mod points;


pub use config::{
    DistanceConfiguration, DistanceMethod, GreatCircleConfig, OutputConfig, RoadNetworkConfig,
};
pub use engine::{DistanceEngine, MatrixCache, RouteCache};
pub use error::{DistanceError, DistanceResult};
pub use key::{MatrixKey, RouteKey};
pub use matrix::{Channel, CostMatrix};
pub use output::CellValues;
pub use points::{LocatedPoint, PointSet};
