//! `rc-network` — road graph, spatial snapping, routing, and the backend
//! traits the distance engine drives.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`graph`]     | `RoadGraph` / `GraphLoader` traits, `MatrixResult`        |
//! | [`network`]   | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`        |
//! | [`router`]    | Dijkstra: `shortest_path`, `shortest_path_tree`, `Route`  |
//! | [`csv_graph`] | `CsvGraphLoader`, `CsvRoadGraph`                          |
//! | [`ids`]       | `NodeId`, `EdgeId`                                        |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Computes matrix rows across Rayon workers.              |

pub mod csv_graph;
pub mod error;
pub mod graph;
pub mod ids;
pub mod network;
pub mod router;


pub use csv_graph::{CsvGraphLoader, CsvRoadGraph};
pub use error::{SpatialError, SpatialResult};
pub use graph::{GraphLoader, MatrixResult, PairCost, RoadGraph};
pub use ids::{EdgeId, NodeId};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{Route, ShortestPathTree, shortest_path, shortest_path_tree};
