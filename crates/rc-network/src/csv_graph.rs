//! CSV graph directories.
//!
//! # Directory format
//!
//! ```text
//! <dir>/nodes.csv   id,lat,lon
//! <dir>/edges.csv   from,to,length_m,travel_ms,oneway
//! ```
//!
//! Node ids are arbitrary unsigned integers; they are remapped to dense
//! [`NodeId`]s on load.  `oneway` accepts `true/false`, `yes/no` or `1/0`
//! and may be left empty (two-way).
//!
//! ```csv
//! id,lat,lon
//! 10,51.500,-0.120
//! 11,51.510,-0.120
//! ```
//!
//! ```csv
//! from,to,length_m,travel_ms,oneway
//! 10,11,1112,80000,
//! ```
//!
//! # Queries
//!
//! Query points are snapped to their nearest node.  A matrix runs one
//! shortest-path tree per source (across Rayon workers with the `parallel`
//! feature); cancellation is polled before each source.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use rc_core::{GeoPoint, ProcessingContext};

use crate::graph::{GraphLoader, MatrixResult, PairCost, RoadGraph};
use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::router::{shortest_path, shortest_path_tree};
use crate::{NodeId, SpatialError, SpatialResult};

pub const NODES_FILE: &str = "nodes.csv";
pub const EDGES_FILE: &str = "edges.csv";

/// Post a progress line every this many matrix rows.
const PROGRESS_EVERY: usize = 16;

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  u64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:      u64,
    to:        u64,
    length_m:  f64,
    travel_ms: u32,
    #[serde(default)]
    oneway:    String,
}

fn parse_flag(s: &str) -> SpatialResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes"      => Ok(true),
        other => Err(SpatialError::Parse(format!(
            "invalid oneway flag {other:?}: expected true/false, yes/no or 1/0"
        ))),
    }
}

fn reader(path: &Path) -> SpatialResult<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| SpatialError::Csv { path: path.to_path_buf(), source })
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`CsvRoadGraph`]s from directories in the format above.
#[derive(Copy, Clone, Debug, Default)]
pub struct CsvGraphLoader;

impl GraphLoader for CsvGraphLoader {
    type Graph = CsvRoadGraph;

    fn load(&self, dir: &Path, ctx: &dyn ProcessingContext) -> SpatialResult<CsvRoadGraph> {
        let started = Instant::now();
        let nodes_path = dir.join(NODES_FILE);
        let edges_path = dir.join(EDGES_FILE);

        let mut builder = RoadNetworkBuilder::new();
        let mut ids: FxHashMap<u64, NodeId> = FxHashMap::default();

        for row in reader(&nodes_path)?.deserialize::<NodeRecord>() {
            let row = row.map_err(|source| SpatialError::Csv { path: nodes_path.clone(), source })?;
            if ids.contains_key(&row.id) {
                return Err(SpatialError::Parse(format!(
                    "{}: duplicate node id {}",
                    nodes_path.display(),
                    row.id
                )));
            }
            let node = builder.add_node(GeoPoint::new(row.lat, row.lon));
            ids.insert(row.id, node);
        }
        ctx.post_status(&format!("Read {} nodes", builder.node_count()));

        for row in reader(&edges_path)?.deserialize::<EdgeRecord>() {
            let row = row.map_err(|source| SpatialError::Csv { path: edges_path.clone(), source })?;
            let lookup = |raw: u64| {
                ids.get(&raw).copied().ok_or_else(|| SpatialError::UnknownNode {
                    path: edges_path.clone(),
                    id:   raw,
                })
            };
            let (from, to) = (lookup(row.from)?, lookup(row.to)?);
            if parse_flag(&row.oneway)? {
                builder.add_directed_edge(from, to, row.length_m, row.travel_ms);
            } else {
                builder.add_road(from, to, row.length_m, row.travel_ms);
            }
        }
        ctx.post_status(&format!("Read {} directed edges", builder.edge_count()));

        let network = builder.build();
        tracing::info!(
            dir = %dir.display(),
            nodes = network.node_count(),
            edges = network.edge_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded CSV road graph"
        );

        Ok(CsvRoadGraph { dir: dir.to_path_buf(), network })
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// A [`RoadNetwork`] loaded from a CSV directory.
#[derive(Debug)]
pub struct CsvRoadGraph {
    dir:     PathBuf,
    network: RoadNetwork,
}

impl CsvRoadGraph {
    /// Wrap an already-built network, e.g. one assembled in code.
    pub fn new(dir: impl Into<PathBuf>, network: RoadNetwork) -> Self {
        Self { dir: dir.into(), network }
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    /// One matrix row: costs from `snapped[src]` to every snapped point.
    fn row(&self, src: Option<NodeId>, snapped: &[Option<NodeId>]) -> Vec<Option<PairCost>> {
        let Some(src) = src else {
            return vec![None; snapped.len()];
        };
        let tree = shortest_path_tree(&self.network, src);
        snapped
            .iter()
            .map(|dst| {
                let (ms, len) = tree.cost_to((*dst)?)?;
                Some(PairCost { time_ms: f64::from(ms), distance_m: len })
            })
            .collect()
    }
}

impl RoadGraph for CsvRoadGraph {
    fn directory(&self) -> &Path {
        &self.dir
    }

    fn matrix(
        &self,
        points: &[GeoPoint],
        ctx:    &dyn ProcessingContext,
    ) -> SpatialResult<Option<MatrixResult>> {
        let n = points.len();
        let snapped: Vec<Option<NodeId>> =
            points.iter().map(|&p| self.network.snap_to_node(p)).collect();
        let done = AtomicUsize::new(0);

        let compute_row = |i: usize| -> Option<Vec<Option<PairCost>>> {
            if ctx.is_cancelled() {
                return None;
            }
            let row = self.row(snapped[i], &snapped);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if finished % PROGRESS_EVERY == 0 || finished == n {
                ctx.post_status(&format!("Calculated {finished} of {n} rows"));
            }
            Some(row)
        };

        #[cfg(not(feature = "parallel"))]
        let rows: Option<Vec<Vec<Option<PairCost>>>> = (0..n).map(compute_row).collect();

        #[cfg(feature = "parallel")]
        let rows: Option<Vec<Vec<Option<PairCost>>>> = {
            use rayon::prelude::*;
            (0..n).into_par_iter().map(compute_row).collect()
        };

        let Some(rows) = rows else {
            tracing::debug!(dir = %self.dir.display(), "matrix cancelled");
            return Ok(None);
        };
        let cells = rows.into_iter().flatten().collect();
        MatrixResult::new(n, cells).map(Some)
    }

    fn route(
        &self,
        from: GeoPoint,
        to:   GeoPoint,
        ctx:  &dyn ProcessingContext,
    ) -> SpatialResult<Option<Vec<GeoPoint>>> {
        if ctx.is_cancelled() {
            return Ok(None);
        }
        let (Some(a), Some(b)) = (self.network.snap_to_node(from), self.network.snap_to_node(to))
        else {
            return Ok(None);
        };

        let route = match shortest_path(&self.network, a, b) {
            Ok(route) => route,
            Err(SpatialError::NoRoute { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let mut points = Vec::with_capacity(route.edges.len() + 3);
        points.push(from);
        points.extend(route.nodes(&self.network, a).into_iter().map(|n| self.network.position(n)));
        points.push(to);
        Ok(Some(points))
    }

    fn dispose(self) {
        tracing::info!(dir = %self.dir.display(), "disposed CSV road graph");
    }
}
