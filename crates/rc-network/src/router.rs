//! Dijkstra over the CSR road graph.
//!
//! Two entry points share one search loop:
//!
//! - [`shortest_path`]: point-to-point with early exit, returns a [`Route`];
//! - [`shortest_path_tree`]: one-to-all, used for matrix rows.
//!
//! # Cost units
//!
//! Edge cost is `travel_ms` (u32 milliseconds, saturating).  Path length
//! in metres is carried along the chosen predecessor edges as `f64`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::network::RoadNetwork;
use crate::{EdgeId, NodeId, SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A point-to-point result: edges in travel order plus totals.
#[derive(Debug, Clone)]
pub struct Route {
    pub edges:           Vec<EdgeId>,
    pub total_travel_ms: u32,
    pub length_m:        f64,
}

impl Route {
    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn total_travel_secs(&self) -> f64 {
        f64::from(self.total_travel_ms) / 1000.0
    }

    /// Nodes visited, starting at `from`.
    pub fn nodes(&self, network: &RoadNetwork, from: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.edges.len() + 1);
        nodes.push(from);
        nodes.extend(self.edges.iter().map(|&e| network.edge(e).to));
        nodes
    }
}

// ── ShortestPathTree ──────────────────────────────────────────────────────────

/// Costs from one source to every node.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    /// `u32::MAX` for unreached nodes.
    pub travel_ms: Vec<u32>,
    pub length_m:  Vec<f64>,
}

impl ShortestPathTree {
    /// `(travel_ms, length_m)` to `node`, or `None` if unreachable.
    #[inline]
    pub fn cost_to(&self, node: NodeId) -> Option<(u32, f64)> {
        let ms = self.travel_ms[node.index()];
        (ms != u32::MAX).then(|| (ms, self.length_m[node.index()]))
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

struct Search {
    dist:      Vec<u32>,
    length:    Vec<f64>,
    prev_edge: Vec<EdgeId>,
}

/// Run Dijkstra from `from`, stopping early once `target` is settled.
fn search(network: &RoadNetwork, from: NodeId, target: Option<NodeId>) -> Search {
    let n = network.node_count();
    let mut dist      = vec![u32::MAX; n];
    let mut length    = vec![0.0f64; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Reverse turns the max-heap into a min-heap; NodeId breaks ties
    // deterministically.
    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if Some(node) == target {
            break;
        }
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let e = network.edge(edge);
            let neighbor = e.to;
            let new_cost = cost.saturating_add(e.travel_ms);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                length[neighbor.index()] = length[node.index()] + e.length_m;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Search { dist, length, prev_edge }
}

/// Fastest route from `from` to `to`.
///
/// `from == to` yields an empty route rather than an error.
///
/// # Errors
///
/// [`SpatialError::NodeNotFound`] for an out-of-range id,
/// [`SpatialError::NoRoute`] if `to` is unreachable.
pub fn shortest_path(network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
    for id in [from, to] {
        if id.index() >= network.node_count() {
            return Err(SpatialError::NodeNotFound(id));
        }
    }
    if from == to {
        return Ok(Route { edges: vec![], total_travel_ms: 0, length_m: 0.0 });
    }

    let s = search(network, from, Some(to));
    if s.dist[to.index()] == u32::MAX {
        return Err(SpatialError::NoRoute { from, to });
    }

    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = s.prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge(e).from;
    }
    edges.reverse();

    Ok(Route {
        edges,
        total_travel_ms: s.dist[to.index()],
        length_m:        s.length[to.index()],
    })
}

/// Costs from `from` to every node in the network.
pub fn shortest_path_tree(network: &RoadNetwork, from: NodeId) -> ShortestPathTree {
    let s = search(network, from, None);
    ShortestPathTree { travel_ms: s.dist, length_m: s.length }
}
