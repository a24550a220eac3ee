//! Road graph storage and snapping of arbitrary points onto it.
//!
//! Outgoing edges are stored in CSR order: all edges leaving node `n` sit in
//! `edges[first_out[n] .. first_out[n + 1]]`, so an `EdgeId` is a position
//! in that array and a node's neighbourhood is one contiguous slice.
//!
//! Snapping uses an `rstar` R-tree over a local equirectangular projection:
//! longitudes are scaled by the cosine of the graph's mean latitude, which
//! keeps nearest-node queries close to true ground distance for any graph a
//! few hundred kilometres across.

use rstar::RTree;
use rstar::primitives::GeomWithData;

use rc_core::GeoPoint;

use crate::{EdgeId, NodeId};

type SnapPoint = GeomWithData<[f64; 2], NodeId>;

/// One directed road segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoadEdge {
    pub from:      NodeId,
    pub to:        NodeId,
    pub length_m:  f64,
    pub travel_ms: u32,
}

/// Directed road graph plus a spatial index of its nodes.
///
/// Immutable once built; build one with [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    positions: Vec<GeoPoint>,
    first_out: Vec<u32>,
    edges:     Vec<RoadEdge>,
    lon_scale: f64,
    index:     RTree<SnapPoint>,
}

impl RoadNetwork {
    /// A network with no nodes or edges.  Nothing snaps to it.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn edge(&self, edge: EdgeId) -> &RoadEdge {
        &self.edges[edge.index()]
    }

    #[inline]
    fn out_range(&self, node: NodeId) -> std::ops::Range<usize> {
        self.first_out[node.index()] as usize..self.first_out[node.index() + 1] as usize
    }

    /// Ids of the edges leaving `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_range(node).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_range(node).len()
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> GeoPoint {
        self.positions[node.index()]
    }

    fn project(&self, p: GeoPoint) -> [f64; 2] {
        [p.lon * self.lon_scale, p.lat]
    }

    /// The node nearest to `pos`, or `None` for an empty network.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.index.nearest_neighbor(&self.project(pos)).map(|e| e.data)
    }

    /// Like [`snap_to_node`](Self::snap_to_node), also giving the
    /// great-circle distance in metres from `pos` to the chosen node.
    pub fn snap_with_offset(&self, pos: GeoPoint) -> Option<(NodeId, f64)> {
        let node = self.snap_to_node(pos)?;
        Some((node, pos.distance_m(self.position(node))))
    }
}

impl std::fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Collects nodes and edges in any order; [`build`](Self::build) lays them
/// out in CSR order and bulk-loads the R-tree.
///
/// ```
/// use rc_core::GeoPoint;
/// use rc_network::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(51.50, -0.12));
/// let c = b.add_node(GeoPoint::new(51.51, -0.12));
/// b.add_road(a, c, 1_112.0, 80_000);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // both directions
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    positions: Vec<GeoPoint>,
    edges:     Vec<RoadEdge>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            positions: Vec::with_capacity(nodes),
            edges:     Vec::with_capacity(edges),
        }
    }

    /// Add a node; ids are handed out sequentially from 0.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.positions.len() as u32);
        self.positions.push(pos);
        id
    }

    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64, travel_ms: u32) {
        self.edges.push(RoadEdge { from, to, length_m, travel_ms });
    }

    /// A two-way segment: one directed edge each way.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64, travel_ms: u32) {
        self.add_directed_edge(a, b, length_m, travel_ms);
        self.add_directed_edge(b, a, length_m, travel_ms);
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn build(self) -> RoadNetwork {
        let Self { positions, mut edges } = self;
        let n = positions.len();

        // Stable, so parallel edges keep insertion order.
        edges.sort_by_key(|e| e.from);

        let mut first_out = vec![0u32; n + 1];
        for e in &edges {
            first_out[e.from.index() + 1] += 1;
        }
        for i in 0..n {
            first_out[i + 1] += first_out[i];
        }

        let mean_lat = if n == 0 {
            0.0
        } else {
            positions.iter().map(|p| p.lat).sum::<f64>() / n as f64
        };
        let lon_scale = mean_lat.to_radians().cos();

        let index = RTree::bulk_load(
            positions
                .iter()
                .enumerate()
                .map(|(i, p)| SnapPoint::new([p.lon * lon_scale, p.lat], NodeId(i as u32)))
                .collect(),
        );

        RoadNetwork { positions, first_out, edges, lon_scale, index }
    }
}
