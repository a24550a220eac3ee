//! The road-network backend seam.
//!
//! The distance engine only talks to a graph through [`RoadGraph`] and
//! obtains one through a [`GraphLoader`].  The bundled implementation is
//! [`CsvGraphLoader`](crate::CsvGraphLoader); tests plug in counting fakes.

use std::path::Path;

use rc_core::{GeoPoint, ProcessingContext};

use crate::{SpatialError, SpatialResult};

/// Travel time and distance for one ordered pair of points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PairCost {
    pub time_ms:    f64,
    pub distance_m: f64,
}

/// Row-major N×N result of [`RoadGraph::matrix`].
///
/// A `None` cell means the backend found no path for that pair.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixResult {
    n:     usize,
    cells: Vec<Option<PairCost>>,
}

impl MatrixResult {
    /// Wrap `n * n` row-major cells.
    ///
    /// # Errors
    ///
    /// [`SpatialError::MatrixShape`] if there are not exactly `n * n` cells.
    pub fn new(n: usize, cells: Vec<Option<PairCost>>) -> SpatialResult<Self> {
        if cells.len() != n * n {
            return Err(SpatialError::MatrixShape { points: n, cells: cells.len() });
        }
        Ok(Self { n, cells })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> Option<PairCost> {
        self.cells[from * self.n + to]
    }

    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.get(from, to).is_some()
    }
}

/// A loaded, queryable road network.
///
/// Both queries take a [`ProcessingContext`]: implementations should poll
/// [`is_cancelled`](ProcessingContext::is_cancelled) at coarse checkpoints and
/// return `Ok(None)` when it fires, and may report progress lines through
/// [`post_status`](ProcessingContext::post_status).
pub trait RoadGraph: Send {
    /// The directory this graph was loaded from.
    fn directory(&self) -> &Path;

    /// Travel time and distance between every ordered pair of `points`.
    fn matrix(
        &self,
        points: &[GeoPoint],
        ctx:    &dyn ProcessingContext,
    ) -> SpatialResult<Option<MatrixResult>>;

    /// Path geometry from `from` to `to`, or `None` if there is no path.
    fn route(
        &self,
        from: GeoPoint,
        to:   GeoPoint,
        ctx:  &dyn ProcessingContext,
    ) -> SpatialResult<Option<Vec<GeoPoint>>>;

    /// Release backend resources.  Called exactly once, when the owner
    /// replaces or shuts down the graph.
    fn dispose(self)
    where
        Self: Sized,
    {
    }
}

/// Builds a [`RoadGraph`] from a directory on disk.
pub trait GraphLoader: Send + Sync {
    type Graph: RoadGraph;

    fn load(&self, dir: &Path, ctx: &dyn ProcessingContext) -> SpatialResult<Self::Graph>;
}
