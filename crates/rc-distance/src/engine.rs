//! The distance engine: point deduplication, matrix and route caching, and
//! the lifecycle of the single loaded road graph.
//!
//! # Serialisation
//!
//! Every public operation runs inside one engine-wide `parking_lot::Mutex`.
//! Loading, disposing and querying the road graph are never interleaved, and
//! two `calculate` calls for different graph directories cannot race each
//! other's load/dispose sequence.  The caches themselves are independently
//! thread-safe and shared through the [`CacheRegistry`].
//!
//! # Graph lifecycle
//!
//! At most one graph is held, tagged by its directory.  Before each
//! road-network query:
//!
//! 1. a held graph whose directory no longer exists is disposed;
//! 2. a held graph for a different directory is disposed;
//! 3. if nothing is held, the requested directory must exist and be a
//!    directory, and a fresh graph is loaded from it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use rc_cache::{BoundedCache, CacheRegistry, names};
use rc_core::{GeoPoint, PrefixedContext, ProcessingContext, RouteGeometry, TableSource};
use rc_network::{GraphLoader, RoadGraph};

use crate::config::{DistanceConfiguration, DistanceMethod, OutputConfig, RoadNetworkConfig};
use crate::great_circle::great_circle_matrix;
use crate::key::{MatrixKey, RouteKey};
use crate::matrix::CostMatrix;
use crate::output::CellValues;
use crate::points::PointSet;
use crate::{DistanceError, DistanceResult};

pub type MatrixCache = BoundedCache<MatrixKey, CostMatrix>;
pub type RouteCache = BoundedCache<RouteKey, RouteGeometry>;

/// Matrices at or above this estimated size are returned but not cached.
const MAX_CACHEABLE_MATRIX_BYTES: u64 = i32::MAX as u64;

// ── Engine state ──────────────────────────────────────────────────────────────

struct EngineState<G> {
    graph: Option<G>,
}

impl<G: RoadGraph> EngineState<G> {
    fn dispose_graph(&mut self) {
        if let Some(graph) = self.graph.take() {
            tracing::info!(dir = %graph.directory().display(), "disposing road network graph");
            graph.dispose();
        }
    }

    fn ensure_graph_loaded<L>(
        &mut self,
        loader: &L,
        dir:    &Path,
        ctx:    &dyn ProcessingContext,
    ) -> DistanceResult<&G>
    where
        L: GraphLoader<Graph = G>,
    {
        ctx.post_status(&format!("Loading the road network graph: {}", display_dir(dir).display()));

        if let Some(current) = self.graph.take() {
            let current_dir = current.directory().to_path_buf();
            if !current_dir.is_dir() {
                tracing::info!(dir = %current_dir.display(), "graph directory no longer exists");
                current.dispose();
            } else if current_dir != dir {
                tracing::info!(
                    from = %current_dir.display(),
                    to = %dir.display(),
                    "graph directory changed"
                );
                current.dispose();
            } else {
                tracing::debug!(dir = %dir.display(), "reusing loaded road network graph");
                return Ok(self.graph.insert(current));
            }
        }

        if !dir.is_dir() {
            return Err(DistanceError::InvalidGraphDirectory(dir.to_path_buf()));
        }
        let started = Instant::now();
        let graph = loader.load(dir, ctx)?;
        tracing::info!(
            dir = %dir.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded road network graph"
        );
        Ok(self.graph.insert(graph))
    }
}

fn display_dir(dir: &Path) -> PathBuf {
    std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
}

// ── DistanceEngine ────────────────────────────────────────────────────────────

/// Computes cost matrices and route geometries, caching both.
///
/// `L` supplies road graphs; [`rc_network::CsvGraphLoader`] is the bundled
/// backend.
pub struct DistanceEngine<L: GraphLoader> {
    loader:   L,
    state:    Mutex<EngineState<L::Graph>>,
    matrices: Arc<MatrixCache>,
    routes:   Arc<RouteCache>,
}

impl<L: GraphLoader> DistanceEngine<L> {
    /// Engine using the matrix and route caches registered in `registry`
    /// under [`names::DISTANCE_MATRIX`] and [`names::ROUTE_GEOMETRY`].
    ///
    /// # Errors
    ///
    /// [`DistanceError::Cache`] if either cache is missing or was registered
    /// with other types.
    pub fn new(loader: L, registry: &CacheRegistry) -> DistanceResult<Self> {
        let matrices = registry.try_get::<MatrixKey, CostMatrix>(names::DISTANCE_MATRIX)?;
        let routes = registry.try_get::<RouteKey, RouteGeometry>(names::ROUTE_GEOMETRY)?;
        Ok(Self::with_caches(loader, matrices, routes))
    }

    pub fn with_caches(loader: L, matrices: Arc<MatrixCache>, routes: Arc<RouteCache>) -> Self {
        Self {
            loader,
            state: Mutex::new(EngineState { graph: None }),
            matrices,
            routes,
        }
    }

    pub fn matrix_cache(&self) -> &Arc<MatrixCache> {
        &self.matrices
    }

    pub fn route_cache(&self) -> &Arc<RouteCache> {
        &self.routes
    }

    /// Directory of the currently loaded graph, if any.
    pub fn loaded_graph_dir(&self) -> Option<PathBuf> {
        self.state.lock().graph.as_ref().map(|g| g.directory().to_path_buf())
    }

    /// Cost matrix over every point in `tables`.
    ///
    /// Returns `Ok(None)` if `ctx` reports cancellation before the matrix is
    /// complete; nothing is cached in that case.
    ///
    /// # Errors
    ///
    /// Configuration errors (see [`DistanceConfiguration::validate`], bad
    /// graph directory), data errors from the point tables, and backend
    /// failures.
    pub fn calculate(
        &self,
        config: &DistanceConfiguration,
        tables: &[&dyn TableSource],
        ctx:    &dyn ProcessingContext,
    ) -> DistanceResult<Option<Arc<CostMatrix>>> {
        let mut state = self.state.lock();

        config.validate()?;
        let points = PointSet::from_tables(tables)?;

        let key = MatrixKey::new(config, &points);
        if let Some(hit) = self.matrices.get(&key) {
            tracing::debug!(points = points.len(), method = config.method.name(), "matrix cache hit");
            return Ok(Some(hit));
        }
        tracing::debug!(points = points.len(), method = config.method.name(), "matrix cache miss");

        let matrix = match &config.method {
            DistanceMethod::GreatCircle(gc) => great_circle_matrix(gc, &config.output, &points, ctx),
            DistanceMethod::RoadNetwork(rn) => {
                self.road_network_matrix(&mut state, rn, &config.output, &points, ctx)?
            }
        };
        let Some(matrix) = matrix else {
            return Ok(None);
        };

        let matrix = Arc::new(matrix);
        let size = matrix.size_in_bytes();
        if size < MAX_CACHEABLE_MATRIX_BYTES {
            self.matrices.put_shared(key, Arc::clone(&matrix), size as usize);
        } else {
            tracing::warn!(points = points.len(), size_bytes = size, "matrix too large to cache");
        }
        Ok(Some(matrix))
    }

    fn road_network_matrix(
        &self,
        state:  &mut EngineState<L::Graph>,
        rn:     &RoadNetworkConfig,
        output: &OutputConfig,
        points: &PointSet,
        ctx:    &dyn ProcessingContext,
    ) -> DistanceResult<Option<CostMatrix>> {
        let graph = state.ensure_graph_loaded(&self.loader, &rn.graph_dir, ctx)?;

        let n = points.len();
        let header = format!(
            "Loaded the graph {}\nCalculating {n}x{n} matrix using road network distances.",
            display_dir(&rn.graph_dir).display()
        );
        ctx.post_status(&header);
        if ctx.is_cancelled() {
            return Ok(None);
        }

        let started = Instant::now();
        let positions = points.positions();
        let result = graph.matrix(&positions, &PrefixedContext::new(ctx, header))?;
        let Some(result) = result else {
            return Ok(None);
        };
        if ctx.is_cancelled() {
            return Ok(None);
        }
        if result.size() != n {
            return Err(DistanceError::BackendMismatch { expected: n, got: result.size() });
        }

        let mut matrix = CostMatrix::zeroed(points.ids());
        for i in 0..n {
            for j in 0..n {
                let cell = match result.get(i, j) {
                    Some(pair) => {
                        let time_s = pair.time_ms * 0.001 * rn.time_multiplier;
                        output.process(pair.distance_m, time_s)
                    }
                    None => CellValues::UNREACHABLE,
                };
                matrix.set(i, j, cell);
            }
        }

        tracing::info!(
            points = n,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "road network matrix calculated"
        );
        Ok(Some(matrix))
    }

    /// Path geometry from `from` to `to`.
    ///
    /// Great circle always yields the straight line and never touches a
    /// cache.  Road network consults the route cache, then the graph; a
    /// pair the graph cannot connect falls back to the straight line, which
    /// is not cached.
    pub fn calculate_route_geometry(
        &self,
        config: &DistanceConfiguration,
        from:   GeoPoint,
        to:     GeoPoint,
        ctx:    &dyn ProcessingContext,
    ) -> DistanceResult<Arc<RouteGeometry>> {
        let mut state = self.state.lock();
        config.validate()?;

        let rn = match &config.method {
            DistanceMethod::GreatCircle(_) => {
                return Ok(Arc::new(RouteGeometry::straight_line(from, to)));
            }
            DistanceMethod::RoadNetwork(rn) => rn,
        };

        let key = RouteKey::new(config, from, to);
        if let Some(hit) = self.routes.get(&key) {
            tracing::debug!(%from, %to, "route geometry cache hit");
            return Ok(hit);
        }

        let graph = state.ensure_graph_loaded(&self.loader, &rn.graph_dir, ctx)?;
        match graph.route(from, to, ctx)?.and_then(RouteGeometry::from_points) {
            Some(geometry) => {
                let geometry = Arc::new(geometry);
                let size = geometry.estimated_size_bytes();
                self.routes.put_shared(key, Arc::clone(&geometry), size);
                Ok(geometry)
            }
            None => {
                tracing::debug!(%from, %to, "no road route; using straight line");
                Ok(Arc::new(RouteGeometry::straight_line(from, to)))
            }
        }
    }

    /// Dispose the loaded graph, if any.  The engine stays usable and will
    /// load a graph again on demand.
    pub fn dispose(&self) {
        self.state.lock().dispose_graph();
    }
}

impl<L: GraphLoader> std::fmt::Debug for DistanceEngine<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceEngine")
            .field("loaded_graph", &self.loaded_graph_dir())
            .field("matrices", &self.matrices)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}
