//! Fluent builder for constructing an [`AppContext`].

use rc_cache::{CacheRegistry, names};
use rc_core::{Dataset, Geometry, RouteGeometry};
use rc_crs::{CoordinateSystemRegistry, ShapefileImporter, ShapefileLink};
use rc_distance::{CostMatrix, DistanceEngine, MatrixKey, RouteKey};
use rc_network::GraphLoader;

use crate::{AppContext, AppError, AppResult, CachePolicy};

/// Fluent builder for [`AppContext<L, I>`].
///
/// # Required inputs
///
/// - `L: GraphLoader` — road graph backend (e.g. [`rc_network::CsvGraphLoader`])
/// - `I: ShapefileImporter` — shapefile parser
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                  |
/// |---------------|--------------------------|
/// | `.policy(p)`  | `CachePolicy::default()` |
///
/// # Example
///
/// ```rust,ignore
/// let app = AppContextBuilder::new(CsvGraphLoader, MyImporter)
///     .policy(CachePolicy { matrix_bytes: 16 * MB, ..Default::default() })
///     .build()?;
/// let matrix = app.distance().calculate(&config, &[&points], &NoopContext)?;
/// app.dispose();
/// ```
pub struct AppContextBuilder<L: GraphLoader, I: ShapefileImporter> {
    loader:   L,
    importer: I,
    policy:   CachePolicy,
}

impl<L: GraphLoader, I: ShapefileImporter> AppContextBuilder<L, I> {
    pub fn new(loader: L, importer: I) -> Self {
        Self { loader, importer, policy: CachePolicy::default() }
    }

    /// Override cache capacities.
    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate the policy, create and register every cache, and wire the
    /// distance engine and coordinate-system registry to them.
    pub fn build(self) -> AppResult<AppContext<L, I>> {
        // ── Validate ──────────────────────────────────────────────────────
        if let Some((field, _)) = self.policy.capacities().into_iter().find(|&(_, b)| b == 0) {
            return Err(AppError::Config(format!("cache capacity {field} must be non-zero")));
        }

        // ── Register caches ───────────────────────────────────────────────
        let p = &self.policy;
        let caches = CacheRegistry::new();
        caches.create::<MatrixKey, CostMatrix>(names::DISTANCE_MATRIX, p.matrix_bytes)?;
        caches.create::<RouteKey, RouteGeometry>(names::ROUTE_GEOMETRY, p.route_geometry_bytes)?;
        // Merge/border geometry caches are registered here so they share the
        // policy and clear-all; the merge and border tools that fill them are
        // outside this core and look them up by name.
        caches.create::<String, Geometry>(names::GEOMETRY_MERGER, p.geometry_merge_bytes)?;
        caches.create::<String, Geometry>(names::GEOMETRY_BORDER, p.geometry_border_bytes)?;
        let shape_geometries =
            caches.create::<ShapefileLink, Geometry>(names::SHAPEFILE_GEOMETRY, p.shapefile_geometry_bytes)?;
        let shape_datasets =
            caches.create::<std::path::PathBuf, Dataset>(names::SHAPEFILE_DATASET, p.shapefile_dataset_bytes)?;

        // ── Engines ───────────────────────────────────────────────────────
        let distance = DistanceEngine::new(self.loader, &caches)?;
        let crs = CoordinateSystemRegistry::with_caches(self.importer, shape_geometries, shape_datasets);
        crs.initialize();

        tracing::info!(caches = caches.names().len(), policy = ?self.policy, "application context ready");
        Ok(AppContext::new(self.policy, caches, distance, crs))
    }
}
