//! Coordinate-system hub and cached shapefile lookups.
//!
//! Shapefile geometry and dataset caches are capacity-bounded LRU caches
//! rather than reclaim-under-memory-pressure caches; size their capacities
//! generously.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use parking_lot::Mutex;

use rc_cache::{BoundedCache, names};
use rc_core::{ColumnKind, Dataset, Geometry, geometry_size_bytes};

use crate::shapefile::{ShapefileImporter, ShapefileLink};
use crate::{CoordinateSystem, CoordinateTransform, CrsResult};

pub type GeometryCache = BoundedCache<ShapefileLink, Geometry>;
pub type DatasetCache = BoundedCache<PathBuf, Dataset>;

/// Order of the two components in geographic coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisOrder {
    LonLat,
    LatLon,
}

/// Settings fixed by the one-time initialisation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CrsHub {
    pub axis_order: AxisOrder,
    pub reference:  CoordinateSystem,
}

/// Builds coordinate transforms and answers shapefile feature lookups.
pub struct CoordinateSystemRegistry<I: ShapefileImporter> {
    importer:   I,
    hub:        OnceLock<CrsHub>,
    geometries: Arc<GeometryCache>,
    datasets:   Arc<DatasetCache>,
    /// Held while importing so one file is never parsed twice concurrently.
    import:     Mutex<()>,
}

impl<I: ShapefileImporter> CoordinateSystemRegistry<I> {
    pub fn new(importer: I, geometry_bytes: usize, dataset_bytes: usize) -> Self {
        Self::with_caches(
            importer,
            Arc::new(BoundedCache::new(names::SHAPEFILE_GEOMETRY, geometry_bytes)),
            Arc::new(BoundedCache::new(names::SHAPEFILE_DATASET, dataset_bytes)),
        )
    }

    pub fn with_caches(importer: I, geometries: Arc<GeometryCache>, datasets: Arc<DatasetCache>) -> Self {
        Self {
            importer,
            hub: OnceLock::new(),
            geometries,
            datasets,
            import: Mutex::new(()),
        }
    }

    /// Fix the axis order and reference system.  Only the first call does
    /// anything; later and concurrent calls return the same hub.
    pub fn initialize(&self) -> &CrsHub {
        self.hub.get_or_init(|| {
            let hub = CrsHub { axis_order: AxisOrder::LonLat, reference: CoordinateSystem::Wgs84 };
            tracing::info!(reference = %hub.reference, axis_order = ?hub.axis_order, "coordinate systems initialised");
            hub
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.hub.get().is_some()
    }

    pub fn wgs84(&self) -> CoordinateSystem {
        self.initialize().reference
    }

    /// Transform from WGS84 into the system named `system_id`.
    ///
    /// # Errors
    ///
    /// [`crate::CrsError::UnknownSystem`] if the id is not supported.
    pub fn transform_from_wgs84(&self, system_id: &str) -> CrsResult<CoordinateTransform> {
        let target = CoordinateSystem::from_id(system_id)?;
        Ok(CoordinateTransform::new(self.wgs84(), target))
    }

    /// Transform from `system` into WGS84.
    pub fn transform_to_wgs84(&self, system: CoordinateSystem) -> CoordinateTransform {
        CoordinateTransform::new(system, self.wgs84())
    }

    pub fn importer(&self) -> &I {
        &self.importer
    }

    pub fn geometry_cache(&self) -> &Arc<GeometryCache> {
        &self.geometries
    }

    pub fn dataset_cache(&self) -> &Arc<DatasetCache> {
        &self.datasets
    }

    /// Geometry of the feature `link` points at.
    ///
    /// A miss imports the whole file and caches every feature that has a
    /// geometry, so later lookups into the same file are hits.
    /// Already-cached links are left as they are.
    ///
    /// # Errors
    ///
    /// Propagates importer failures.  A feature that is not in the file, or
    /// has no geometry, is `Ok(None)`.
    pub fn load_link(&self, link: &ShapefileLink) -> CrsResult<Option<Arc<Geometry>>> {
        if let Some(hit) = self.geometries.get(link) {
            return Ok(Some(hit));
        }

        let _guard = self.import.lock();
        if let Some(hit) = self.geometries.get(link) {
            return Ok(Some(hit));
        }

        let started = Instant::now();
        let features = self.importer.import_links(&link.file, &link.search_field)?;
        let total = features.len();
        let mut cached = 0usize;
        let mut found = None;
        for (feature, geometry) in features {
            let Some(geometry) = geometry else {
                continue;
            };
            if &feature == link {
                let geometry = Arc::new(geometry);
                found = Some(Arc::clone(&geometry));
                if !self.geometries.contains(&feature) {
                    let size = geometry_size_bytes(&geometry);
                    self.geometries.put_shared(feature, geometry, size);
                    cached += 1;
                }
            } else if !self.geometries.contains(&feature) {
                let size = geometry_size_bytes(&geometry);
                self.geometries.put(feature, geometry, size);
                cached += 1;
            }
        }
        tracing::info!(
            file = %link.file.display(),
            features = total,
            cached,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "imported shapefile features"
        );
        Ok(found)
    }

    /// Geometry of the first row in table `type_name` of `file` whose
    /// `search_field` equals `search_value`.
    ///
    /// The file is imported whole on first use and kept in the dataset
    /// cache.  A missing table, column or row is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates importer failures.
    pub fn lookup_shapefile(
        &self,
        file:         &Path,
        search_value: &str,
        type_name:    &str,
        search_field: &str,
    ) -> CrsResult<Option<Arc<Geometry>>> {
        let dataset = self.dataset(file)?;

        let Some(table) = dataset.find_table(type_name) else {
            tracing::debug!(file = %file.display(), type_name, "shapefile lookup: no such type");
            return Ok(None);
        };
        let (Some(geom_col), Some(search_col)) =
            (table.find_column_of_kind(ColumnKind::Geometry), table.find_column(search_field))
        else {
            tracing::debug!(file = %file.display(), type_name, search_field, "shapefile lookup: missing column");
            return Ok(None);
        };

        Ok(table
            .find(search_col, search_value)
            .first()
            .and_then(|&row| table.value_at(row, geom_col))
            .and_then(|v| v.as_geometry())
            .cloned())
    }

    /// The imported dataset for `file`, from the cache when possible.
    /// Datasets without tables are returned but not cached.
    pub fn dataset(&self, file: &Path) -> CrsResult<Arc<Dataset>> {
        let key = file.to_path_buf();
        if let Some(hit) = self.datasets.get(&key) {
            return Ok(hit);
        }

        let _guard = self.import.lock();
        if let Some(hit) = self.datasets.get(&key) {
            return Ok(hit);
        }

        let started = Instant::now();
        let dataset = Arc::new(self.importer.import_dataset(file)?);
        if dataset.table_count() == 0 {
            tracing::warn!(file = %file.display(), "shapefile import produced no tables");
            return Ok(dataset);
        }
        tracing::info!(
            file = %file.display(),
            tables = dataset.table_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "imported shapefile dataset"
        );
        let size = dataset.estimated_size_bytes();
        self.datasets.put_shared(key, Arc::clone(&dataset), size);
        Ok(dataset)
    }
}

impl<I: ShapefileImporter> std::fmt::Debug for CoordinateSystemRegistry<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinateSystemRegistry")
            .field("hub", &self.hub.get())
            .field("geometries", &self.geometries)
            .field("datasets", &self.datasets)
            .finish_non_exhaustive()
    }
}
