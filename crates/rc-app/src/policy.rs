use rc_cache::MB;

/// Capacities, in bytes, of every cache the application creates.
///
/// | Field                      | Default |
/// |----------------------------|---------|
/// | `matrix_bytes`             | 128 MB  |
/// | `route_geometry_bytes`     | 64 MB   |
/// | `geometry_merge_bytes`     | 64 MB   |
/// | `geometry_border_bytes`    | 64 MB   |
/// | `shapefile_geometry_bytes` | 256 MB  |
/// | `shapefile_dataset_bytes`  | 512 MB  |
///
/// The shapefile caches are sized generously because they only evict by
/// capacity, never under memory pressure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CachePolicy {
    pub matrix_bytes:             usize,
    pub route_geometry_bytes:     usize,
    pub geometry_merge_bytes:     usize,
    pub geometry_border_bytes:    usize,
    pub shapefile_geometry_bytes: usize,
    pub shapefile_dataset_bytes:  usize,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            matrix_bytes:             128 * MB,
            route_geometry_bytes:     64 * MB,
            geometry_merge_bytes:     64 * MB,
            geometry_border_bytes:    64 * MB,
            shapefile_geometry_bytes: 256 * MB,
            shapefile_dataset_bytes:  512 * MB,
        }
    }
}

impl CachePolicy {
    /// Every capacity as `(field, bytes)`, for validation and logging.
    pub fn capacities(&self) -> [(&'static str, usize); 6] {
        [
            ("matrix_bytes", self.matrix_bytes),
            ("route_geometry_bytes", self.route_geometry_bytes),
            ("geometry_merge_bytes", self.geometry_merge_bytes),
            ("geometry_border_bytes", self.geometry_border_bytes),
            ("shapefile_geometry_bytes", self.shapefile_geometry_bytes),
            ("shapefile_dataset_bytes", self.shapefile_dataset_bytes),
        ]
    }
}
