//! The boundary with the external shapefile parser.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use rc_core::{Dataset, Geometry, standardise};

use crate::{CrsError, CrsResult};

/// Identifies one feature: the file, the feature type (table) inside it, and
/// the field/value pair that selects the record.
///
/// Type, field and value are held in standard form so links built from
/// differently spelled input compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapefileLink {
    pub file:         PathBuf,
    pub type_name:    String,
    pub search_field: String,
    pub search_value: String,
}

impl ShapefileLink {
    pub fn new(
        file:         impl Into<PathBuf>,
        type_name:    &str,
        search_field: &str,
        search_value: &str,
    ) -> Self {
        Self {
            file:         file.into(),
            type_name:    standardise(type_name),
            search_field: standardise(search_field),
            search_value: standardise(search_value),
        }
    }
}

impl fmt::Display for ShapefileLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}.{}={}",
            self.file.display(),
            self.type_name,
            self.search_field,
            self.search_value
        )
    }
}

/// Reads shapefiles.  Parsing itself lives outside this crate.
pub trait ShapefileImporter: Send + Sync {
    /// Every feature in `file`, each keyed by a link whose search field is
    /// `search_field`.  A feature with no geometry maps to `None`.
    fn import_links(
        &self,
        file:         &Path,
        search_field: &str,
    ) -> CrsResult<HashMap<ShapefileLink, Option<Geometry>>>;

    /// The whole file as a read-only dataset, one table per feature type.
    fn import_dataset(&self, file: &Path) -> CrsResult<Dataset>;
}

/// Importer for builds without a shapefile parser.  Every import fails.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoShapefileSupport;

impl ShapefileImporter for NoShapefileSupport {
    fn import_links(
        &self,
        file:          &Path,
        _search_field: &str,
    ) -> CrsResult<HashMap<ShapefileLink, Option<Geometry>>> {
        Err(unsupported(file))
    }

    fn import_dataset(&self, file: &Path) -> CrsResult<Dataset> {
        Err(unsupported(file))
    }
}

fn unsupported(file: &Path) -> CrsError {
    CrsError::Import { path: file.to_path_buf(), reason: "no shapefile importer is configured".to_owned() }
}
