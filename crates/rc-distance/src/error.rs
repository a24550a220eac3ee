//! Distance-engine error type.

use std::path::PathBuf;

use thiserror::Error;

use rc_cache::CacheError;
use rc_core::CoreError;
use rc_network::SpatialError;

/// Errors produced by `rc-distance`.
///
/// Variants fall into two families: configuration errors (bad settings,
/// missing graph directory, missing caches) and data errors (point tables
/// that cannot be read).  See [`is_config`](Self::is_config) and
/// [`is_data`](Self::is_data).
#[derive(Debug, Error)]
pub enum DistanceError {
    // ── Configuration ──────────────────────────────────────────────────────
    #[error("invalid distance configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid road network graph directory: {}", .0.display())]
    InvalidGraphDirectory(PathBuf),

    #[error("distance cache unavailable: {0}")]
    Cache(#[from] CacheError),

    // ── Data ───────────────────────────────────────────────────────────────
    #[error("distances input table {table} does not contain tag for: {tag}")]
    MissingTag { table: String, tag: &'static str },

    #[error("distances input table has a null value: table={table}, row={row}, column={column}")]
    NullValue { table: String, row: usize, column: String },

    #[error(
        "distances input table has a value which cannot be converted to {expected}: \
         table={table}, row={row}, column={column}"
    )]
    BadValue {
        table:    String,
        row:      usize,
        column:   String,
        expected: &'static str,
    },

    #[error("location id defined twice with different latitude/longitude pairs: {0}")]
    DuplicatePoint(String),

    #[error("table error: {0}")]
    Table(#[from] CoreError),

    // ── Backend ────────────────────────────────────────────────────────────
    #[error("road network error: {0}")]
    Network(#[from] SpatialError),

    #[error("road network backend returned a {got}x{got} matrix for {expected} points")]
    BackendMismatch { expected: usize, got: usize },
}

impl DistanceError {
    /// Settings problem; fix the configuration, not the data.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            DistanceError::InvalidConfig(_)
                | DistanceError::InvalidGraphDirectory(_)
                | DistanceError::Cache(_)
        )
    }

    /// Problem with the input points.
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            DistanceError::MissingTag { .. }
                | DistanceError::NullValue { .. }
                | DistanceError::BadValue { .. }
                | DistanceError::DuplicatePoint(_)
                | DistanceError::Table(_)
        )
    }
}

pub type DistanceResult<T> = Result<T, DistanceError>;
