use std::path::PathBuf;

use thiserror::Error;

/// Errors from coordinate-system resolution and shapefile import.
#[derive(Debug, Error)]
pub enum CrsError {
    #[error("unknown or unsupported coordinate system: {0}")]
    UnknownSystem(String),

    #[error("failed to import {path}: {reason}")]
    Import { path: PathBuf, reason: String },

    #[error("table error: {0}")]
    Table(#[from] rc_core::CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrsError {
    /// `true` for errors caused by caller configuration rather than file
    /// contents.
    pub fn is_config(&self) -> bool {
        matches!(self, CrsError::UnknownSystem(_))
    }
}

pub type CrsResult<T> = Result<T, CrsError>;
