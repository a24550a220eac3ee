//! Road-network error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::NodeId;

/// Errors produced by `rc-network`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("{0} not found in network")]
    NodeNotFound(NodeId),

    #[error("{path}: edge refers to unknown node id {id}")]
    UnknownNode { path: PathBuf, id: u64 },

    #[error("{path}: {source}")]
    Csv {
        path:   PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("matrix for {points} points needs {} cells, got {cells}", points * points)]
    MatrixShape { points: usize, cells: usize },

    #[error("graph parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
