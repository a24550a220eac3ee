//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced while building or reading tables.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("table {table}: row has {got} values but the table has {expected} columns")]
    RowLength {
        table:    String,
        expected: usize,
        got:      usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `rc-core`.
pub type CoreResult<T> = Result<T, CoreError>;
