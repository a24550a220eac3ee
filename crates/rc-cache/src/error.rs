//! Cache error type.

use thiserror::Error;

/// Errors produced by the cache registry.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache already exists with id: {0}")]
    AlreadyExists(String),

    #[error("no cache registered with id: {0}")]
    NotFound(String),

    #[error("cache {0} holds a different key/value type than requested")]
    TypeMismatch(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
