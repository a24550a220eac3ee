use rc_cache::CacheError;
use rc_distance::DistanceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("application configuration error: {0}")]
    Config(String),

    #[error("cache setup failed: {0}")]
    Cache(#[from] CacheError),

    #[error("distance engine setup failed: {0}")]
    Distance(#[from] DistanceError),
}

pub type AppResult<T> = Result<T, AppError>;
