//! Cache-subsystem error type.

use thiserror::Error;

/// Errors produced by `gv-cache`.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;
