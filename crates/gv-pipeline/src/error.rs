//! Pipeline error type.
//!
//! Per-file loader failures are contained inside the driver (logged, never
//! raised), so `GmlError` has no variant here.  Everything that legitimately
//! aborts a run — cache I/O, reprojection, rendering — wraps through.

use thiserror::Error;

use gv_cache::CacheError;
use gv_core::CoreError;
use gv_render::RenderError;

/// Errors produced by `gv-pipeline`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
