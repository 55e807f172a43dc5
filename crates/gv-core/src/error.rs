//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::crs::Crs;

/// Errors produced by `gv-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0} is not in the EPSG definition database")]
    UnknownCrs(Crs),

    #[error("invalid projection for {crs}: {detail}")]
    InvalidProjection { crs: Crs, detail: String },

    #[error("coordinate transform {from} -> {to} failed: {detail}")]
    Transform { from: Crs, to: Crs, detail: String },
}

/// Shorthand result type for `gv-core`.
pub type CoreResult<T> = Result<T, CoreError>;
