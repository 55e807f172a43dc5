//! Renderer error type.

use thiserror::Error;

/// Errors produced by `gv-render`.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Both layers were absent or contained no bounded geometry.  The driver
    /// checks for this case before calling the renderer; hitting it here
    /// means a caller skipped that check.
    #[error("nothing to draw: no features in either layer")]
    NothingToDraw,

    #[error("drawing failed: {0}")]
    Draw(String),
}

impl RenderError {
    /// Collapse `plotters`' backend-generic error types into one variant.
    pub(crate) fn draw<E: std::fmt::Display>(e: E) -> Self {
        RenderError::Draw(e.to_string())
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
