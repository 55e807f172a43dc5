//! Loader error type.

use thiserror::Error;

/// One failed decode attempt: which strategy, and why.
#[derive(Debug, Clone)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub cause: String,
}

/// Errors produced by `gv-gml`.
#[derive(Debug, Error)]
pub enum GmlError {
    /// Every decode strategy failed or produced an empty table.  Carries the
    /// per-strategy causes so the batch log can say why a file was skipped.
    #[error("no usable data: {}", join_attempts(.attempts))]
    NoUsableData { attempts: Vec<StrategyFailure> },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GmlResult<T> = Result<T, GmlError>;

fn join_attempts(attempts: &[StrategyFailure]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.strategy, a.cause))
        .collect::<Vec<_>>()
        .join("; ")
}
