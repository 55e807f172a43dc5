//! `gv-pipeline` — the load → filter → merge → cache → render driver.
//!
//! | Module     | Contents                                  |
//! |------------|-------------------------------------------|
//! | [`config`] | `PipelineConfig`                          |
//! | [`driver`] | `Pipeline`, `RunSummary`                  |
//! | [`merge`]  | `merge_and_cache` (bbox-keyed merge tool) |
//! | [`error`]  | `PipelineError`, `PipelineResult`         |

pub mod config;
pub mod driver;
pub mod error;
pub mod merge;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::PipelineConfig;
pub use driver::{Pipeline, RunSummary};
pub use error::{PipelineError, PipelineResult};
pub use merge::merge_and_cache;
