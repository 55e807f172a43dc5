//! `gv-cache` — on-disk cache for merged feature tables.
//!
//! | Module    | Contents                                          |
//! |-----------|---------------------------------------------------|
//! | [`store`] | `CacheStore`: load/save tables by key             |
//! | [`key`]   | fixed keys and the bounding-box-derived key       |
//! | [`error`] | `CacheError`, `CacheResult`                       |

pub mod error;
pub mod key;
pub mod store;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CacheError, CacheResult};
pub use key::{bbox_key, BUILDINGS_KEY, ROADS_KEY};
pub use store::CacheStore;
