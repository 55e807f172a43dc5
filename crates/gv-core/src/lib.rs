//! `gv-core` — foundational types for the `gmlviz` map pipeline.
//!
//! This crate is a dependency of every other `gv-*` crate.  It intentionally
//! has no `gv-*` dependencies; its external dependencies are the geometry
//! stack (`geo`, `geo-types`), the reprojection stack (`proj4rs`,
//! `crs-definitions`), `serde`, and `thiserror`.
//!
//! # What lives here
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`table`] | `Feature`, `AttrValue`, `FeatureTable`, filter, merge      |
//! | [`crs`]   | `Crs` tag, `CrsTransform`, `reproject`                     |
//! | [`error`] | `CoreError`, `CoreResult`                                  |

pub mod crs;
pub mod error;
pub mod table;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use crs::{reproject, Crs, CrsTransform};
pub use error::{CoreError, CoreResult};
pub use table::{filter_accepted, merge, AttrValue, Feature, FeatureTable, GeometryKind};
