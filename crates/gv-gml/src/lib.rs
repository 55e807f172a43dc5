//! `gv-gml` — CityGML/GML feature loading for the `gmlviz` pipeline.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`strategy`] | `load_gml`, `LoadedTable`, the ordered `STRATEGIES` list |
//! | [`reader`]   | streaming event parser shared by all strategies          |
//! | [`error`]    | `GmlError`, `GmlResult`, `StrategyFailure`               |

pub mod error;
mod reader;
pub mod strategy;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{GmlError, GmlResult, StrategyFailure};
pub use strategy::{load_gml, LoadedTable, STRATEGIES};
