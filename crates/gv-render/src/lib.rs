//! `gv-render` — static overlay map rendering.
//!
//! | Module    | Contents                                   |
//! |-----------|--------------------------------------------|
//! | [`map`]   | `render_map`, `RenderOptions`              |
//! | [`style`] | fixed layer styles (roads / buildings)     |
//! | [`error`] | `RenderError`, `RenderResult`              |

pub mod error;
pub mod map;
pub mod style;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{RenderError, RenderResult};
pub use map::{render_map, RenderOptions};
