//! Cache key derivation.
//!
//! The pipeline uses fixed keys; the merge tool derives its key from the
//! merged dataset's WGS84 bounding box so distinct spatial extents produce
//! distinct, discoverable filenames while identical extents collide
//! deterministically (same extent implies same logical dataset).
//!
//! The `.pkl` names are an on-disk contract: existing cache directories stay
//! discoverable across versions.  The encoding behind them is opaque to
//! everything but [`crate::store`].

use geo_types::Rect;

/// Fixed key for the merged building dataset.
pub const BUILDINGS_KEY: &str = "buildings_cache.pkl";

/// Fixed key for the merged road dataset.
pub const ROADS_KEY: &str = "roads_cache.pkl";

/// Bounding-box-derived key for merged building tiles.
///
/// `bounds` must be in EPSG:4326 (lon/lat).  Format:
/// `bldg_merged_LL_{minLon:.4}_{minLat:.4}_UR_{maxLon:.4}_{maxLat:.4}.pkl`.
pub fn bbox_key(bounds: &Rect<f64>) -> String {
    format!(
        "bldg_merged_LL_{:.4}_{:.4}_UR_{:.4}_{:.4}.pkl",
        bounds.min().x,
        bounds.min().y,
        bounds.max().x,
        bounds.max().y,
    )
}
