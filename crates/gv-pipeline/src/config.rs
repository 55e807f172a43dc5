//! Pipeline configuration.
//!
//! Everything the driver needs is passed in explicitly at construction time;
//! there is no global state.  `Default` reproduces the stock PLATEAU tile
//! layout the tool ships for: `bldg/` and `tran/` directories, nine tiles
//! each, caches and output in the working directory.

use std::path::PathBuf;

use gv_core::Crs;
use gv_render::RenderOptions;

/// Full configuration for one pipeline run.
pub struct PipelineConfig {
    pub building_dir: PathBuf,
    pub road_dir: PathBuf,
    pub building_files: Vec<String>,
    pub road_files: Vec<String>,
    /// Directory holding cache entries and receiving new ones.
    pub cache_dir: PathBuf,
    pub building_cache_key: String,
    pub road_cache_key: String,
    /// Raster output; overwritten on every run.
    pub output_path: PathBuf,
    /// CRS both layers are normalized to before rendering.
    pub target_crs: Crs,
    pub render: RenderOptions,
}

/// The nine second-grade mesh tiles of the stock dataset, per category.
fn tile_names(category: &str) -> Vec<String> {
    [
        "52350338", "52350328", "52350318", "52350339", "52350329", "52350319", "52350430",
        "52350420", "52350410",
    ]
    .iter()
    .map(|mesh| format!("{mesh}_{category}_6697_op.gml"))
    .collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            building_dir: PathBuf::from("bldg"),
            road_dir: PathBuf::from("tran"),
            building_files: tile_names("bldg"),
            road_files: tile_names("tran"),
            cache_dir: PathBuf::from("."),
            building_cache_key: gv_cache::BUILDINGS_KEY.to_string(),
            road_cache_key: gv_cache::ROADS_KEY.to_string(),
            output_path: PathBuf::from("building_road_visualization.png"),
            target_crs: Crs::JGD2011_PLANE_I,
            render: RenderOptions::default(),
        }
    }
}
