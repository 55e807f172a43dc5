//! merge_bldg — merge the stock building tiles into one cached table.
//!
//! Unlike the main program's fixed `buildings_cache.pkl`, the entry name is
//! derived from the merged dataset's WGS84 bounding box, so merges of
//! different areas coexist in the same cache directory.

use std::path::{Path, PathBuf};

use anyhow::Result;

use gv_pipeline::{merge_and_cache, PipelineConfig};

fn main() -> Result<()> {
    let config = PipelineConfig::default();
    let files: Vec<PathBuf> = config
        .building_files
        .iter()
        .map(|name| config.building_dir.join(name))
        .collect();

    merge_and_cache(&files, Path::new("."))?;
    Ok(())
}
