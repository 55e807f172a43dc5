//! gmlviz — render PLATEAU building and road tiles into one overlay map.
//!
//! Expects the stock tile layout in the working directory (`bldg/` and
//! `tran/`, nine CityGML tiles each); writes per-category caches and
//! `building_road_visualization.png` next to them.  Missing tiles are
//! skipped, so a partial download still renders.

use anyhow::Result;

use gv_pipeline::{Pipeline, PipelineConfig};

fn main() -> Result<()> {
    let title = "Building and Road Visualization Program";
    println!("{title}");
    println!("{}", "=".repeat(title.len()));

    let pipeline = Pipeline::new(PipelineConfig::default());
    pipeline.run()?;
    Ok(())
}
