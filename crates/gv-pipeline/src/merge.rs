//! Bounding-box-keyed merge tool.
//!
//! The counterpart to the full pipeline for tooling workflows: merge a list
//! of building tiles and persist the result under a cache key derived from
//! the dataset's WGS84 extent, so separately merged areas coexist in one
//! cache directory and re-merging the same extent finds the existing file
//! name.

use std::path::{Path, PathBuf};

use gv_cache::{bbox_key, CacheStore};
use gv_core::{filter_accepted, merge, reproject, Crs};
use gv_gml::load_gml;

use crate::error::PipelineResult;

/// Merge the listed tiles and save the result under its bbox-derived key.
///
/// The table is stored in its source CRS; only the key derivation goes
/// through WGS84.  Returns the key, or `None` when no file contributed data.
pub fn merge_and_cache(files: &[PathBuf], cache_dir: &Path) -> PipelineResult<Option<String>> {
    let mut tables = Vec::new();

    for path in files {
        if !path.exists() {
            continue;
        }
        let name = path.display();
        match load_gml(path) {
            Ok(loaded) => {
                let filtered = filter_accepted(&loaded.table);
                if filtered.is_empty() {
                    println!("No valid geometries in {name}");
                } else {
                    println!("Loaded: {name} ({} features)", filtered.len());
                    tables.push(filtered);
                }
            }
            Err(e) => println!("Failed to load {name}: {e}"),
        }
    }

    let Some(merged) = merge(tables) else {
        println!("No building files found!");
        return Ok(None);
    };

    let wgs84 = reproject(&merged, Crs::WGS84)?;
    let Some(bounds) = wgs84.total_bounds() else {
        println!("Merged dataset has no bounded geometry; nothing saved.");
        return Ok(None);
    };

    let key = bbox_key(&bounds);
    let store = CacheStore::new(cache_dir);
    store.save(&key, &merged)?;
    println!("saved as: {}", store.path_for(&key).display());

    Ok(Some(key))
}
