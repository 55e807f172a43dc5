//! Pipeline driver.
//!
//! Linear sequence, no state machine: load buildings (cache-or-source),
//! load roads (cache-or-source), print the data summary, bail out on the
//! no-data terminal case, normalize both layers to the target CRS, render.
//!
//! Per-file failures are contained here: a file that no strategy can decode
//! is logged and skipped, and the batch continues.

use std::time::Instant;

use gv_cache::CacheStore;
use gv_core::{filter_accepted, merge, reproject, FeatureTable};
use gv_gml::{load_gml, STRATEGIES};
use gv_render::render_map;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;

/// What one run produced, for callers and tests.
#[derive(Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Merged building count, `None` when the category had no data.
    pub buildings: Option<usize>,
    /// Merged road feature count.
    pub roads: Option<usize>,
    /// Whether a raster was written.
    pub rendered: bool,
}

/// One configured load→merge→cache→render pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    cache: CacheStore,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let cache = CacheStore::new(&config.cache_dir);
        Self { config, cache }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline.
    ///
    /// # Errors
    ///
    /// Cache I/O, reprojection, and rendering failures abort the run.
    /// Individual source files never do.
    pub fn run(&self) -> PipelineResult<RunSummary> {
        let buildings = self.load_category(
            "building",
            &self.config.building_dir,
            &self.config.building_files,
            &self.config.building_cache_key,
            "buildings",
        )?;
        let roads = self.load_category(
            "road",
            &self.config.road_dir,
            &self.config.road_files,
            &self.config.road_cache_key,
            "road features",
        )?;

        print_summary(buildings.as_ref(), roads.as_ref());

        if buildings.is_none() && roads.is_none() {
            println!("No data to visualize! Please check your data files.");
            return Ok(RunSummary {
                buildings: None,
                roads: None,
                rendered: false,
            });
        }

        println!("Creating visualization...");
        let buildings_norm = buildings
            .as_ref()
            .map(|t| reproject(t, self.config.target_crs))
            .transpose()?;
        let roads_norm = roads
            .as_ref()
            .map(|t| reproject(t, self.config.target_crs))
            .transpose()?;

        render_map(
            &self.config.output_path,
            buildings_norm.as_ref(),
            roads_norm.as_ref(),
            &self.config.render,
        )?;

        println!(
            "Plot saved successfully! You can view the image file: {}",
            self.config.output_path.display()
        );

        Ok(RunSummary {
            buildings: buildings.map(|t| t.len()),
            roads: roads.map(|t| t.len()),
            rendered: true,
        })
    }

    /// Load one category, cache-or-source.
    ///
    /// A cache hit short-circuits source loading entirely.  Otherwise each
    /// configured file is existence-checked (absent files skipped silently),
    /// decoded through the strategy chain, geometry-filtered, and the
    /// non-empty results merged and cached.
    fn load_category(
        &self,
        label: &str,
        dir: &std::path::Path,
        files: &[String],
        cache_key: &str,
        total_label: &str,
    ) -> PipelineResult<Option<FeatureTable>> {
        if let Some(table) = self.cache.load(cache_key)? {
            println!("Loading {label}s from cache...");
            return Ok(Some(table));
        }

        println!("Loading {label} GML files...");
        let start = Instant::now();

        let mut tables = Vec::new();
        for file in files {
            let path = dir.join(file);
            if !path.exists() {
                continue;
            }
            match load_gml(&path) {
                Ok(loaded) => {
                    let filtered = filter_accepted(&loaded.table);
                    if filtered.is_empty() {
                        println!("No valid geometries in {file}");
                        continue;
                    }
                    if loaded.strategy == STRATEGIES[0].name {
                        println!("Loaded: {file} ({} features)", filtered.len());
                    } else {
                        println!(
                            "Loaded: {file} ({} features) [via {}]",
                            filtered.len(),
                            loaded.strategy
                        );
                    }
                    tables.push(filtered);
                }
                Err(e) => println!("Failed to load {file}: {e}"),
            }
        }

        match merge(tables) {
            Some(table) => {
                self.cache.save(cache_key, &table)?;
                println!(
                    "{}s loaded in {:.2} seconds",
                    capitalized(label),
                    start.elapsed().as_secs_f64()
                );
                println!("Total {total_label}: {}", table.len());
                Ok(Some(table))
            }
            None => {
                println!("No {label} files found!");
                Ok(None)
            }
        }
    }
}

// ── Summary printing ──────────────────────────────────────────────────────────

fn print_summary(buildings: Option<&FeatureTable>, roads: Option<&FeatureTable>) {
    print!("{}", summary_text(buildings, roads));
}

/// The data summary block: header bars, the building info, a blank line,
/// the road info, closing bar.
pub(crate) fn summary_text(
    buildings: Option<&FeatureTable>,
    roads: Option<&FeatureTable>,
) -> String {
    let bar = "=".repeat(50);
    let mut out = String::new();
    out.push('\n');
    out.push_str(&bar);
    out.push('\n');
    out.push_str("DATA SUMMARY\n");
    out.push_str(&bar);
    out.push('\n');
    out.push_str(&table_info("Buildings", buildings));
    out.push('\n');
    out.push_str(&table_info("Roads", roads));
    out.push_str(&bar);
    out.push('\n');
    out
}

fn table_info(name: &str, table: Option<&FeatureTable>) -> String {
    let Some(table) = table else {
        return format!("{name}: No data loaded\n");
    };
    let bounds = match table.total_bounds() {
        Some(b) => format!("[{} {} {} {}]", b.min().x, b.min().y, b.max().x, b.max().y),
        None => "none".to_string(),
    };
    format!(
        "{name}:\n  - Total features: {}\n  - CRS: {}\n  - Bounds: {bounds}\n  - Columns: {:?}\n",
        table.len(),
        table.crs(),
        table.columns(),
    )
}

pub(crate) fn capitalized(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
