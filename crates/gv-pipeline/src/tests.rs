//! Integration-style tests for the pipeline driver.
//!
//! Each test builds a disposable PLATEAU-like directory layout (bldg/,
//! tran/, cache/) in a tempdir and runs the real pipeline over it with a
//! small raster size.

#[cfg(test)]
mod fixtures {
    use std::fs;
    use std::path::Path;

    /// CityGML building tile: `n` one-polygon buildings near
    /// (lat 35.0, lon 138.0), EPSG:6697.
    pub fn building_tile(n: usize) -> String {
        let mut members = String::new();
        for i in 0..n {
            let lat = 35.0 + i as f64 * 0.001;
            members.push_str(&format!(
                r#"  <core:cityObjectMember>
    <bldg:Building>
      <bldg:measuredHeight>10.5</bldg:measuredHeight>
      <gml:Polygon>
        <gml:exterior><gml:LinearRing>
          <gml:posList srsDimension="3">{lat} 138.0 0 {lat} 138.0005 0 {lat2} 138.0005 0 {lat2} 138.0 0 {lat} 138.0 0</gml:posList>
        </gml:LinearRing></gml:exterior>
      </gml:Polygon>
    </bldg:Building>
  </core:cityObjectMember>
"#,
                lat = lat,
                lat2 = lat + 0.0005,
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<core:CityModel xmlns:core="http://www.opengis.net/citygml/2.0"
    xmlns:bldg="http://www.opengis.net/citygml/building/2.0"
    xmlns:gml="http://www.opengis.net/gml">
  <gml:boundedBy>
    <gml:Envelope srsName="http://www.opengis.net/def/crs/EPSG/0/6697"/>
  </gml:boundedBy>
{members}</core:CityModel>
"#
        )
    }

    /// Road tile with `n` line-string features, EPSG:6697.
    pub fn road_tile(n: usize) -> String {
        let mut members = String::new();
        for i in 0..n {
            let lat = 35.0 + i as f64 * 0.002;
            members.push_str(&format!(
                r#"  <core:cityObjectMember>
    <tran:Road>
      <gml:LineString>
        <gml:posList>{lat} 138.0 {lat} 138.01</gml:posList>
      </gml:LineString>
    </tran:Road>
  </core:cityObjectMember>
"#
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<core:CityModel xmlns:core="http://www.opengis.net/citygml/2.0"
    xmlns:tran="http://www.opengis.net/citygml/transportation/2.0"
    xmlns:gml="http://www.opengis.net/gml">
  <gml:boundedBy>
    <gml:Envelope srsName="urn:ogc:def:crs:EPSG::6697"/>
  </gml:boundedBy>
{members}</core:CityModel>
"#
        )
    }

    /// One-building tile whose footprint exactly spans the given lon/lat box.
    pub fn building_tile_spanning(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<core:CityModel xmlns:core="http://www.opengis.net/citygml/2.0"
    xmlns:gml="http://www.opengis.net/gml">
  <gml:boundedBy>
    <gml:Envelope srsName="urn:ogc:def:crs:EPSG::6697"/>
  </gml:boundedBy>
  <core:cityObjectMember>
    <building>
      <gml:Polygon>
        <gml:exterior><gml:LinearRing>
          <gml:posList>{lat0} {lon0} {lat0} {lon1} {lat1} {lon1} {lat1} {lon0} {lat0} {lon0}</gml:posList>
        </gml:LinearRing></gml:exterior>
      </gml:Polygon>
    </building>
  </core:cityObjectMember>
</core:CityModel>
"#
        )
    }

    pub fn write(dir: &Path, name: &str, contents: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), contents).unwrap();
    }
}

#[cfg(test)]
mod driver {
    use std::fs;
    use std::path::Path;

    use gv_core::Crs;
    use gv_render::RenderOptions;

    use crate::{Pipeline, PipelineConfig, RunSummary};

    use super::fixtures::{building_tile, road_tile, write};

    fn test_config(root: &Path) -> PipelineConfig {
        PipelineConfig {
            building_dir: root.join("bldg"),
            road_dir: root.join("tran"),
            building_files: vec![
                "a_bldg.gml".to_string(),
                "b_bldg.gml".to_string(),
                "missing_bldg.gml".to_string(),
            ],
            road_files: vec!["a_tran.gml".to_string()],
            cache_dir: root.join("cache"),
            building_cache_key: gv_cache::BUILDINGS_KEY.to_string(),
            road_cache_key: gv_cache::ROADS_KEY.to_string(),
            output_path: root.join("building_road_visualization.png"),
            target_crs: Crs::JGD2011_PLANE_I,
            render: RenderOptions {
                width: 320,
                height: 256,
                ..RenderOptions::default()
            },
        }
    }

    fn populate_sources(root: &Path) {
        write(&root.join("bldg"), "a_bldg.gml", &building_tile(3));
        write(&root.join("bldg"), "b_bldg.gml", &building_tile(5));
        write(&root.join("tran"), "a_tran.gml", &road_tile(4));
    }

    #[test]
    fn end_to_end_counts_and_raster() {
        let dir = tempfile::tempdir().unwrap();
        populate_sources(dir.path());

        let config = test_config(dir.path());
        let output = config.output_path.clone();
        let summary = Pipeline::new(config).run().unwrap();

        assert_eq!(
            summary,
            RunSummary {
                buildings: Some(8),
                roads: Some(4),
                rendered: true,
            }
        );
        assert!(fs::metadata(&output).unwrap().len() > 0);
    }

    #[test]
    fn no_data_creates_no_raster() {
        let dir = tempfile::tempdir().unwrap();
        // Directories exist but hold none of the configured files.
        fs::create_dir_all(dir.path().join("bldg")).unwrap();
        fs::create_dir_all(dir.path().join("tran")).unwrap();

        let config = test_config(dir.path());
        let output = config.output_path.clone();
        let summary = Pipeline::new(config).run().unwrap();

        assert_eq!(
            summary,
            RunSummary {
                buildings: None,
                roads: None,
                rendered: false,
            }
        );
        assert!(!output.exists(), "no raster may be written without data");
    }

    #[test]
    fn cache_short_circuits_source_loading() {
        let dir = tempfile::tempdir().unwrap();
        populate_sources(dir.path());

        let first = Pipeline::new(test_config(dir.path())).run().unwrap();
        assert_eq!(first.buildings, Some(8));

        // Source tiles gone; the caches must carry the second run alone.
        fs::remove_dir_all(dir.path().join("bldg")).unwrap();
        fs::remove_dir_all(dir.path().join("tran")).unwrap();

        let second = Pipeline::new(test_config(dir.path())).run().unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn one_category_alone_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("tran"), "a_tran.gml", &road_tile(4));

        let summary = Pipeline::new(test_config(dir.path())).run().unwrap();
        assert_eq!(
            summary,
            RunSummary {
                buildings: None,
                roads: Some(4),
                rendered: true,
            }
        );
    }

    #[test]
    fn undecodable_file_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        populate_sources(dir.path());
        // Overwrite one configured tile with noise.
        write(&dir.path().join("bldg"), "b_bldg.gml", "not gml at all");

        let summary = Pipeline::new(test_config(dir.path())).run().unwrap();
        assert_eq!(summary.buildings, Some(3));
        assert_eq!(summary.roads, Some(4));
        assert!(summary.rendered);
    }
}

#[cfg(test)]
mod console {
    use std::collections::BTreeMap;

    use geo_types::{polygon, Geometry};

    use gv_core::{Crs, Feature, FeatureTable};

    use crate::driver::{capitalized, summary_text};

    fn one_row_table() -> FeatureTable {
        let mut t = FeatureTable::new(Crs::JGD2011_PLANE_I);
        t.push(Feature {
            geometry: Geometry::Polygon(polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
            ]),
            attributes: BTreeMap::new(),
        });
        t
    }

    #[test]
    fn category_labels_capitalize_for_timing_lines() {
        assert_eq!(capitalized("building"), "Building");
        assert_eq!(capitalized("road"), "Road");
        assert_eq!(capitalized(""), "");
    }

    #[test]
    fn summary_separates_blocks_with_a_blank_line() {
        let table = one_row_table();
        let text = summary_text(Some(&table), None);

        assert!(text.contains("DATA SUMMARY"));
        assert!(text.contains("Buildings:\n"));
        // The road block starts after an empty line.
        assert!(text.contains("\n\nRoads: No data loaded"), "{text}");
    }

    #[test]
    fn summary_reports_missing_categories() {
        let text = summary_text(None, None);
        assert!(text.contains("Buildings: No data loaded"));
        assert!(text.contains("Roads: No data loaded"));
    }
}

#[cfg(test)]
mod merge_tool {
    use gv_cache::CacheStore;

    use crate::merge_and_cache;

    use super::fixtures::{building_tile_spanning, write};

    #[test]
    fn derives_bbox_key_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let bldg = dir.path().join("bldg");
        write(
            &bldg,
            "tile.gml",
            &building_tile_spanning(138.1, 35.1, 138.2, 35.2),
        );

        let cache_dir = dir.path().join("cache");
        let key = merge_and_cache(&[bldg.join("tile.gml")], &cache_dir)
            .unwrap()
            .expect("one tile contributed data");

        // JGD2011 and WGS84 agree to well under 1e-4 degrees, so the key is
        // exactly the fixture's extent.
        assert_eq!(key, "bldg_merged_LL_138.1000_35.1000_UR_138.2000_35.2000.pkl");

        let store = CacheStore::new(&cache_dir);
        let table = store.load(&key).unwrap().expect("cache entry exists");
        assert_eq!(table.len(), 1);
        // Stored in the source CRS, not WGS84.
        assert_eq!(table.crs(), gv_core::Crs::PLATEAU_DELIVERY);
    }

    #[test]
    fn nothing_to_merge_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("cache");

        let key = merge_and_cache(&[dir.path().join("absent.gml")], &cache_dir).unwrap();
        assert!(key.is_none());
        assert!(!cache_dir.exists());
    }
}
