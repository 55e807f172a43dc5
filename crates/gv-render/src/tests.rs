//! Unit tests for gv-render.
//!
//! Rendering tests write small PNGs into a temp directory and assert on the
//! produced file, not on pixels.

#[cfg(test)]
mod render {
    use std::collections::BTreeMap;

    use geo_types::{line_string, polygon, Geometry};

    use gv_core::{Crs, Feature, FeatureTable};

    use crate::{render_map, RenderError, RenderOptions};

    fn building_table() -> FeatureTable {
        let mut t = FeatureTable::new(Crs::JGD2011_PLANE_I);
        for i in 0..3 {
            let x0 = 1_000.0 + i as f64 * 50.0;
            t.push(Feature {
                geometry: Geometry::Polygon(polygon![
                    (x: x0, y: 2_000.0),
                    (x: x0 + 20.0, y: 2_000.0),
                    (x: x0 + 20.0, y: 2_030.0),
                    (x: x0, y: 2_030.0),
                ]),
                attributes: BTreeMap::new(),
            });
        }
        t
    }

    fn road_table() -> FeatureTable {
        let mut t = FeatureTable::new(Crs::JGD2011_PLANE_I);
        t.push(Feature {
            geometry: Geometry::LineString(line_string![
                (x: 900.0, y: 1_990.0),
                (x: 1_200.0, y: 2_040.0),
            ]),
            attributes: BTreeMap::new(),
        });
        t
    }

    fn small_opts() -> RenderOptions {
        RenderOptions {
            width: 640,
            height: 480,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn writes_a_png_with_both_layers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");

        render_map(
            &path,
            Some(&building_table()),
            Some(&road_table()),
            &small_opts(),
        )
        .unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0, "raster file must not be empty");
    }

    #[test]
    fn renders_with_a_single_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("only_roads.png");

        render_map(&path, None, Some(&road_table()), &small_opts()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");

        std::fs::write(&path, b"stale").unwrap();
        render_map(&path, Some(&building_table()), None, &small_opts()).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert_ne!(meta.len(), 5, "previous output must be overwritten");
    }

    #[test]
    fn nothing_to_draw_without_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.png");

        let err = render_map(&path, None, None, &small_opts()).unwrap_err();
        assert!(matches!(err, RenderError::NothingToDraw));
        assert!(!path.exists(), "no raster may be created");
    }

    #[test]
    fn empty_tables_are_nothing_to_draw() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.png");

        let empty = FeatureTable::new(Crs::JGD2011_PLANE_I);
        let err = render_map(&path, Some(&empty), Some(&empty), &small_opts()).unwrap_err();
        assert!(matches!(err, RenderError::NothingToDraw));
    }

    #[test]
    fn default_options_are_300_dpi_page() {
        let opts = RenderOptions::default();
        assert_eq!((opts.width, opts.height), (4500, 3600));
    }
}

// ── Axis framing ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod framing {
    use geo_types::{coord, Rect};

    use crate::map::{equal_aspect_ranges, plot_area_size};
    use crate::RenderOptions;

    #[test]
    fn ranges_share_one_scale_across_axes() {
        let opts = RenderOptions {
            width: 800,
            height: 600,
            ..RenderOptions::default()
        };
        // Wide flat extent: the y-axis must be widened to match the x scale.
        let bounds = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1_000.0, y: 10.0 });

        let (plot_w, plot_h) = plot_area_size(&opts);
        let (xr, yr) = equal_aspect_ranges(&bounds, &opts);

        let x_unit = (xr.end - xr.start) / plot_w;
        let y_unit = (yr.end - yr.start) / plot_h;
        assert!(
            (x_unit - y_unit).abs() < 1e-9,
            "x_unit = {x_unit}, y_unit = {y_unit}"
        );

        // The data extent fits inside the padded ranges, centered.
        assert!(xr.start < 0.0 && xr.end > 1_000.0);
        assert!(yr.start < 0.0 && yr.end > 10.0);
        assert!(((xr.start + xr.end) / 2.0 - 500.0).abs() < 1e-9);
    }

    #[test]
    fn plot_area_tracks_figure_size() {
        let small = RenderOptions {
            width: 320,
            height: 256,
            ..RenderOptions::default()
        };
        let large = RenderOptions::default();

        let (sw, sh) = plot_area_size(&small);
        let (lw, lh) = plot_area_size(&large);
        // Decorations are fixed-size, so the difference is the figure-size
        // difference.
        assert!((lw - sw - (large.width - small.width) as f64).abs() < 1e-9);
        assert!((lh - sh - (large.height - small.height) as f64).abs() < 1e-9);
        assert!(sw >= 1.0 && sh >= 1.0);
    }
}
