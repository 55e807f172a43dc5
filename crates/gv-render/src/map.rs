//! Static overlay map rendering.
//!
//! One figure per run: roads drawn first as the background layer, buildings
//! drawn on top so they occlude roads at overlaps.  Decorations: title, axis
//! labels, legend, grid, north arrow.  Axis ranges are padded to equal
//! aspect — one X unit renders the same number of pixels as one Y unit,
//! which is what keeps the map undistorted.

use std::ops::Range;
use std::path::Path;

use geo_types::{Geometry, LineString, Rect};
use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use gv_core::FeatureTable;

use crate::error::{RenderError, RenderResult};
use crate::style::{self, LayerStyle};

type Pt = (f64, f64);

// ── Options ───────────────────────────────────────────────────────────────────

/// Figure geometry and labeling.
pub struct RenderOptions {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    pub title: String,
}

impl Default for RenderOptions {
    /// 15 in × 12 in at 300 dpi.
    fn default() -> Self {
        Self {
            width: 4500,
            height: 3600,
            title: "Buildings and Roads Visualization".to_string(),
        }
    }
}

// ── Chart layout ──────────────────────────────────────────────────────────────

// Shared by `ChartBuilder` and the plot-area estimate in
// `equal_aspect_ranges`; changing one without the other skews the aspect.
const MARGIN: i32 = 24;
const X_LABEL_AREA: i32 = 70;
const Y_LABEL_AREA: i32 = 110;
const CAPTION_SIZE: i32 = 46;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Render buildings over roads into a PNG at `path`, overwriting any
/// previous file.
///
/// Either layer may be absent; both absent (or unbounded) is
/// [`RenderError::NothingToDraw`] — the pipeline driver checks for that case
/// before calling.
pub fn render_map(
    path: &Path,
    buildings: Option<&FeatureTable>,
    roads: Option<&FeatureTable>,
    opts: &RenderOptions,
) -> RenderResult<()> {
    let bounds = combined_bounds(buildings, roads).ok_or(RenderError::NothingToDraw)?;
    let (x_range, y_range) = equal_aspect_ranges(&bounds, opts);

    let root = BitMapBackend::new(path, (opts.width, opts.height)).into_drawing_area();
    root.fill(&WHITE).map_err(RenderError::draw)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&opts.title, ("sans-serif", CAPTION_SIZE))
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(x_range, y_range)
        .map_err(RenderError::draw)?;

    chart
        .configure_mesh()
        .x_desc("X Coordinate (m)")
        .y_desc("Y Coordinate (m)")
        .axis_desc_style(("sans-serif", 30))
        .label_style(("sans-serif", 22))
        .light_line_style(&BLACK.mix(0.08))
        .bold_line_style(&BLACK.mix(0.18))
        .draw()
        .map_err(RenderError::draw)?;

    // Roads beneath, buildings above.
    if let Some(table) = roads {
        draw_layer(&mut chart, table, &style::roads())?;
    }
    if let Some(table) = buildings {
        draw_layer(&mut chart, table, &style::buildings())?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.85))
        .label_font(("sans-serif", 26))
        .draw()
        .map_err(RenderError::draw)?;

    draw_north_arrow(&root)?;

    root.present().map_err(RenderError::draw)
}

// ── Layers ────────────────────────────────────────────────────────────────────

fn draw_layer<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    table: &FeatureTable,
    layer: &LayerStyle,
) -> RenderResult<()> {
    let mut fills: Vec<Polygon<Pt>> = Vec::new();
    let mut strokes: Vec<PathElement<Pt>> = Vec::new();
    let mut dots: Vec<Circle<Pt, i32>> = Vec::new();

    let stroke = layer.stroke.stroke_width(layer.stroke_width);

    for feature in table.iter() {
        match &feature.geometry {
            Geometry::Polygon(p) => {
                push_polygon(&mut fills, &mut strokes, p, layer, stroke);
            }
            Geometry::MultiPolygon(mp) => {
                for p in &mp.0 {
                    push_polygon(&mut fills, &mut strokes, p, layer, stroke);
                }
            }
            Geometry::LineString(ls) => {
                strokes.push(PathElement::new(points_of(ls), stroke));
            }
            Geometry::MultiLineString(mls) => {
                for ls in &mls.0 {
                    strokes.push(PathElement::new(points_of(ls), stroke));
                }
            }
            Geometry::Point(p) => {
                dots.push(Circle::new((p.x(), p.y()), 4, layer.fill.filled()));
            }
            // Everything else was removed by the geometry filter.
            _ => {}
        }
    }

    let mut labeled = false;

    if !fills.is_empty() {
        let fill = layer.fill;
        chart
            .draw_series(fills)
            .map_err(RenderError::draw)?
            .label(layer.label)
            .legend(move |(x, y)| {
                Rectangle::new([(x - 10, y - 7), (x + 10, y + 7)], fill.filled())
            });
        labeled = true;
    }

    if !strokes.is_empty() {
        let anno = chart.draw_series(strokes).map_err(RenderError::draw)?;
        if !labeled {
            let legend_stroke = layer.stroke.stroke_width(3);
            anno.label(layer.label).legend(move |(x, y)| {
                PathElement::new(vec![(x - 10, y), (x + 10, y)], legend_stroke)
            });
            labeled = true;
        }
    }

    if !dots.is_empty() {
        let anno = chart.draw_series(dots).map_err(RenderError::draw)?;
        if !labeled {
            let fill = layer.fill;
            anno.label(layer.label)
                .legend(move |(x, y)| Circle::new((x, y), 5, fill.filled()));
        }
    }

    Ok(())
}

fn push_polygon(
    fills: &mut Vec<Polygon<Pt>>,
    strokes: &mut Vec<PathElement<Pt>>,
    p: &geo_types::Polygon<f64>,
    layer: &LayerStyle,
    stroke: ShapeStyle,
) {
    let exterior = points_of(p.exterior());
    fills.push(Polygon::new(exterior.clone(), layer.fill.filled()));
    strokes.push(PathElement::new(exterior, stroke));
    // Holes get an outline only; the fill element cannot carve them out.
    for interior in p.interiors() {
        strokes.push(PathElement::new(points_of(interior), stroke));
    }
}

fn points_of(ls: &LineString<f64>) -> Vec<Pt> {
    ls.0.iter().map(|c| (c.x, c.y)).collect()
}

// ── Framing ───────────────────────────────────────────────────────────────────

fn combined_bounds(a: Option<&FeatureTable>, b: Option<&FeatureTable>) -> Option<Rect<f64>> {
    let ra = a.and_then(FeatureTable::total_bounds);
    let rb = b.and_then(FeatureTable::total_bounds);
    match (ra, rb) {
        (Some(x), Some(y)) => Some(Rect::new(
            geo_types::coord! {
                x: x.min().x.min(y.min().x),
                y: x.min().y.min(y.min().y),
            },
            geo_types::coord! {
                x: x.max().x.max(y.max().x),
                y: x.max().y.max(y.max().y),
            },
        )),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}

/// The pixel rectangle left for data once the chart decorations are taken
/// out: margins on all sides, the axis label areas, and the caption strip
/// (one line of caption text).
pub(crate) fn plot_area_size(opts: &RenderOptions) -> (f64, f64) {
    let caption_h = CAPTION_SIZE as f64 * 1.24;
    let plot_w = opts.width as f64 - (2 * MARGIN + Y_LABEL_AREA) as f64;
    let plot_h = opts.height as f64 - (2 * MARGIN + X_LABEL_AREA) as f64 - caption_h;
    (plot_w.max(1.0), plot_h.max(1.0))
}

/// Pad the data bounds 2 % per side, then widen the shorter axis until both
/// axes share one scale (metres per pixel) for the plot area.
pub(crate) fn equal_aspect_ranges(
    bounds: &Rect<f64>,
    opts: &RenderOptions,
) -> (Range<f64>, Range<f64>) {
    let (plot_w, plot_h) = plot_area_size(opts);

    let cx = (bounds.min().x + bounds.max().x) / 2.0;
    let cy = (bounds.min().y + bounds.max().y) / 2.0;
    let span_x = (bounds.max().x - bounds.min().x).max(1e-9) * 1.04;
    let span_y = (bounds.max().y - bounds.min().y).max(1e-9) * 1.04;

    let unit = (span_x / plot_w).max(span_y / plot_h);
    let half_x = unit * plot_w / 2.0;
    let half_y = unit * plot_h / 2.0;

    (cx - half_x..cx + half_x, cy - half_y..cy + half_y)
}

// ── Decorations ───────────────────────────────────────────────────────────────

fn draw_north_arrow<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>) -> RenderResult<()> {
    let x = 48;
    root.draw(&PathElement::new(
        vec![(x, 118), (x, 58)],
        BLACK.stroke_width(3),
    ))
    .map_err(RenderError::draw)?;
    root.draw(&PathElement::new(
        vec![(x - 10, 78), (x, 58), (x + 10, 78)],
        BLACK.stroke_width(3),
    ))
    .map_err(RenderError::draw)?;
    root.draw(&Text::new("N", (x - 9, 126), ("sans-serif", 36)))
        .map_err(RenderError::draw)?;
    Ok(())
}
