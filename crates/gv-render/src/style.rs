//! Fixed visual styles for the two layers.
//!
//! Roads: thin, light, semi-transparent.  Buildings: filled with a darker
//! outline.  Draw order (roads first) plus the opaque-ish building fill is
//! what makes buildings occlude roads at overlaps.

use plotters::style::{Color, RGBAColor, RGBColor};

const LIGHT_GRAY: RGBColor = RGBColor(211, 211, 211);
const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
const DARK_BLUE: RGBColor = RGBColor(0, 0, 139);

/// Style of one map layer.
pub struct LayerStyle {
    pub label: &'static str,
    pub fill: RGBAColor,
    pub stroke: RGBAColor,
    pub stroke_width: u32,
}

pub fn roads() -> LayerStyle {
    LayerStyle {
        label: "Roads",
        fill: LIGHT_GRAY.mix(0.7),
        stroke: LIGHT_GRAY.mix(0.7),
        stroke_width: 1,
    }
}

pub fn buildings() -> LayerStyle {
    LayerStyle {
        label: "Buildings",
        fill: LIGHT_BLUE.mix(0.8),
        stroke: DARK_BLUE.mix(1.0),
        stroke_width: 1,
    }
}
