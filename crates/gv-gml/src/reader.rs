//! Streaming GML event parser.
//!
//! One parser core serves every decode strategy; [`ParseOptions`] selects the
//! feature-delimiting behavior (see [`crate::strategy`]).  Element names are
//! matched on their local part so `core:`, `bldg:`, `tran:`, and unprefixed
//! documents all parse the same way.
//!
//! # Coordinate conventions
//!
//! - `srsDimension` 2 or 3 is honored; the height ordinate is dropped.
//! - GML writes geographic pos lists latitude-first; those are swapped to
//!   (x=lon, y=lat).  Projected CRSs are taken in document order.
//! - The CRS comes from the first `srsName` attribute seen (URN, URL, or
//!   `EPSG:n` forms).  Files without one default to EPSG:6697, the PLATEAU
//!   delivery CRS.

use std::collections::BTreeMap;
use std::io::BufRead;

use geo_types::{Coord, Geometry, LineString, MultiLineString, Point, Polygon};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use gv_core::{AttrValue, Crs, Feature, FeatureTable};

use crate::error::GmlError;

// ── Options ───────────────────────────────────────────────────────────────────

pub(crate) struct ParseOptions {
    /// Local names that open one feature (`cityObjectMember`, `featureMember`).
    pub delimiters: &'static [&'static str],
    /// Fail when the document contains none of the delimiter elements.
    pub require_members: bool,
    /// Turn geometries found outside any member into their own features.
    pub standalone_geometries: bool,
    /// Stop at the first fatal XML error but keep what was decoded so far.
    pub tolerate_errors: bool,
}

pub(crate) const CITYGML: ParseOptions = ParseOptions {
    delimiters: &["cityObjectMember"],
    require_members: true,
    standalone_geometries: false,
    tolerate_errors: false,
};

pub(crate) const GML_FEATURE: ParseOptions = ParseOptions {
    delimiters: &["featureMember", "member"],
    require_members: true,
    standalone_geometries: false,
    tolerate_errors: false,
};

pub(crate) const LENIENT: ParseOptions = ParseOptions {
    delimiters: &[],
    require_members: false,
    standalone_geometries: true,
    tolerate_errors: true,
};

// ── Builders ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct PolyBuilder {
    exterior: Option<LineString<f64>>,
    interiors: Vec<LineString<f64>>,
}

#[derive(Default)]
struct FeatureBuilder {
    polygons: Vec<Polygon<f64>>,
    lines: Vec<LineString<f64>>,
    points: Vec<Point<f64>>,
    attributes: BTreeMap<String, AttrValue>,
}

impl FeatureBuilder {
    /// Collapse collected primitives into one geometry.  Polygons win over
    /// line strings (a PLATEAU building carries both a footprint and solid
    /// surfaces); a member with no geometry yields no feature.
    fn into_feature(self) -> Option<Feature> {
        let geometry = if self.polygons.len() > 1 {
            Geometry::MultiPolygon(self.polygons.into())
        } else if let Some(poly) = self.polygons.into_iter().next() {
            Geometry::Polygon(poly)
        } else if self.lines.len() > 1 {
            Geometry::MultiLineString(MultiLineString(self.lines))
        } else if let Some(line) = self.lines.into_iter().next() {
            Geometry::LineString(line)
        } else if let Some(point) = self.points.into_iter().next() {
            Geometry::Point(point)
        } else {
            return None;
        };
        Some(Feature {
            geometry,
            attributes: self.attributes,
        })
    }
}

// ── Text capture routing ──────────────────────────────────────────────────────

enum Capture {
    None,
    PosList,
    Pos,
    Attribute(String),
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct GmlParser<'o> {
    opts: &'o ParseOptions,
    srs: Option<Crs>,
    features: Vec<Feature>,
    current: Option<FeatureBuilder>,
    members_seen: usize,
    cur_poly: Option<PolyBuilder>,
    in_interior: bool,
    in_linestring: bool,
    in_point: bool,
    pending_dim: Option<usize>,
    capture: Capture,
}

impl<'o> GmlParser<'o> {
    fn new(opts: &'o ParseOptions) -> Self {
        Self {
            opts,
            srs: None,
            features: Vec::new(),
            current: None,
            members_seen: 0,
            cur_poly: None,
            in_interior: false,
            in_linestring: false,
            in_point: false,
            pending_dim: None,
            capture: Capture::None,
        }
    }

    fn effective_srs(&self) -> Crs {
        self.srs.unwrap_or(Crs::PLATEAU_DELIVERY)
    }

    fn in_geometry(&self) -> bool {
        self.cur_poly.is_some() || self.in_linestring || self.in_point
    }

    fn scan_attributes(&mut self, e: &BytesStart<'_>, is_pos_element: bool) {
        for attr in e.attributes().flatten() {
            let key = attr.key.local_name();
            let Ok(value) = attr.unescape_value() else {
                continue;
            };
            match key.as_ref() {
                b"srsName" => {
                    if self.srs.is_none() {
                        self.srs = parse_srs_name(&value);
                    }
                }
                b"srsDimension" if is_pos_element => {
                    self.pending_dim = value.trim().parse().ok();
                }
                _ => {}
            }
        }
    }

    fn on_start(&mut self, e: &BytesStart<'_>) {
        let name = e.local_name();
        let name = name.as_ref();

        let is_pos_element = matches!(name, b"posList" | b"pos" | b"coordinates");
        self.scan_attributes(e, is_pos_element);

        if self
            .opts
            .delimiters
            .iter()
            .any(|d| d.as_bytes() == name)
        {
            self.members_seen += 1;
            if self.current.is_none() {
                self.current = Some(FeatureBuilder::default());
            }
            self.capture = Capture::None;
            return;
        }

        match name {
            b"Polygon" => {
                self.cur_poly = Some(PolyBuilder::default());
                self.in_interior = false;
                self.capture = Capture::None;
            }
            b"interior" => self.in_interior = true,
            b"LineString" | b"Curve" => {
                self.in_linestring = true;
                self.capture = Capture::None;
            }
            b"Point" => {
                self.in_point = true;
                self.capture = Capture::None;
            }
            b"posList" | b"coordinates" => self.capture = Capture::PosList,
            b"pos" => self.capture = Capture::Pos,
            // Envelope corners look like coordinate text but are not geometry.
            b"lowerCorner" | b"upperCorner" => self.capture = Capture::None,
            _ => {
                // A leaf element with text inside a member (and outside any
                // geometry) becomes an attribute column.
                if self.current.is_some() && !self.in_geometry() {
                    self.capture =
                        Capture::Attribute(String::from_utf8_lossy(name).into_owned());
                } else {
                    self.capture = Capture::None;
                }
            }
        }
    }

    fn on_text(&mut self, text: &str) {
        match std::mem::replace(&mut self.capture, Capture::None) {
            Capture::None => {}
            Capture::Attribute(name) => {
                if let Some(cur) = &mut self.current {
                    cur.attributes.insert(name, parse_attr_value(text));
                }
            }
            Capture::PosList | Capture::Pos => {
                let swap = self.effective_srs().is_geographic();
                let coords = parse_pos_list(text, self.pending_dim.take(), swap);
                if coords.is_empty() {
                    return;
                }
                if self.in_point {
                    self.route_point(Point::from(coords[0]));
                } else if self.in_linestring {
                    self.route_line(LineString::from(coords));
                } else if let Some(poly) = &mut self.cur_poly {
                    let ring = LineString::from(coords);
                    if self.in_interior {
                        poly.interiors.push(ring);
                    } else if poly.exterior.is_none() {
                        poly.exterior = Some(ring);
                    }
                }
            }
        }
    }

    fn on_end(&mut self, name: &[u8]) {
        if self
            .opts
            .delimiters
            .iter()
            .any(|d| d.as_bytes() == name)
        {
            if let Some(feature) = self.current.take().and_then(FeatureBuilder::into_feature) {
                self.features.push(feature);
            }
            return;
        }

        match name {
            b"Polygon" => {
                if let Some(builder) = self.cur_poly.take() {
                    if let Some(exterior) = builder.exterior {
                        self.route_polygon(Polygon::new(exterior, builder.interiors));
                    }
                }
                self.in_interior = false;
            }
            b"interior" => self.in_interior = false,
            b"LineString" | b"Curve" => self.in_linestring = false,
            b"Point" => self.in_point = false,
            _ => {}
        }
        self.capture = Capture::None;
    }

    fn route_polygon(&mut self, poly: Polygon<f64>) {
        if let Some(cur) = &mut self.current {
            cur.polygons.push(poly);
        } else if self.opts.standalone_geometries {
            self.features.push(Feature::new(Geometry::Polygon(poly)));
        }
    }

    fn route_line(&mut self, line: LineString<f64>) {
        if let Some(cur) = &mut self.current {
            cur.lines.push(line);
        } else if self.opts.standalone_geometries {
            self.features.push(Feature::new(Geometry::LineString(line)));
        }
    }

    fn route_point(&mut self, point: Point<f64>) {
        if let Some(cur) = &mut self.current {
            cur.points.push(point);
        } else if self.opts.standalone_geometries {
            self.features.push(Feature::new(Geometry::Point(point)));
        }
    }

    fn finish(mut self) -> Result<FeatureTable, GmlError> {
        // An unclosed member (truncated document in lenient mode) still
        // contributes what it collected.
        if let Some(feature) = self.current.take().and_then(FeatureBuilder::into_feature) {
            self.features.push(feature);
        }

        if self.opts.require_members && self.members_seen == 0 {
            return Err(GmlError::Xml(format!(
                "document has no <{}> elements",
                self.opts.delimiters.first().copied().unwrap_or("member")
            )));
        }

        let mut table = FeatureTable::new(self.effective_srs());
        for feature in self.features {
            table.push(feature);
        }
        Ok(table)
    }
}

/// Run the event loop over `reader` with the given options.
pub(crate) fn parse<R: BufRead>(reader: R, opts: &ParseOptions) -> Result<FeatureTable, GmlError> {
    let mut xml = Reader::from_reader(reader);
    let config = xml.config_mut();
    config.trim_text_start = true;
    config.trim_text_end = true;
    if opts.tolerate_errors {
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
    }

    let mut parser = GmlParser::new(opts);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.on_start(&e),
            Ok(Event::Empty(e)) => {
                // Self-closing elements carry attributes (srsName on an
                // empty Envelope) but never text.
                parser.on_start(&e);
                parser.capture = Capture::None;
                let name = e.local_name();
                parser.on_end(name.as_ref());
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| GmlError::Xml(e.to_string()))?;
                parser.on_text(&text);
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                parser.on_end(name.as_ref());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) if opts.tolerate_errors => {
                // Keep whatever decoded cleanly before the breakage; an
                // empty harvest is reported by the strategy runner.
                if parser.features.is_empty() && parser.current.is_none() {
                    return Err(GmlError::Xml(err.to_string()));
                }
                break;
            }
            Err(err) => return Err(GmlError::Xml(err.to_string())),
        }
        buf.clear();
    }

    parser.finish()
}

// ── Text helpers ──────────────────────────────────────────────────────────────

/// Extract an EPSG code from the common `srsName` spellings:
/// `EPSG:6697`, `urn:ogc:def:crs:EPSG::6697`,
/// `http://www.opengis.net/def/crs/EPSG/0/6697`.
fn parse_srs_name(value: &str) -> Option<Crs> {
    value
        .rsplit(|c| c == ':' || c == '/')
        .find_map(|tok| tok.parse::<u32>().ok())
        .map(Crs)
}

/// Parse a whitespace-separated ordinate list into 2D coordinates.
///
/// `dim` comes from `srsDimension` when present.  Otherwise 2 is assumed,
/// except for an odd ordinate count divisible by three (unambiguously 3D).
fn parse_pos_list(text: &str, dim: Option<usize>, swap_latlon: bool) -> Vec<Coord<f64>> {
    let values: Vec<f64> = text
        .split_whitespace()
        .filter_map(|tok| tok.parse().ok())
        .collect();

    let dim = dim.filter(|d| *d >= 2).unwrap_or_else(|| {
        if values.len() % 2 != 0 && values.len() % 3 == 0 {
            3
        } else {
            2
        }
    });

    values
        .chunks_exact(dim)
        .map(|chunk| {
            if swap_latlon {
                Coord { x: chunk[1], y: chunk[0] }
            } else {
                Coord { x: chunk[0], y: chunk[1] }
            }
        })
        .collect()
}

/// Numeric-looking attribute text becomes a `Number`, everything else `Text`.
///
/// Non-finite parses ("NaN", "inf") stay `Text`: the cache encoding cannot
/// represent them as numbers, and a table must round-trip through the cache
/// unchanged.
fn parse_attr_value(text: &str) -> AttrValue {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => AttrValue::Number(n),
        _ => AttrValue::Text(trimmed.to_string()),
    }
}
