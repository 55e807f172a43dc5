//! Feature tables: ordered geometry + attribute rows.
//!
//! A [`FeatureTable`] is the unit every pipeline stage exchanges: an ordered
//! `Vec` of [`Feature`]s, a table-level [`Crs`] tag, and the unified column
//! list (the union of attribute names in first-appearance order).  The row
//! index is purely positional — it is regenerated by construction and source
//! indices are never stored, so indices stay dense after a merge.

use std::collections::BTreeMap;

use geo::BoundingRect;
use geo_types::{coord, Geometry, Rect};
use serde::{Deserialize, Serialize};

use crate::crs::Crs;

// ── Attribute values ──────────────────────────────────────────────────────────

/// One attribute cell.  `Null` is the explicit missing marker used when
/// merging tables with heterogeneous schemas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Null,
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::Text(s) => write!(f, "{s}"),
            AttrValue::Number(n) => write!(f, "{n}"),
            AttrValue::Null => write!(f, "null"),
        }
    }
}

// ── Features ──────────────────────────────────────────────────────────────────

/// One row: a geometry plus named attributes.
///
/// The attribute map is ordered (`BTreeMap`) so serialization and equality
/// are deterministic regardless of parse order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Feature {
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry,
            attributes: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> GeometryKind {
        GeometryKind::of(&self.geometry)
    }
}

// ── Geometry classification ───────────────────────────────────────────────────

/// Geometry type tag used by the filter stage.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Line,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Rect,
    Triangle,
}

impl GeometryKind {
    pub fn of(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Line(_) => GeometryKind::Line,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
            Geometry::Rect(_) => GeometryKind::Rect,
            Geometry::Triangle(_) => GeometryKind::Triangle,
        }
    }

    /// Membership in the accepted set: the geometry types the renderer can
    /// draw and the merge step is defined over.
    pub fn is_accepted(self) -> bool {
        matches!(
            self,
            GeometryKind::Point
                | GeometryKind::LineString
                | GeometryKind::MultiLineString
                | GeometryKind::Polygon
                | GeometryKind::MultiPolygon
        )
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::Line => "Line",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
            GeometryKind::Rect => "Rect",
            GeometryKind::Triangle => "Triangle",
        };
        f.write_str(name)
    }
}

// ── Feature table ─────────────────────────────────────────────────────────────

/// An ordered collection of features with a table-level CRS tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    crs: Crs,
    columns: Vec<String>,
    features: Vec<Feature>,
}

impl FeatureTable {
    pub fn new(crs: Crs) -> Self {
        Self {
            crs,
            columns: Vec::new(),
            features: Vec::new(),
        }
    }

    /// Rebuild a table from already-consistent parts (e.g. after reprojection).
    pub fn from_parts(features: Vec<Feature>, crs: Crs, columns: Vec<String>) -> Self {
        Self { crs, columns, features }
    }

    /// Append a row, extending the column list with any unseen attribute names.
    pub fn push(&mut self, feature: Feature) {
        for name in feature.attributes.keys() {
            if !self.columns.iter().any(|c| c == name) {
                self.columns.push(name.clone());
            }
        }
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// The minimal axis-aligned rectangle enclosing every geometry, or
    /// `None` for a table with no bounded geometry.
    pub fn total_bounds(&self) -> Option<Rect<f64>> {
        let mut acc: Option<Rect<f64>> = None;
        for feature in &self.features {
            let Some(r) = feature.geometry.bounding_rect() else {
                continue;
            };
            acc = Some(match acc {
                None => r,
                Some(a) => Rect::new(
                    coord! { x: a.min().x.min(r.min().x), y: a.min().y.min(r.min().y) },
                    coord! { x: a.max().x.max(r.max().x), y: a.max().y.max(r.max().y) },
                ),
            });
        }
        acc
    }
}

// ── Filter ────────────────────────────────────────────────────────────────────

/// Keep only rows whose geometry type is in the accepted set, in order.
///
/// Idempotent; the CRS tag and the column list carry over unchanged.  An
/// empty result means the source contributed nothing (the caller logs, it is
/// not an error).
pub fn filter_accepted(table: &FeatureTable) -> FeatureTable {
    let features = table
        .features
        .iter()
        .filter(|f| f.kind().is_accepted())
        .cloned()
        .collect();
    FeatureTable::from_parts(features, table.crs, table.columns.clone())
}

// ── Merge ─────────────────────────────────────────────────────────────────────

/// Concatenate tables in input order into one table with a dense positional
/// row index and a unified schema.
///
/// The column list is the union of input columns in first-appearance order;
/// attributes a source row lacks are filled with [`AttrValue::Null`].  The
/// CRS tag is taken from the first table (tiles of one dataset share a CRS).
///
/// Returns `None` when the input sequence is empty or contributes zero rows
/// — the caller treats that as "no data".
pub fn merge(tables: Vec<FeatureTable>) -> Option<FeatureTable> {
    let crs = tables.first()?.crs;

    let mut columns: Vec<String> = Vec::new();
    for table in &tables {
        for name in &table.columns {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.clone());
            }
        }
    }

    let total: usize = tables.iter().map(|t| t.len()).sum();
    if total == 0 {
        return None;
    }

    let mut features = Vec::with_capacity(total);
    for table in tables {
        for mut feature in table.features {
            for name in &columns {
                feature
                    .attributes
                    .entry(name.clone())
                    .or_insert(AttrValue::Null);
            }
            features.push(feature);
        }
    }

    Some(FeatureTable { crs, columns, features })
}
