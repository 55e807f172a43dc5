//! Coordinate reference system tag and reprojection.
//!
//! A [`Crs`] is a table-level tag (never per-row).  Reprojection is delegated
//! to `proj4rs` with proj strings resolved from the `crs-definitions` EPSG
//! database.  A handful of JGD2011 codes the bundled database lacks are
//! resolved from a built-in override table instead; see [`proj4_definition`].

use geo::MapCoords;
use geo_types::coord;
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::table::{Feature, FeatureTable};

/// An EPSG-coded coordinate reference system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs(pub u32);

impl Crs {
    /// WGS 84 geographic (longitude/latitude) — used for bounding-box cache keys.
    pub const WGS84: Crs = Crs(4326);

    /// JGD2011 geographic — the horizontal component of EPSG:6697.
    pub const JGD2011_GEO: Crs = Crs(6668);

    /// JGD2011 / Japan Plane Rectangular CS I — the rendering target.
    pub const JGD2011_PLANE_I: Crs = Crs(6669);

    /// JGD2011 geographic 3D + height: the compound CRS PLATEAU tiles declare.
    pub const PLATEAU_DELIVERY: Crs = Crs(6697);

    #[inline]
    pub fn epsg(self) -> u32 {
        self.0
    }

    /// Whether coordinates in this CRS are longitude/latitude degrees.
    pub fn is_geographic(self) -> bool {
        proj4_definition(self.0)
            .map(|def| def.contains("+proj=longlat"))
            .unwrap_or(false)
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// Resolve an EPSG code to a proj4 definition string.
///
/// The `crs-definitions` database predates JGD2011, so the codes the PLATEAU
/// delivery actually uses are supplied here.  EPSG:6697 is a compound
/// (geographic + height) CRS; horizontally it is identical to EPSG:6668.
pub fn proj4_definition(epsg: u32) -> Option<&'static str> {
    match epsg {
        6668 | 6697 => Some("+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs"),
        6669 => Some(
            "+proj=tmerc +lat_0=33 +lon_0=129.5 +k=0.9999 +x_0=0 +y_0=0 \
             +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
        ),
        _ => u16::try_from(epsg)
            .ok()
            .and_then(crs_definitions::from_code)
            .map(|def| def.proj4),
    }
}

// ── Transformer ───────────────────────────────────────────────────────────────

/// A prepared coordinate transform between two CRSs.
///
/// Building the `proj4rs` projections is the expensive part, so one
/// `CrsTransform` is constructed per table and applied per coordinate.
pub struct CrsTransform {
    from: Crs,
    to: Crs,
    source: Proj,
    target: Proj,
    source_geographic: bool,
    target_geographic: bool,
}

impl CrsTransform {
    pub fn new(from: Crs, to: Crs) -> CoreResult<Self> {
        let source_def = proj4_definition(from.0).ok_or(CoreError::UnknownCrs(from))?;
        let target_def = proj4_definition(to.0).ok_or(CoreError::UnknownCrs(to))?;

        let source = Proj::from_proj_string(source_def).map_err(|e| CoreError::InvalidProjection {
            crs: from,
            detail: format!("{e:?}"),
        })?;
        let target = Proj::from_proj_string(target_def).map_err(|e| CoreError::InvalidProjection {
            crs: to,
            detail: format!("{e:?}"),
        })?;

        Ok(Self {
            from,
            to,
            source,
            target,
            source_geographic: from.is_geographic(),
            target_geographic: to.is_geographic(),
        })
    }

    /// Transform a single (x, y) pair.
    ///
    /// `proj4rs` expects radians on geographic ends, so degrees are converted
    /// on the way in and back out.
    pub fn apply(&self, x: f64, y: f64) -> CoreResult<(f64, f64)> {
        let (x_in, y_in) = if self.source_geographic {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };

        let mut point = (x_in, y_in, 0.0);
        transform(&self.source, &self.target, &mut point).map_err(|e| CoreError::Transform {
            from: self.from,
            to: self.to,
            detail: format!("{e:?}"),
        })?;

        if self.target_geographic {
            Ok((point.0.to_degrees(), point.1.to_degrees()))
        } else {
            Ok((point.0, point.1))
        }
    }
}

// ── Table-level normalization ─────────────────────────────────────────────────

/// Reproject a table to `target`, or clone it unchanged when already there.
///
/// # Errors
///
/// Propagates [`CoreError`] when either CRS is unknown or the transform
/// fails for any coordinate.  Per-file containment is the loader's job;
/// reprojection failures are deliberately not contained here.
pub fn reproject(table: &FeatureTable, target: Crs) -> CoreResult<FeatureTable> {
    if table.crs() == target {
        return Ok(table.clone());
    }

    let tf = CrsTransform::new(table.crs(), target)?;

    let features = table
        .features()
        .iter()
        .map(|f| {
            let geometry = f.geometry.try_map_coords(|c| {
                let (x, y) = tf.apply(c.x, c.y)?;
                Ok::<_, CoreError>(coord! { x: x, y: y })
            })?;
            Ok(Feature {
                geometry,
                attributes: f.attributes.clone(),
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(FeatureTable::from_parts(features, target, table.columns().to_vec()))
}
