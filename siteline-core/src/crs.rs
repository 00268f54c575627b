//! Coordinate reference systems and reprojection.
//!
//! The engine recognises exactly two CRSs: geographic WGS84 (EPSG:4326,
//! degrees, `x = longitude`, `y = latitude`) and World Mercator (EPSG:3395,
//! metres). All distance maths runs in World Mercator; buffering in degrees
//! would give a radius whose ground length varies with latitude. A single
//! global projected CRS keeps the design simple at the cost of metric
//! distortion away from the equator, which is acceptable for single-country
//! datasets.

use geo::Coord;
use thiserror::Error;

/// WGS84 semi-major axis in metres.
const SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// WGS84 first eccentricity.
const ECCENTRICITY: f64 = 0.081_819_190_842_622;

/// Convergence threshold for the inverse latitude iteration, in radians.
///
/// Well below the 1e-6 degree round-trip tolerance the engine guarantees.
const INVERSE_TOLERANCE_RAD: f64 = 1e-12;

/// Upper bound on inverse iterations; convergence normally takes 3-5.
const INVERSE_MAX_ITERATIONS: usize = 16;

/// A coordinate reference system tag.
///
/// Every point collection carries one of these; reprojection is an explicit
/// operation that returns a retagged collection, never an implicit state
/// change.
///
/// # Examples
/// ```
/// use siteline_core::Crs;
///
/// assert_eq!(Crs::Wgs84.epsg(), 4326);
/// assert_eq!(Crs::WorldMercator.to_string(), "EPSG:3395");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crs {
    /// Geographic coordinates in degrees (EPSG:4326).
    Wgs84,
    /// World Mercator, metres (EPSG:3395).
    WorldMercator,
}

/// Errors raised when resolving or checking a CRS.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CrsError {
    /// The requested CRS is not one of the two the engine supports.
    #[error("unsupported CRS `{code}`; supported CRSs are EPSG:4326 and EPSG:3395")]
    Unsupported {
        /// The identifier as supplied by the caller.
        code: String,
    },
    /// A collection arrived tagged with the wrong CRS.
    #[error("expected coordinates in {expected}, found {found}")]
    Mismatch {
        /// The CRS the operation requires.
        expected: Crs,
        /// The CRS the collection carried.
        found: Crs,
    },
}

impl Crs {
    /// Return the EPSG code for this CRS.
    #[must_use]
    pub const fn epsg(&self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
            Self::WorldMercator => 3395,
        }
    }

    /// Resolve an EPSG code to a supported CRS.
    ///
    /// # Errors
    /// Returns [`CrsError::Unsupported`] for any code other than 4326 or
    /// 3395. There is no partial-CRS state to recover into, so callers are
    /// expected to treat this as fatal.
    pub fn from_epsg(code: u32) -> Result<Self, CrsError> {
        match code {
            4326 => Ok(Self::Wgs84),
            3395 => Ok(Self::WorldMercator),
            other => Err(CrsError::Unsupported {
                code: format!("EPSG:{other}"),
            }),
        }
    }

    /// Return the canonical `EPSG:nnnn` identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wgs84 => "EPSG:4326",
            Self::WorldMercator => "EPSG:3395",
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Crs {
    type Err = CrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s
            .trim()
            .strip_prefix("EPSG:")
            .or_else(|| s.trim().strip_prefix("epsg:"))
            .unwrap_or_else(|| s.trim());
        code.parse::<u32>()
            .map_err(|_| CrsError::Unsupported {
                code: s.to_owned(),
            })
            .and_then(Self::from_epsg)
    }
}

/// Transform a coordinate between the two supported CRSs.
///
/// Reprojecting into the coordinate's current CRS is the identity. The
/// forward and inverse transforms round-trip to within 1e-6 degrees.
#[must_use]
pub fn reproject(coord: Coord, from: Crs, to: Crs) -> Coord {
    match (from, to) {
        (Crs::Wgs84, Crs::WorldMercator) => project(coord),
        (Crs::WorldMercator, Crs::Wgs84) => unproject(coord),
        (Crs::Wgs84, Crs::Wgs84) | (Crs::WorldMercator, Crs::WorldMercator) => coord,
    }
}

/// Forward ellipsoidal Mercator: degrees to metres.
#[expect(
    clippy::float_arithmetic,
    reason = "EPSG:3395 forward projection is floating-point by nature"
)]
fn project(coord: Coord) -> Coord {
    let lon_rad = coord.x.to_radians();
    let lat_rad = coord.y.to_radians();
    let e_sin = ECCENTRICITY * lat_rad.sin();
    let con = ((1.0 - e_sin) / (1.0 + e_sin)).powf(ECCENTRICITY / 2.0);
    let ts = (std::f64::consts::FRAC_PI_4 + lat_rad / 2.0).tan() * con;
    Coord {
        x: SEMI_MAJOR_AXIS_M * lon_rad,
        y: SEMI_MAJOR_AXIS_M * ts.ln(),
    }
}

/// Inverse ellipsoidal Mercator: metres to degrees.
///
/// Latitude has no closed form; it is recovered by fixed-point iteration,
/// which converges quadratically for `|lat| < 89`.
#[expect(
    clippy::float_arithmetic,
    reason = "EPSG:3395 inverse projection is floating-point by nature"
)]
fn unproject(coord: Coord) -> Coord {
    let lon_rad = coord.x / SEMI_MAJOR_AXIS_M;
    let t = (-coord.y / SEMI_MAJOR_AXIS_M).exp();
    let mut lat_rad = std::f64::consts::FRAC_PI_2 - 2.0 * t.atan();
    for _ in 0..INVERSE_MAX_ITERATIONS {
        let e_sin = ECCENTRICITY * lat_rad.sin();
        let con = ((1.0 - e_sin) / (1.0 + e_sin)).powf(ECCENTRICITY / 2.0);
        let next = std::f64::consts::FRAC_PI_2 - 2.0 * (t * con).atan();
        let done = (next - lat_rad).abs() < INVERSE_TOLERANCE_RAD;
        lat_rad = next;
        if done {
            break;
        }
    }
    Coord {
        x: lon_rad.to_degrees(),
        y: lat_rad.to_degrees(),
    }
}
