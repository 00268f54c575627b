//! Points of interest and their CRS-tagged collection.

use geo::Coord;

use crate::crs::{Crs, CrsError, reproject};

/// An external reference point such as a bus stop or supermarket.
///
/// The `kind` is the raw tag value from the upstream extract; membership in
/// a semantic category is decided by the
/// [`CategoryTaxonomy`](crate::CategoryTaxonomy), never stored on the POI.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use siteline_core::Poi;
///
/// let stop = Poi::new(Coord { x: -87.62, y: 41.88 }, "bus_stop");
/// assert_eq!(stop.kind, "bus_stop");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Poi {
    /// Position in the collection's CRS.
    pub location: Coord,
    /// Raw tag value, matched against the taxonomy.
    pub kind: String,
}

impl Poi {
    /// Construct a POI from a location and raw tag value.
    pub fn new(location: Coord, kind: impl Into<String>) -> Self {
        Self {
            location,
            kind: kind.into(),
        }
    }
}

/// A set of POIs tagged with the CRS their locations are expressed in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoiCollection {
    crs: Crs,
    records: Vec<Poi>,
}

impl PoiCollection {
    /// Tag `records` with the CRS their coordinates are expressed in.
    #[must_use]
    pub fn new(crs: Crs, records: Vec<Poi>) -> Self {
        Self { crs, records }
    }

    /// The CRS every location in this collection is expressed in.
    #[must_use]
    pub const fn crs(&self) -> Crs {
        self.crs
    }

    /// The records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Poi] {
        &self.records
    }

    /// Number of POIs in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no POIs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reproject every location into `target` and retag the collection.
    #[must_use]
    pub fn to_crs(mut self, target: Crs) -> Self {
        if self.crs != target {
            for poi in &mut self.records {
                poi.location = reproject(poi.location, self.crs, target);
            }
            self.crs = target;
        }
        self
    }

    /// Fail unless the collection is tagged with `expected`.
    pub(crate) fn expect_crs(&self, expected: Crs) -> Result<(), CrsError> {
        if self.crs == expected {
            Ok(())
        } else {
            Err(CrsError::Mismatch {
                expected,
                found: self.crs,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    fn to_crs_retags_and_reprojects() {
        let collection = PoiCollection::new(
            Crs::Wgs84,
            vec![Poi::new(Coord { x: 1.0, y: 0.0 }, "supermarket")],
        );
        let metric = collection.to_crs(Crs::WorldMercator);
        assert_eq!(metric.crs(), Crs::WorldMercator);
        let x = metric.records().first().map(|p| p.location.x);
        assert_abs_diff_eq!(x.unwrap_or_default(), 111_319.490_793, epsilon = 1e-3);
    }

    #[rstest]
    fn to_crs_same_target_is_identity() {
        let collection = PoiCollection::new(
            Crs::WorldMercator,
            vec![Poi::new(Coord { x: 10.0, y: 20.0 }, "school")],
        );
        let unchanged = collection.clone().to_crs(Crs::WorldMercator);
        assert_eq!(unchanged, collection);
    }
}
