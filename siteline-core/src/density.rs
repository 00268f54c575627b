//! Radius-based density counts for businesses.
//!
//! For every business the engine produces the number of competitors (other
//! businesses sharing at least one category) and one POI count per taxonomy
//! key, all within a fixed buffer radius. Inputs must already be in the
//! metric CRS so that the Euclidean radius is metres on the ground.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::business::{Business, BusinessCollection};
use crate::crs::{Crs, CrsError};
use crate::index::SpatialIndex;
use crate::poi::{Poi, PoiCollection};
use crate::taxonomy::CategoryTaxonomy;

/// Default buffer radius in metres.
pub const DEFAULT_RADIUS_M: f64 = 1000.0;

/// Errors raised while constructing the density engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DensityError {
    /// A collection arrived in a CRS other than World Mercator.
    #[error("density queries need metric coordinates: {0}")]
    Crs(#[from] CrsError),
}

/// Density counts for a single business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityProfile {
    /// Competing businesses within the radius.
    pub competitor_density: u32,
    /// POIs within the radius, one count per taxonomy key.
    pub poi_densities: BTreeMap<String, u32>,
}

/// Counts competitors and POIs around each business of a collection.
///
/// Two R-trees are built at construction, one over the POIs and one over
/// the businesses (for competitor lookups). Both are read-only afterwards,
/// so [`densities_for`](Self::densities_for) may be called from many
/// threads at once.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use siteline_core::{
///     Business, BusinessCollection, CategoryTaxonomy, Crs, DensityEngine, Poi, PoiCollection,
/// };
///
/// # fn main() -> Result<(), siteline_core::DensityError> {
/// let businesses = BusinessCollection::new(
///     Crs::WorldMercator,
///     vec![
///         Business::new("a", Coord { x: 0.0, y: 0.0 })
///             .with_categories(Business::parse_categories("Cafe")),
///         Business::new("b", Coord { x: 400.0, y: 0.0 })
///             .with_categories(Business::parse_categories("Cafe, Bakery")),
///     ],
/// );
/// let pois = PoiCollection::new(
///     Crs::WorldMercator,
///     vec![Poi::new(Coord { x: 100.0, y: 0.0 }, "bus_stop")],
/// );
/// let taxonomy = CategoryTaxonomy::default();
/// let engine = DensityEngine::new(&businesses, &pois, 1000.0, &taxonomy)?;
///
/// let profile = engine.densities_for(0);
/// assert_eq!(profile.competitor_density, 1);
/// assert_eq!(profile.poi_densities.get("transport"), Some(&1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DensityEngine<'a> {
    radius_m: f64,
    taxonomy: &'a CategoryTaxonomy,
    businesses: &'a [Business],
    business_index: SpatialIndex,
    pois: &'a [Poi],
    poi_index: SpatialIndex,
}

impl<'a> DensityEngine<'a> {
    /// Build the engine and its two spatial indexes.
    ///
    /// Empty collections are legitimate, if uninteresting, inputs: they are
    /// reported at warning level and every affected count is zero.
    ///
    /// # Errors
    /// Returns [`DensityError::Crs`] when either collection is not tagged
    /// [`Crs::WorldMercator`].
    pub fn new(
        businesses: &'a BusinessCollection,
        pois: &'a PoiCollection,
        radius_m: f64,
        taxonomy: &'a CategoryTaxonomy,
    ) -> Result<Self, DensityError> {
        businesses.expect_crs(Crs::WorldMercator)?;
        pois.expect_crs(Crs::WorldMercator)?;
        if businesses.is_empty() {
            log::warn!("business collection is empty; nothing to enrich");
        }
        if pois.is_empty() {
            log::warn!("POI collection is empty; every category density will be 0");
        }

        let business_index =
            SpatialIndex::build(businesses.records().iter().map(|b| b.location));
        let poi_index = SpatialIndex::build(pois.records().iter().map(|p| p.location));

        Ok(Self {
            radius_m,
            taxonomy,
            businesses: businesses.records(),
            business_index,
            pois: pois.records(),
            poi_index,
        })
    }

    /// The buffer radius in metres.
    #[must_use]
    pub const fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Count competitors of the business at `slot`.
    ///
    /// A competitor shares at least one category and lies within the
    /// radius. The business itself is excluded by identifier, so a business
    /// with no recorded competitors has density 0, never an undefined
    /// value. Out-of-range slots count as isolated and yield 0.
    #[must_use]
    pub fn competitor_density(&self, slot: usize) -> u32 {
        let Some(business) = self.businesses.get(slot) else {
            return 0;
        };
        if business.categories.is_empty() {
            return 0;
        }
        let hits = self
            .business_index
            .within_radius(business.location, self.radius_m)
            .filter_map(|hit| self.businesses.get(hit))
            .filter(|candidate| candidate.id != business.id)
            .filter(|candidate| business.shares_category_with(candidate))
            .count();
        clamped_count(hits)
    }

    /// Count POIs of category `key` around the business at `slot`.
    ///
    /// A key absent from the taxonomy, or matching no POI tag in the
    /// dataset, yields 0 rather than an error.
    #[must_use]
    pub fn poi_density(&self, slot: usize, key: &str) -> u32 {
        let Some(business) = self.businesses.get(slot) else {
            return 0;
        };
        let Some(tags) = self.taxonomy.tags_for(key) else {
            return 0;
        };
        let hits = self
            .poi_index
            .within_radius(business.location, self.radius_m)
            .filter_map(|hit| self.pois.get(hit))
            .filter(|poi| tags.contains(&poi.kind))
            .count();
        clamped_count(hits)
    }

    /// Compute the full density profile for the business at `slot`.
    #[must_use]
    pub fn densities_for(&self, slot: usize) -> DensityProfile {
        let poi_densities = self
            .taxonomy
            .keys()
            .map(|key| (key.to_owned(), self.poi_density(slot, key)))
            .collect();
        DensityProfile {
            competitor_density: self.competitor_density(slot),
            poi_densities,
        }
    }
}

/// Saturate a count into `u32`; datasets anywhere near the limit do not
/// occur in practice.
fn clamped_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
