//! The end-to-end enrichment pipeline.
//!
//! Sequencing only: filter by region, reproject to the metric CRS, compute
//! densities and the success index, drop the raw rating columns, and
//! reproject the result back to geographic coordinates. Configuration is
//! held immutably by the [`Enricher`]; there is no process-wide state.

use std::collections::{BTreeMap, BTreeSet};

use geo::Coord;
use rayon::prelude::*;
use thiserror::Error;

use crate::business::{Business, BusinessCollection};
use crate::crs::{Crs, reproject};
use crate::density::{DEFAULT_RADIUS_M, DensityEngine, DensityError};
use crate::poi::PoiCollection;
use crate::success::{SuccessError, SuccessParams};
use crate::taxonomy::CategoryTaxonomy;

/// Errors raised by the enrichment pipeline.
///
/// The first error per business-level operation aborts the run; there is no
/// best-effort partial output with silently-null columns.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnrichError {
    /// Building the density engine failed.
    #[error(transparent)]
    Density(#[from] DensityError),
    /// Computing a success index failed.
    #[error(transparent)]
    Success(#[from] SuccessError),
}

/// Configuration for one enrichment run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnrichConfig {
    /// Buffer radius in metres.
    pub radius_m: f64,
    /// Mapping from category keys to raw POI tags.
    pub taxonomy: CategoryTaxonomy,
    /// Prior parameters for the success index.
    pub prior: SuccessParams,
    /// Optional region code restricting the business set before
    /// computation.
    pub region_filter: Option<String>,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            taxonomy: CategoryTaxonomy::default(),
            prior: SuccessParams::default(),
            region_filter: None,
        }
    }
}

/// A business annotated with its neighbourhood context.
///
/// Carries no `stars` or `review_count` by construction: once the success
/// index is computed, the index is the only rating signal propagated
/// downstream.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnrichedBusiness {
    /// Identifier carried over from the input record.
    pub id: String,
    /// Position in the collection's CRS.
    pub location: Coord,
    /// Category labels carried over from the input record.
    pub categories: BTreeSet<String>,
    /// Region code carried over from the input record.
    pub region: Option<String>,
    /// Competing businesses within the radius.
    pub competitor_density: u32,
    /// POIs within the radius, one count per taxonomy key.
    pub poi_densities: BTreeMap<String, u32>,
    /// Bayesian-shrunk rating.
    pub success_index: f64,
}

/// Enriched businesses tagged with the CRS their locations are expressed
/// in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnrichedCollection {
    crs: Crs,
    records: Vec<EnrichedBusiness>,
}

impl EnrichedCollection {
    /// Tag `records` with the CRS their coordinates are expressed in.
    #[must_use]
    pub fn new(crs: Crs, records: Vec<EnrichedBusiness>) -> Self {
        Self { crs, records }
    }

    /// The CRS every location in this collection is expressed in.
    #[must_use]
    pub const fn crs(&self) -> Crs {
        self.crs
    }

    /// The records, in the order of the input businesses.
    #[must_use]
    pub fn records(&self) -> &[EnrichedBusiness] {
        &self.records
    }

    /// Number of enriched businesses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reproject every location into `target` and retag the collection.
    #[must_use]
    pub fn to_crs(mut self, target: Crs) -> Self {
        if self.crs != target {
            for record in &mut self.records {
                record.location = reproject(record.location, self.crs, target);
            }
            self.crs = target;
        }
        self
    }
}

/// Runs the enrichment pipeline with a fixed configuration.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use siteline_core::{
///     Business, BusinessCollection, Crs, EnrichConfig, Enricher, PoiCollection,
/// };
///
/// # fn main() -> Result<(), siteline_core::EnrichError> {
/// let businesses = BusinessCollection::new(
///     Crs::Wgs84,
///     vec![Business::new("b1", Coord { x: 0.0, y: 0.0 })
///         .with_categories(Business::parse_categories("Cafe"))
///         .with_rating(4.0, 100)],
/// );
/// let pois = PoiCollection::new(Crs::Wgs84, Vec::new());
///
/// let enriched = Enricher::new(EnrichConfig::default()).enrich(businesses, pois)?;
/// assert_eq!(enriched.crs(), Crs::Wgs84);
/// assert_eq!(enriched.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Enricher {
    config: EnrichConfig,
}

impl Enricher {
    /// Construct an enricher holding `config` for the run.
    #[must_use]
    pub fn new(config: EnrichConfig) -> Self {
        Self { config }
    }

    /// The configuration this enricher runs with.
    #[must_use]
    pub const fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Run the full pipeline and return the enriched collection in
    /// geographic coordinates.
    ///
    /// The per-business loop is a parallel map: the spatial indexes and
    /// input slices are shared read-only, each task produces the result for
    /// its own business, and results stay keyed to their business by
    /// identifier and input order.
    ///
    /// # Errors
    /// Returns the first [`EnrichError`] encountered; a failed business
    /// aborts the run.
    pub fn enrich(
        &self,
        businesses: BusinessCollection,
        pois: PoiCollection,
    ) -> Result<EnrichedCollection, EnrichError> {
        let regional = match self.config.region_filter.as_deref() {
            Some(code) => {
                let filtered = businesses.filtered_by_region(code);
                log::info!("region filter `{code}` kept {} businesses", filtered.len());
                filtered
            }
            None => businesses,
        };

        let metric_businesses = regional.to_crs(Crs::WorldMercator);
        let metric_pois = pois.to_crs(Crs::WorldMercator);

        let engine = DensityEngine::new(
            &metric_businesses,
            &metric_pois,
            self.config.radius_m,
            &self.config.taxonomy,
        )?;
        let prior_mean = self
            .config
            .prior
            .prior_mean
            .resolve(metric_businesses.records())?;

        let enriched: Vec<EnrichedBusiness> = metric_businesses
            .records()
            .par_iter()
            .enumerate()
            .map(|(slot, business)| self.enrich_one(slot, business, &engine, prior_mean))
            .collect::<Result<_, _>>()?;

        Ok(EnrichedCollection::new(Crs::WorldMercator, enriched).to_crs(Crs::Wgs84))
    }

    fn enrich_one(
        &self,
        slot: usize,
        business: &Business,
        engine: &DensityEngine<'_>,
        prior_mean: f64,
    ) -> Result<EnrichedBusiness, EnrichError> {
        let profile = engine.densities_for(slot);
        let success_index = self.config.prior.index_for(business, prior_mean)?;
        Ok(EnrichedBusiness {
            id: business.id.clone(),
            location: business.location,
            categories: business.categories.clone(),
            region: business.region.clone(),
            competitor_density: profile.competitor_density,
            poi_densities: profile.poi_densities,
            success_index,
        })
    }
}
