//! Facade crate for the Siteline enrichment engine.
//!
//! This crate re-exports the core domain types and the enrichment pipeline
//! so downstream consumers depend on a single crate.

#![forbid(unsafe_code)]

pub use siteline_core::{
    Business, BusinessCollection, CategoryTaxonomy, Crs, CrsError, DEFAULT_PRIOR_MEAN,
    DEFAULT_PRIOR_WEIGHT, DEFAULT_RADIUS_M, DensityEngine, DensityError, DensityProfile,
    EnrichConfig, EnrichError, EnrichedBusiness, EnrichedCollection, Enricher, Poi, PoiCollection,
    PriorMean, PriorMeanParseError, SpatialIndex, SuccessError, SuccessParams, reproject,
    success_index,
};
