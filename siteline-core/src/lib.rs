//! Spatial density and success-index computation for business records.
//!
//! The crate enriches point-located businesses with neighbourhood context:
//! counts of nearby points of interest per semantic category, counts of
//! competing businesses, and a Bayesian-shrunk success index. It is the
//! feature-engineering stage in front of a downstream regression model.
//!
//! Data flows through the pipeline as CRS-tagged collections: geographic
//! input (EPSG:4326) is reprojected to World Mercator (EPSG:3395) for all
//! distance maths, annotated via R-tree radius queries, and reprojected
//! back for output.
//!
//! # Examples
//! ```
//! use geo::Coord;
//! use siteline_core::{
//!     Business, BusinessCollection, Crs, EnrichConfig, Enricher, Poi, PoiCollection,
//! };
//!
//! # fn main() -> Result<(), siteline_core::EnrichError> {
//! let businesses = BusinessCollection::new(
//!     Crs::Wgs84,
//!     vec![Business::new("b1", Coord { x: 0.0, y: 0.0 })
//!         .with_categories(Business::parse_categories("Cafe"))
//!         .with_rating(4.5, 200)],
//! );
//! let pois = PoiCollection::new(
//!     Crs::Wgs84,
//!     vec![Poi::new(Coord { x: 0.001, y: 0.0 }, "bus_stop")],
//! );
//!
//! let enriched = Enricher::new(EnrichConfig::default()).enrich(businesses, pois)?;
//! let record = enriched.records().first().expect("one business in, one out");
//! assert_eq!(record.poi_densities.get("transport"), Some(&1));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod business;
mod crs;
mod density;
mod enrich;
mod index;
mod poi;
mod success;
mod taxonomy;

pub use business::{Business, BusinessCollection};
pub use crs::{Crs, CrsError, reproject};
pub use density::{DEFAULT_RADIUS_M, DensityEngine, DensityError, DensityProfile};
pub use enrich::{EnrichConfig, EnrichError, EnrichedBusiness, EnrichedCollection, Enricher};
pub use index::SpatialIndex;
pub use poi::{Poi, PoiCollection};
pub use success::{
    DEFAULT_PRIOR_MEAN, DEFAULT_PRIOR_WEIGHT, PriorMean, PriorMeanParseError, SuccessError,
    SuccessParams, success_index,
};
pub use taxonomy::CategoryTaxonomy;
