//! CSV ingestion and export for the Siteline enrichment engine.
//!
//! Column names vary by upstream source, so readers take a schema mapping
//! logical fields to concrete header names. Loading is a pure transform:
//! each row becomes a record with a geographic `location` point, and the
//! source file is never mutated.

#![forbid(unsafe_code)]

mod error;
mod reader;
mod schema;
mod writer;

pub use error::DatasetError;
pub use reader::{read_businesses, read_pois};
pub use schema::{BusinessSchema, PoiSchema};
pub use writer::write_enriched_csv;
