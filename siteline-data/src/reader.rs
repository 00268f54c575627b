//! Loading point datasets from CSV into geographic collections.

use camino::Utf8Path;
use geo::Coord;
use siteline_core::{Business, BusinessCollection, Crs, Poi, PoiCollection};

use crate::error::DatasetError;
use crate::schema::{BusinessSchema, PoiSchema};

/// Read a business table into a [`Crs::Wgs84`]-tagged collection.
///
/// The `id`, `longitude`, and `latitude` columns must exist; `categories`,
/// `stars`, `review_count`, and `region` are picked up when present and
/// left absent otherwise. Empty cells in the optional columns become
/// absent values, never defaults.
///
/// # Errors
/// Returns [`DatasetError::MissingColumn`] when a required column is not in
/// the header, and [`DatasetError::MalformedRow`] when a coordinate or
/// rating cell cannot be parsed. A wrong location would corrupt every
/// density count downstream, so malformed rows abort the load.
pub fn read_businesses(
    path: &Utf8Path,
    schema: &BusinessSchema,
) -> Result<BusinessCollection, DatasetError> {
    let mut reader = csv::Reader::from_path(path.as_std_path())?;
    let headers = reader.headers()?.clone();

    let id_idx = require_column(&headers, &schema.id, path)?;
    let lon_idx = require_column(&headers, &schema.longitude, path)?;
    let lat_idx = require_column(&headers, &schema.latitude, path)?;
    let categories_idx = find_column(&headers, &schema.categories);
    let stars_idx = find_column(&headers, &schema.stars);
    let review_count_idx = find_column(&headers, &schema.review_count);
    let region_idx = find_column(&headers, &schema.region);

    let mut records = Vec::new();
    for row in reader.records() {
        let record = row?;
        let location = Coord {
            x: parse_f64(&record, lon_idx, &schema.longitude, path)?,
            y: parse_f64(&record, lat_idx, &schema.latitude, path)?,
        };
        let mut business = Business::new(cell(&record, id_idx), location);

        if let Some(idx) = categories_idx {
            business.categories = Business::parse_categories(cell(&record, idx));
        }
        if let Some(idx) = region_idx {
            let region = cell(&record, idx).trim();
            if !region.is_empty() {
                business.region = Some(region.to_owned());
            }
        }
        if let Some(idx) = stars_idx {
            business.stars = parse_optional_f64(&record, idx, &schema.stars, path)?;
        }
        if let Some(idx) = review_count_idx {
            business.review_count =
                parse_optional_u32(&record, idx, &schema.review_count, path)?;
        }

        records.push(business);
    }

    log::debug!("read {} businesses from {path}", records.len());
    Ok(BusinessCollection::new(Crs::Wgs84, records))
}

/// Read a POI table into a [`Crs::Wgs84`]-tagged collection.
///
/// # Errors
/// Same policy as [`read_businesses`]: missing columns and unparseable
/// coordinates abort the load.
pub fn read_pois(path: &Utf8Path, schema: &PoiSchema) -> Result<PoiCollection, DatasetError> {
    let mut reader = csv::Reader::from_path(path.as_std_path())?;
    let headers = reader.headers()?.clone();

    let lon_idx = require_column(&headers, &schema.longitude, path)?;
    let lat_idx = require_column(&headers, &schema.latitude, path)?;
    let kind_idx = require_column(&headers, &schema.kind, path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let record = row?;
        let location = Coord {
            x: parse_f64(&record, lon_idx, &schema.longitude, path)?,
            y: parse_f64(&record, lat_idx, &schema.latitude, path)?,
        };
        records.push(Poi::new(location, cell(&record, kind_idx)));
    }

    log::debug!("read {} POIs from {path}", records.len());
    Ok(PoiCollection::new(Crs::Wgs84, records))
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header == name)
}

fn require_column(
    headers: &csv::StringRecord,
    name: &str,
    path: &Utf8Path,
) -> Result<usize, DatasetError> {
    find_column(headers, name).ok_or_else(|| DatasetError::MissingColumn {
        column: name.to_owned(),
        path: path.to_path_buf(),
    })
}

fn cell<'r>(record: &'r csv::StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("")
}

fn malformed(
    record: &csv::StringRecord,
    column: &str,
    value: &str,
    path: &Utf8Path,
) -> DatasetError {
    DatasetError::MalformedRow {
        line: record.position().map_or(0, csv::Position::line),
        column: column.to_owned(),
        value: value.to_owned(),
        path: path.to_path_buf(),
    }
}

fn parse_f64(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    path: &Utf8Path,
) -> Result<f64, DatasetError> {
    let raw = cell(record, idx).trim();
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| malformed(record, column, raw, path))
}

fn parse_optional_f64(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    path: &Utf8Path,
) -> Result<Option<f64>, DatasetError> {
    let raw = cell(record, idx).trim();
    if raw.is_empty() {
        return Ok(None);
    }
    parse_f64(record, idx, column, path).map(Some)
}

fn parse_optional_u32(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    path: &Utf8Path,
) -> Result<Option<u32>, DatasetError> {
    let raw = cell(record, idx).trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| malformed(record, column, raw, path))
}
