//! Exporting enriched collections back to CSV.

use std::collections::BTreeSet;

use camino::Utf8Path;
use siteline_core::EnrichedCollection;

use crate::error::DatasetError;
use crate::schema::BusinessSchema;

/// Write the enriched table as a row-per-business CSV.
///
/// Identity and location columns reuse the names from `schema` so the
/// output lines up with the input table; they are followed by
/// `competitor_density`, one `{key}_density` column per taxonomy key in
/// sorted order, and `success_index`. `stars` and `review_count` do not
/// exist on the enriched records, so they cannot leak into the output.
///
/// # Errors
/// Returns [`DatasetError`] when the file cannot be created or written.
pub fn write_enriched_csv(
    path: &Utf8Path,
    collection: &EnrichedCollection,
    schema: &BusinessSchema,
) -> Result<(), DatasetError> {
    let keys: BTreeSet<&str> = collection
        .records()
        .iter()
        .flat_map(|record| record.poi_densities.keys().map(String::as_str))
        .collect();

    let mut writer = csv::Writer::from_path(path.as_std_path())?;

    let mut header = vec![
        schema.id.as_str(),
        schema.longitude.as_str(),
        schema.latitude.as_str(),
        schema.region.as_str(),
        schema.categories.as_str(),
        "competitor_density",
    ];
    let density_columns: Vec<String> =
        keys.iter().map(|key| format!("{key}_density")).collect();
    header.extend(density_columns.iter().map(String::as_str));
    header.push("success_index");
    writer.write_record(&header)?;

    for record in collection.records() {
        let categories = record
            .categories
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let mut row = vec![
            record.id.clone(),
            record.location.x.to_string(),
            record.location.y.to_string(),
            record.region.clone().unwrap_or_default(),
            categories,
            record.competitor_density.to_string(),
        ];
        for key in &keys {
            let count = record.poi_densities.get(*key).copied().unwrap_or(0);
            row.push(count.to_string());
        }
        row.push(record.success_index.to_string());
        writer.write_record(&row)?;
    }

    writer.flush().map_err(|source| DatasetError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {} enriched businesses to {path}", collection.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use geo::Coord;
    use rstest::rstest;
    use siteline_core::{Crs, EnrichedBusiness};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn enriched(id: &str, success_index: f64) -> EnrichedBusiness {
        EnrichedBusiness {
            id: id.to_owned(),
            location: Coord { x: -87.65, y: 41.85 },
            categories: ["Cafe".to_owned()].into(),
            region: Some("IL".to_owned()),
            competitor_density: 2,
            poi_densities: BTreeMap::from([
                ("shopping".to_owned(), 3),
                ("transport".to_owned(), 1),
            ]),
            success_index,
        }
    }

    #[rstest]
    fn header_lists_density_columns_in_sorted_order() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("out.csv")).expect("utf-8 path");
        let collection = EnrichedCollection::new(Crs::Wgs84, vec![enriched("b1", 4.85)]);

        write_enriched_csv(&path, &collection, &BusinessSchema::default())
            .expect("write succeeds");

        let contents = std::fs::read_to_string(&path).expect("read back");
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some(
                "business_id,longitude,latitude,state,categories,competitor_density,\
                 shopping_density,transport_density,success_index"
            )
        );
        assert_eq!(
            lines.next(),
            Some("b1,-87.65,41.85,IL,Cafe,2,3,1,4.85")
        );
    }

    #[rstest]
    fn raw_rating_columns_never_appear() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("out.csv")).expect("utf-8 path");
        let collection = EnrichedCollection::new(Crs::Wgs84, vec![enriched("b1", 3.5)]);

        write_enriched_csv(&path, &collection, &BusinessSchema::default())
            .expect("write succeeds");

        let contents = std::fs::read_to_string(&path).expect("read back");
        assert!(!contents.contains("stars"));
        assert!(!contents.contains("review_count"));
    }

    #[rstest]
    fn empty_collection_writes_header_only() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("out.csv")).expect("utf-8 path");
        let collection = EnrichedCollection::new(Crs::Wgs84, Vec::new());

        write_enriched_csv(&path, &collection, &BusinessSchema::default())
            .expect("write succeeds");

        let contents = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(contents.lines().count(), 1);
    }
}
