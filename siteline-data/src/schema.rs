//! Column-name schemas for the two input tables.

/// Header names for the business table.
///
/// Defaults follow the upstream business dump; override individual fields
/// with struct-update syntax when a source names its columns differently.
///
/// # Examples
/// ```
/// use siteline_data::BusinessSchema;
///
/// let schema = BusinessSchema {
///     longitude: "lng".into(),
///     ..BusinessSchema::default()
/// };
/// assert_eq!(schema.latitude, "latitude");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessSchema {
    /// Unique identifier column.
    pub id: String,
    /// Longitude column (degrees).
    pub longitude: String,
    /// Latitude column (degrees).
    pub latitude: String,
    /// Comma-separated category labels; optional in the file.
    pub categories: String,
    /// Raw average rating; optional in the file.
    pub stars: String,
    /// Review count; optional in the file.
    pub review_count: String,
    /// Administrative region code; optional in the file.
    pub region: String,
}

impl Default for BusinessSchema {
    fn default() -> Self {
        Self {
            id: String::from("business_id"),
            longitude: String::from("longitude"),
            latitude: String::from("latitude"),
            categories: String::from("categories"),
            stars: String::from("stars"),
            review_count: String::from("review_count"),
            region: String::from("state"),
        }
    }
}

/// Header names for the POI table.
///
/// Defaults follow the OSM extract convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiSchema {
    /// Longitude column (degrees).
    pub longitude: String,
    /// Latitude column (degrees).
    pub latitude: String,
    /// Raw tag value column, matched against the taxonomy.
    pub kind: String,
}

impl Default for PoiSchema {
    fn default() -> Self {
        Self {
            longitude: String::from("lon"),
            latitude: String::from("lat"),
            kind: String::from("type"),
        }
    }
}
