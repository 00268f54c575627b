//! Business records and their CRS-tagged collection.

use std::collections::BTreeSet;

use geo::Coord;

use crate::crs::{Crs, CrsError, reproject};

/// A point-located business awaiting enrichment.
///
/// `stars` and `review_count` are optional because upstream tables routinely
/// carry unrated rows; the success-index stage decides whether their absence
/// is an error. Category membership is a set because a business may belong
/// to several free-text categories at once.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use siteline_core::Business;
///
/// let business = Business::new("b1", Coord { x: -87.65, y: 41.85 })
///     .with_categories(Business::parse_categories("Cafe, Bakery"))
///     .with_rating(4.5, 120);
/// assert_eq!(business.categories.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Business {
    /// Unique identifier.
    pub id: String,
    /// Position in the collection's CRS.
    pub location: Coord,
    /// Free-text category labels; may be empty.
    pub categories: BTreeSet<String>,
    /// Administrative region code (for example a two-letter state code).
    pub region: Option<String>,
    /// Raw average rating in `[1.0, 5.0]`.
    pub stars: Option<f64>,
    /// Number of reviews behind `stars`.
    pub review_count: Option<u32>,
}

impl Business {
    /// Construct a business with no categories, region, or rating.
    pub fn new(id: impl Into<String>, location: Coord) -> Self {
        Self {
            id: id.into(),
            location,
            categories: BTreeSet::new(),
            region: None,
            stars: None,
            review_count: None,
        }
    }

    /// Replace the category set.
    #[must_use]
    pub fn with_categories(mut self, categories: BTreeSet<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Set the administrative region code.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the raw rating signal.
    #[must_use]
    pub fn with_rating(mut self, stars: f64, review_count: u32) -> Self {
        self.stars = Some(stars);
        self.review_count = Some(review_count);
        self
    }

    /// Split a delimiter-separated category string into a set.
    ///
    /// Labels are trimmed and empty fragments dropped, mirroring the
    /// comma-separated convention of the upstream business table.
    ///
    /// # Examples
    /// ```
    /// use siteline_core::Business;
    ///
    /// let set = Business::parse_categories("Cafe, Bakery,, Coffee & Tea");
    /// assert_eq!(set.len(), 3);
    /// assert!(set.contains("Bakery"));
    /// ```
    #[must_use]
    pub fn parse_categories(raw: &str) -> BTreeSet<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Whether this business competes with `other`: any shared category.
    ///
    /// An empty category set intersects nothing, so such businesses neither
    /// have competitors nor count as one.
    pub(crate) fn shares_category_with(&self, other: &Self) -> bool {
        self.categories
            .iter()
            .any(|label| other.categories.contains(label))
    }
}

/// A set of businesses tagged with the CRS their locations are expressed in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusinessCollection {
    crs: Crs,
    records: Vec<Business>,
}

impl BusinessCollection {
    /// Tag `records` with the CRS their coordinates are expressed in.
    #[must_use]
    pub fn new(crs: Crs, records: Vec<Business>) -> Self {
        Self { crs, records }
    }

    /// The CRS every location in this collection is expressed in.
    #[must_use]
    pub const fn crs(&self) -> Crs {
        self.crs
    }

    /// The records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Business] {
        &self.records
    }

    /// Number of businesses in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no businesses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reproject every location into `target` and retag the collection.
    #[must_use]
    pub fn to_crs(mut self, target: Crs) -> Self {
        if self.crs != target {
            for business in &mut self.records {
                business.location = reproject(business.location, self.crs, target);
            }
            self.crs = target;
        }
        self
    }

    /// Keep only businesses whose region code equals `code`.
    #[must_use]
    pub fn filtered_by_region(mut self, code: &str) -> Self {
        self.records
            .retain(|business| business.region.as_deref() == Some(code));
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
