//! The fixed mapping from semantic category keys to raw POI tags.

use std::collections::{BTreeMap, BTreeSet};

/// Maps a semantic category key (for example `transport`) to the set of raw
/// POI tag values that belong to it.
///
/// Supplied once at engine construction and immutable for the duration of a
/// run. Keys are kept in a `BTreeMap` so density columns come out in a
/// stable order.
///
/// # Examples
/// ```
/// use siteline_core::CategoryTaxonomy;
///
/// let taxonomy = CategoryTaxonomy::default();
/// assert!(taxonomy.contains("transport", "bus_stop"));
/// assert!(!taxonomy.contains("transport", "pharmacy"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryTaxonomy {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl CategoryTaxonomy {
    /// An empty taxonomy with no categories.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    /// Add (or extend) a category with the given raw tag values.
    #[must_use]
    pub fn with_category<I, S>(mut self, key: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .entry(key.into())
            .or_default()
            .extend(tags.into_iter().map(Into::into));
        self
    }

    /// Iterate category keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// The raw tags belonging to `key`, if the key exists.
    #[must_use]
    pub fn tags_for(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(key)
    }

    /// Whether `tag` belongs to the category `key`.
    #[must_use]
    pub fn contains(&self, key: &str, tag: &str) -> bool {
        self.tags_for(key).is_some_and(|tags| tags.contains(tag))
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the taxonomy holds no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryTaxonomy {
    /// The taxonomy the upstream OSM extract was built against.
    fn default() -> Self {
        Self::new()
            .with_category(
                "transport",
                [
                    "stop_position",
                    "bus_station",
                    "bus_stop",
                    "tram_stop",
                    "halt",
                    "station",
                    "taxi",
                ],
            )
            .with_category("shopping", ["supermarket", "mall", "department_store"])
            .with_category("education", ["school", "university", "college", "library"])
            .with_category("healthcare", ["hospital", "clinic", "veterinary", "pharmacy"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_taxonomy_has_four_categories() {
        let taxonomy = CategoryTaxonomy::default();
        let keys: Vec<_> = taxonomy.keys().collect();
        assert_eq!(keys, ["education", "healthcare", "shopping", "transport"]);
    }

    #[rstest]
    #[case("transport", "tram_stop", true)]
    #[case("healthcare", "pharmacy", true)]
    #[case("shopping", "bus_stop", false)]
    #[case("nightlife", "bar", false)]
    fn membership(#[case] key: &str, #[case] tag: &str, #[case] expected: bool) {
        assert_eq!(CategoryTaxonomy::default().contains(key, tag), expected);
    }

    #[rstest]
    fn with_category_extends_existing_key() {
        let taxonomy = CategoryTaxonomy::new()
            .with_category("transport", ["bus_stop"])
            .with_category("transport", ["ferry_terminal"]);
        assert_eq!(taxonomy.len(), 1);
        assert!(taxonomy.contains("transport", "ferry_terminal"));
        assert!(taxonomy.contains("transport", "bus_stop"));
    }
}
