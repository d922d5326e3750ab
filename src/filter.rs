//! Filter engine: derives the visible subset of the catalog.
//!
//! Filtering is a pure function of `(catalog, key)`. An item matches when the
//! key is the `all` sentinel, or equals the item's category or type string.
//! Results keep catalog order, and a key nothing matches yields an empty
//! sequence rather than an error.
//!
//! Re-rendering and restarting the image loader after a filter change is the
//! caller's job (see [`crate::engine`]).

use crate::catalog::Catalog;
use crate::types::MediaItem;
use std::fmt;

/// The sentinel string that selects every item.
pub const ALL: &str = "all";

/// Filter selection: the `all` sentinel or a category/type value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FilterKey {
    #[default]
    All,
    Value(String),
}

impl FilterKey {
    /// Parse a filter-control value. `"all"` is the sentinel; anything else,
    /// including strings no item carries, is a plain value.
    pub fn parse(raw: &str) -> Self {
        if raw == ALL {
            FilterKey::All
        } else {
            FilterKey::Value(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterKey::All => ALL,
            FilterKey::Value(v) => v,
        }
    }

    /// Whether `item` belongs to the view selected by this key.
    pub fn matches(&self, item: &MediaItem) -> bool {
        match self {
            FilterKey::All => true,
            FilterKey::Value(v) => item.category.as_str() == v || item.kind.as_str() == v,
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Items matching `key`, in their original order.
pub fn apply_filter(items: &[MediaItem], key: &FilterKey) -> Vec<MediaItem> {
    items.iter().filter(|item| key.matches(item)).cloned().collect()
}

/// Filter bar keys in display order: `all`, each distinct category, then each
/// distinct type, all in first-appearance order.
pub fn filter_keys(catalog: &Catalog) -> Vec<FilterKey> {
    let mut keys = vec![FilterKey::All];
    let categories = catalog.all().iter().map(|i| i.category.as_str());
    let kinds = catalog.all().iter().map(|i| i.kind.as_str());
    for value in categories.chain(kinds) {
        let key = FilterKey::Value(value.to_string());
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn ids(items: &[MediaItem]) -> Vec<u32> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn parse_recognizes_sentinel() {
        assert_eq!(FilterKey::parse("all"), FilterKey::All);
        assert_eq!(
            FilterKey::parse("nature"),
            FilterKey::Value("nature".to_string())
        );
        // Sentinel is case-sensitive like every other key
        assert_eq!(FilterKey::parse("All"), FilterKey::Value("All".to_string()));
    }

    #[test]
    fn all_is_identity() {
        let catalog = three_item_catalog();
        assert_eq!(apply_filter(catalog.all(), &FilterKey::All), catalog.all());
    }

    #[test]
    fn category_filter_keeps_catalog_order() {
        let catalog = three_item_catalog();
        let result = apply_filter(catalog.all(), &FilterKey::parse("nature"));
        assert_eq!(ids(&result), vec![1, 3]);
    }

    #[test]
    fn type_filter_matches_kind() {
        let catalog = three_item_catalog();
        let result = apply_filter(catalog.all(), &FilterKey::parse("digital"));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn unknown_key_yields_empty() {
        let catalog = three_item_catalog();
        assert!(apply_filter(catalog.all(), &FilterKey::parse("space")).is_empty());
    }

    #[test]
    fn filtering_is_deterministic() {
        let catalog = Catalog::builtin();
        for key in filter_keys(&catalog) {
            assert_eq!(
                apply_filter(catalog.all(), &key),
                apply_filter(catalog.all(), &key)
            );
        }
    }

    #[test]
    fn every_filtered_view_is_a_subsequence_of_the_catalog() {
        let catalog = Catalog::builtin();
        for key in filter_keys(&catalog) {
            let result = apply_filter(catalog.all(), &key);
            let positions: Vec<usize> = result
                .iter()
                .map(|i| catalog.position(i.id).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "key {key}");
        }
    }

    #[test]
    fn builtin_nature_and_digital_counts() {
        let catalog = Catalog::builtin();
        assert_eq!(apply_filter(catalog.all(), &FilterKey::parse("nature")).len(), 7);
        assert_eq!(apply_filter(catalog.all(), &FilterKey::parse("digital")).len(), 5);
    }

    #[test]
    fn filter_keys_in_first_appearance_order() {
        let keys: Vec<String> = filter_keys(&Catalog::builtin())
            .iter()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, vec!["all", "nature", "urban", "photography", "digital"]);
    }

    #[test]
    fn filter_keys_of_empty_catalog() {
        let catalog = Catalog::new(vec![]).unwrap();
        assert_eq!(filter_keys(&catalog), vec![FilterKey::All]);
    }
}
