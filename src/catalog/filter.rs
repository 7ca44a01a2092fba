// src/catalog/filter.rs

use super::definitions::{CatalogEntry, ALL_CATEGORIES};

/// Free-text query plus category selection for one catalog view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    pub query: String,
    pub category: String,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl CatalogFilter {
    pub fn new(query: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: category.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.category != ALL_CATEGORIES
    }

    pub fn matches<T: CatalogEntry>(&self, entry: &T) -> bool {
        let needle = self.query.to_lowercase();
        let text_hit = needle.is_empty()
            || entry
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
        let category_hit = self.category == ALL_CATEGORIES || entry.category() == self.category;
        text_hit && category_hit
    }

    /// Positions of the matching entries, in input order.
    pub fn matching_indices<T: CatalogEntry>(&self, items: &[T]) -> Vec<usize> {
        items
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.matches(*entry))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn apply<'a, T: CatalogEntry>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|entry| self.matches(*entry)).collect()
    }
}

/// Order-preserving subsequence of `items` matching `query` and `category`.
pub fn filter_catalog<T: CatalogEntry + Clone>(items: &[T], query: &str, category: &str) -> Vec<T> {
    CatalogFilter::new(query, category)
        .apply(items)
        .into_iter()
        .cloned()
        .collect()
}
