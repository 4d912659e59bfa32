use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use crate::models::{CatalogItem, FilterCriteria};
use crate::store::MenuStore;
use crate::utils::{cmp_ignore_case, contains_ignore_case};

/// Serves filtered/searched views of the catalog.
///
/// Queries go to the store first; on a `StorageError` the same result is
/// computed by scanning the caller's last-known full list in memory, with the
/// same predicate (exact category membership, case-insensitive name
/// substring) and the same name ordering. Storage failures never escape.
pub struct SearchEngine {
    store: Arc<MenuStore>,
}

impl SearchEngine {
    pub fn new(store: Arc<MenuStore>) -> Self {
        Self { store }
    }

    /// Items matching `criteria`, ordered by name ascending.
    ///
    /// `fallback` is the last-known full catalog the caller already holds;
    /// it is only consulted when the store-side query fails.
    pub fn query(&self, criteria: &FilterCriteria, fallback: &[CatalogItem]) -> Vec<CatalogItem> {
        let categories = criteria.effective_categories();
        match self.store.filter(&categories, &criteria.search_text) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "store-side filter failed, scanning in memory");
                Self::scan(&categories, &criteria.search_text, fallback)
            }
        }
    }

    /// Distinct categories for building a selection UI, store-side when
    /// possible, derived from `fallback` otherwise. Sorted either way.
    pub fn categories(&self, fallback: &[CatalogItem]) -> Vec<String> {
        match self.store.categories() {
            Ok(categories) => categories,
            Err(e) => {
                warn!(error = %e, "store-side category read failed, deriving in memory");
                let set: BTreeSet<String> =
                    fallback.iter().map(|i| i.category.clone()).collect();
                set.into_iter().collect()
            }
        }
    }

    /// In-memory equivalent of `MenuStore::filter`.
    fn scan(categories: &[String], search_text: &str, items: &[CatalogItem]) -> Vec<CatalogItem> {
        let needle = search_text.trim();
        let mut matched: Vec<CatalogItem> = items
            .iter()
            .filter(|item| {
                (categories.is_empty() || categories.iter().any(|c| c == &item.category))
                    && (needle.is_empty() || contains_ignore_case(&item.name, needle))
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name));
        matched
    }
}

// ============================================================================
// Tests
// ============================================================================
