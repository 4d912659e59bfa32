use serde::{Deserialize, Serialize};

/// Sentinel category assigned during normalization when the remote record
/// carries no usable category.
pub const OTHER_CATEGORY: &str = "Other";

/// Pseudo-category shown by UI layers to mean "no category restriction".
/// It is stripped by `FilterCriteria::effective_categories` and must never
/// reach a matching predicate as a literal value.
pub const ALL_CATEGORIES: &str = "All";

/// One purchasable item from the menu catalog.
///
/// Values are created exclusively by normalizing records fetched from the
/// remote source (see `api::client`), persisted as a full batch replacing any
/// prior batch, and destroyed only by the next full replace. There are no
/// individual deletes or in-place updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique within the store. Re-derived from the remote payload on every
    /// fetch; identity across syncs is only as stable as the upstream order.
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Absolute image URL, or `None` when the item has no image.
    pub image: Option<String>,
    pub category: String,
}

impl CatalogItem {
    /// Price formatted as currency with two decimals, e.g. `$12.99`.
    pub fn price_display(&self) -> String {
        format!("${:.2}", self.price)
    }
}

/// Ephemeral query value describing a category selection plus free-text
/// search. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub selected_categories: Vec<String>,
    pub search_text: String,
}

impl FilterCriteria {
    pub fn new(selected_categories: Vec<String>, search_text: impl Into<String>) -> Self {
        Self {
            selected_categories,
            search_text: search_text.into(),
        }
    }

    /// The category list actually applied by the matching predicate.
    ///
    /// An empty selection, or a selection containing the `ALL_CATEGORIES`
    /// sentinel, means no category restriction at all.
    pub fn effective_categories(&self) -> Vec<String> {
        if self
            .selected_categories
            .iter()
            .any(|c| c == ALL_CATEGORIES)
        {
            Vec::new()
        } else {
            self.selected_categories.clone()
        }
    }
}
