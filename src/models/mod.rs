//! Data models for the menu catalog.
//!
//! This module contains the structures the rest of the crate trades in:
//!
//! - `CatalogItem`: one purchasable item, as normalized from the remote feed
//! - `FilterCriteria`: an ephemeral category/search selection

pub mod item;

pub use item::{CatalogItem, FilterCriteria, ALL_CATEGORIES, OTHER_CATEGORY};
