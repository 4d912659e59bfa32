//! menucache - offline-first menu catalog core.
//!
//! Decides whether a catalog request is served from a local persistent store
//! or fetched from the remote feed, keeps the two in best-effort agreement,
//! and serves filtered/searched views with debounced input. Screen layout and
//! the rest of the UI are external collaborators that call into this crate
//! and render whatever it returns.
//!
//! The three operations the surrounding application is expected to use:
//!
//! - [`SyncCoordinator::load_catalog`]: cache-or-fetch catalog loading
//! - [`SearchEngine::query`]: filtered views with an in-memory fallback
//! - [`Debouncer`]: trailing-edge input debouncing for search boxes

pub mod api;
pub mod config;
pub mod models;
pub mod search;
pub mod store;
pub mod sync;
pub mod utils;

pub use api::{CatalogClient, CatalogSource, FetchError};
pub use config::Config;
pub use models::{CatalogItem, FilterCriteria, ALL_CATEGORIES, OTHER_CATEGORY};
pub use search::SearchEngine;
pub use store::{MenuStore, StorageError, StoreStatus};
pub use sync::SyncCoordinator;
pub use utils::debounce::{debounce, Debouncer};
