//! Remote catalog source.
//!
//! This module provides the `CatalogClient` for fetching the authoritative
//! menu feed over HTTP and normalizing it into `CatalogItem` values. The
//! `CatalogSource` trait is the seam the sync coordinator is generic over,
//! so it can be driven by a stub in tests.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::CatalogItem;

pub use client::CatalogClient;
pub use error::FetchError;

/// Anything that can produce the full normalized catalog.
///
/// Produces either the complete list or an error - never partial results.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<CatalogItem>, FetchError>;
}
