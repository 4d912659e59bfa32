use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{CatalogSource, FetchError};
use crate::models::CatalogItem;
use crate::store::{MenuStore, StoreStatus};

/// Composes the item store and the remote source into one catalog-loading
/// operation with a cache-or-fetch policy and opportunistic write-through.
///
/// The store is a best-effort acceleration layer, never a system of record
/// the caller can be blocked by: any storage malfunction degrades to
/// remote-always behavior instead of failing the load.
///
/// Single-writer lifecycle: construct one coordinator per store instance.
/// The coordinator is the store's only writer; readers (the search engine)
/// may share the same `Arc<MenuStore>` concurrently.
pub struct SyncCoordinator<S: CatalogSource> {
    store: Arc<MenuStore>,
    source: S,
}

impl<S: CatalogSource> SyncCoordinator<S> {
    pub fn new(store: Arc<MenuStore>, source: S) -> Self {
        Self { store, source }
    }

    /// Load the catalog: from the store when it already holds items,
    /// otherwise from the remote source with a best-effort write-through.
    ///
    /// Storage failures are absorbed here and logged; only a remote fetch
    /// failure surfaces, and the caller retries by calling this again.
    pub async fn load_catalog(&self) -> Result<Vec<CatalogItem>, FetchError> {
        match self.store.init() {
            Ok(()) => {
                if let Some(items) = self.load_from_store() {
                    debug!(count = items.len(), "serving catalog from store");
                    return Ok(items);
                }
            }
            Err(e) => warn!(error = %e, "store unusable, falling back to remote fetch"),
        }

        self.fetch_and_persist().await
    }

    /// Unconditionally fetch from the remote source, replacing the stored
    /// catalog best-effort. For caller-driven refresh; never consults the
    /// cached copy.
    pub async fn refresh(&self) -> Result<Vec<CatalogItem>, FetchError> {
        if let Err(e) = self.store.init() {
            warn!(error = %e, "store unusable, refresh will not be persisted");
        }
        self.fetch_and_persist().await
    }

    /// Store status for display, or `None` when storage is unusable.
    pub fn status(&self) -> Option<StoreStatus> {
        match self.store.status() {
            Ok(status) => Some(status),
            Err(e) => {
                debug!(error = %e, "store status unavailable");
                None
            }
        }
    }

    fn load_from_store(&self) -> Option<Vec<CatalogItem>> {
        match self.store.has_data() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn!(error = %e, "failed to check store contents");
                return None;
            }
        }
        match self.store.get_all() {
            Ok(items) if !items.is_empty() => Some(items),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "failed to read stored catalog");
                None
            }
        }
    }

    async fn fetch_and_persist(&self) -> Result<Vec<CatalogItem>, FetchError> {
        let items = self.source.fetch().await?;
        info!(count = items.len(), "fetched catalog from remote source");
        // Write-through is opportunistic: a save failure must not fail
        // the load, the caller already has the fetched list.
        if let Err(e) = self.store.save(&items) {
            warn!(error = %e, "failed to persist fetched catalog");
        }
        Ok(items)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::models::OTHER_CATEGORY;

    /// Scripted catalog source: pops one queued response per fetch and
    /// counts calls.
    struct StubSource {
        responses: Mutex<Vec<Result<Vec<CatalogItem>, FetchError>>>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(responses: Vec<Result<Vec<CatalogItem>, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogSource for &StubSource {
        async fn fetch(&self) -> Result<Vec<CatalogItem>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            assert!(!responses.is_empty(), "unexpected fetch");
            responses.remove(0)
        }
    }

    fn item(id: i64, name: &str) -> CatalogItem {
        CatalogItem {
            id,
            name: name.to_string(),
            description: String::new(),
            price: 5.0,
            image: None,
            category: OTHER_CATEGORY.to_string(),
        }
    }

    fn server_error() -> FetchError {
        FetchError::Status {
            status: 500,
            body: "internal error".to_string(),
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_remote() {
        let store = Arc::new(MenuStore::in_memory());
        store.init().unwrap();
        let stored = vec![item(1, "Greek Salad"), item(2, "Lemon Cake")];
        store.save(&stored).unwrap();

        let source = StubSource::new(vec![]);
        let coordinator = SyncCoordinator::new(Arc::clone(&store), &source);

        let mut loaded = coordinator.load_catalog().await.expect("load failed");
        loaded.sort_by_key(|i| i.id);
        assert_eq!(loaded, stored);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_and_persists() {
        let store = Arc::new(MenuStore::in_memory());
        let fetched = vec![item(1, "Soup"), item(2, "Bread"), item(3, "Cake")];
        let source = StubSource::new(vec![Ok(fetched.clone())]);
        let coordinator = SyncCoordinator::new(Arc::clone(&store), &source);

        let loaded = coordinator.load_catalog().await.expect("load failed");
        assert_eq!(loaded, fetched);
        assert_eq!(source.calls(), 1);

        // Write-through: the store now satisfies the next load on its own.
        let mut persisted = store.get_all().expect("store read failed");
        persisted.sort_by_key(|i| i.id);
        assert_eq!(persisted, fetched);

        let again = coordinator.load_catalog().await.expect("reload failed");
        assert_eq!(again.len(), 3);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_unusable_store_degrades_to_remote_only() {
        // Parent path is a regular file, so init() can never succeed.
        let file = tempfile::NamedTempFile::new().unwrap();
        let store = Arc::new(MenuStore::new(file.path().join("sub").join("menu.db")));

        let fetched = vec![item(1, "Soup")];
        let source = StubSource::new(vec![Ok(fetched.clone())]);
        let coordinator = SyncCoordinator::new(store, &source);

        let loaded = coordinator.load_catalog().await.expect("load failed");
        assert_eq!(loaded, fetched);
        assert_eq!(source.calls(), 1);
        assert!(coordinator.status().is_none());
    }

    #[tokio::test]
    async fn test_remote_failure_surfaces_and_store_untouched() {
        let store = Arc::new(MenuStore::in_memory());
        let source = StubSource::new(vec![Err(server_error())]);
        let coordinator = SyncCoordinator::new(Arc::clone(&store), &source);

        let err = coordinator.load_catalog().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
        assert!(!store.has_data().unwrap());
    }

    #[tokio::test]
    async fn test_retry_after_remote_failure() {
        let store = Arc::new(MenuStore::in_memory());
        let fetched = vec![item(1, "Soup")];
        let source = StubSource::new(vec![Err(server_error()), Ok(fetched.clone())]);
        let coordinator = SyncCoordinator::new(Arc::clone(&store), &source);

        assert!(coordinator.load_catalog().await.is_err());
        let loaded = coordinator.load_catalog().await.expect("retry failed");
        assert_eq!(loaded, fetched);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_cached_catalog() {
        let store = Arc::new(MenuStore::in_memory());
        store.init().unwrap();
        store.save(&[item(1, "Old Soup")]).unwrap();

        let fetched = vec![item(1, "New Soup"), item(2, "Bread")];
        let source = StubSource::new(vec![Ok(fetched.clone())]);
        let coordinator = SyncCoordinator::new(Arc::clone(&store), &source);

        let refreshed = coordinator.refresh().await.expect("refresh failed");
        assert_eq!(refreshed, fetched);
        assert_eq!(source.calls(), 1);
        assert_eq!(store.get_all().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_status_after_sync() {
        let store = Arc::new(MenuStore::in_memory());
        let source = StubSource::new(vec![Ok(vec![item(1, "Soup")])]);
        let coordinator = SyncCoordinator::new(Arc::clone(&store), &source);

        coordinator.load_catalog().await.unwrap();
        let status = coordinator.status().expect("status missing");
        assert_eq!(status.item_count, 1);
        assert_eq!(status.age_display(), "just now");
    }
}
