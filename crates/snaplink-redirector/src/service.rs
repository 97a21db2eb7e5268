use std::sync::Arc;

use crate::redirector::{Redirector, Visit};
use async_trait::async_trait;
use snaplink_core::{LinkStore, ShortCode};
use tracing::{debug, trace, warn};

/// Service for handling visits to short codes.
///
/// Looks the code up in the link store and bumps the record's view counter
/// on a hit.
#[derive(Debug)]
pub struct RedirectorService<S> {
    store: Arc<S>,
}

impl<S> Clone for RedirectorService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LinkStore> RedirectorService<S> {
    /// Creates a new RedirectorService over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolves a visited short code to its destination.
    ///
    /// # Returns
    ///
    /// * `Ok(Visit::Redirect { .. })` - The code is bound; the visit was counted
    ///   unless `view_count` is `None`
    /// * `Ok(Visit::NotFound)` - No record holds the code
    /// * `Err(e)` - The store could not be read
    pub async fn resolve_visit(&self, code: &str) -> crate::Result<Visit> {
        // Nothing outside the code alphabet can ever be bound.
        let Ok(code) = ShortCode::new(code) else {
            trace!(code, "visited code is malformed");
            return Ok(Visit::NotFound);
        };

        let Some(record) = self.store.get(&code).await? else {
            trace!(code = %code, "short code not found");
            return Ok(Visit::NotFound);
        };

        let view_count = match self.store.increment_views(record.id).await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(code = %code, record_id = %record.id, error = %e, "failed to count visit");
                None
            }
        };

        debug!(code = %code, url = %record.destination_url, "resolved short code");
        Ok(Visit::Redirect {
            destination_url: record.destination_url,
            view_count,
        })
    }

    pub async fn on_visit(&self, code: &str) -> crate::Result<Visit> {
        self.resolve_visit(code).await
    }
}

#[async_trait]
impl<S: LinkStore> Redirector for RedirectorService<S> {
    async fn on_visit(&self, code: &str) -> crate::Result<Visit> {
        self.resolve_visit(code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RedirectorError;
    use snaplink_core::store::Result as StoreResult;
    use snaplink_core::{LinkBinding, LinkRecord, RecordId, StorageError};
    use snaplink_storage::InMemoryLinkStore;

    fn binding(id: u64, code: &str, url: &str) -> LinkBinding {
        LinkBinding {
            record_id: RecordId::new(id),
            short_code: ShortCode::new_unchecked(code),
            destination_url: url.to_string(),
            custom_code_requested: false,
        }
    }

    async fn setup_with_link(
        code: &str,
        url: &str,
    ) -> (RedirectorService<InMemoryLinkStore>, Arc<InMemoryLinkStore>) {
        let store = Arc::new(InMemoryLinkStore::new());
        store.put(binding(1, code, url)).await.unwrap();
        (RedirectorService::new(Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn visit_existing_code_counts_and_redirects() {
        let (service, store) = setup_with_link("b", "https://example.com").await;

        let visit = service.resolve_visit("b").await.unwrap();
        assert_eq!(
            visit,
            Visit::Redirect {
                destination_url: "https://example.com".to_string(),
                view_count: Some(1),
            }
        );

        service.on_visit("b").await.unwrap();
        let record = store.get_by_record_id(RecordId::new(1)).await.unwrap().unwrap();
        assert_eq!(record.view_count, 2);
    }

    #[tokio::test]
    async fn visit_unbound_code_changes_no_counter() {
        let (service, store) = setup_with_link("b", "https://example.com").await;

        assert_eq!(service.resolve_visit("zzz").await.unwrap(), Visit::NotFound);

        let record = store.get_by_record_id(RecordId::new(1)).await.unwrap().unwrap();
        assert_eq!(record.view_count, 0);
    }

    #[tokio::test]
    async fn codes_are_case_sensitive() {
        let (service, _store) = setup_with_link("b", "https://example.com").await;

        assert_eq!(service.resolve_visit("B").await.unwrap(), Visit::NotFound);
    }

    #[tokio::test]
    async fn malformed_code_is_a_miss() {
        let (service, _store) = setup_with_link("b", "https://example.com").await;

        assert_eq!(service.resolve_visit("b/../x").await.unwrap(), Visit::NotFound);
        assert_eq!(service.resolve_visit("").await.unwrap(), Visit::NotFound);
    }

    /// Serves reads from the inner store but fails every other call.
    struct ReadOnlyStore {
        inner: InMemoryLinkStore,
        fail_reads: bool,
    }

    #[async_trait]
    impl LinkStore for ReadOnlyStore {
        async fn get(&self, code: &ShortCode) -> StoreResult<Option<LinkRecord>> {
            if self.fail_reads {
                return Err(StorageError::Unavailable("connection refused".into()));
            }
            self.inner.get(code).await
        }

        async fn get_by_record_id(&self, id: RecordId) -> StoreResult<Option<LinkRecord>> {
            self.inner.get_by_record_id(id).await
        }

        async fn put(&self, _binding: LinkBinding) -> StoreResult<()> {
            Err(StorageError::Unavailable("read only".into()))
        }

        async fn increment_views(&self, _id: RecordId) -> StoreResult<u64> {
            Err(StorageError::Timeout("pool timed out".into()))
        }

        async fn remove(&self, _id: RecordId) -> StoreResult<bool> {
            Err(StorageError::Unavailable("read only".into()))
        }
    }

    #[tokio::test]
    async fn failed_increment_still_redirects() {
        let inner = InMemoryLinkStore::new();
        inner.put(binding(1, "b", "https://example.com")).await.unwrap();
        let service = RedirectorService::new(Arc::new(ReadOnlyStore {
            inner,
            fail_reads: false,
        }));

        let visit = service.resolve_visit("b").await.unwrap();
        assert_eq!(
            visit,
            Visit::Redirect {
                destination_url: "https://example.com".to_string(),
                view_count: None,
            }
        );
    }

    #[tokio::test]
    async fn failed_lookup_is_a_storage_error() {
        let service = RedirectorService::new(Arc::new(ReadOnlyStore {
            inner: InMemoryLinkStore::new(),
            fail_reads: true,
        }));

        let err = service.resolve_visit("b").await.unwrap_err();
        assert!(matches!(
            err,
            RedirectorError::Storage(StorageError::Unavailable(_))
        ));
    }
}
