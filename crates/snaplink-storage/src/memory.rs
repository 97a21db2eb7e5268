use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use snaplink_core::store::{LinkStore, Result};
use snaplink_core::{LinkBinding, LinkRecord, RecordId, ShortCode, StorageError};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory storage entry for a link.
#[derive(Debug)]
struct StoredLink {
    short_code: ShortCode,
    destination_url: String,
    custom_code_requested: bool,
    view_count: AtomicU64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl StoredLink {
    fn new(binding: LinkBinding, now: Timestamp) -> Self {
        Self {
            short_code: binding.short_code,
            destination_url: binding.destination_url,
            custom_code_requested: binding.custom_code_requested,
            view_count: AtomicU64::new(0),
            created_at: now,
            updated_at: now,
        }
    }

    fn to_record(&self, id: RecordId) -> LinkRecord {
        LinkRecord {
            id,
            destination_url: self.destination_url.clone(),
            short_code: self.short_code.clone(),
            view_count: self.view_count.load(Ordering::SeqCst),
            custom_code_requested: self.custom_code_requested,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// In-memory implementation of [`LinkStore`] using DashMap.
///
/// Records are keyed by id; a second map indexes short codes. The code index
/// is claimed through the entry API, so two writers racing for the same code
/// cannot both win.
#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    records: DashMap<RecordId, StoredLink>,
    codes: DashMap<ShortCode, RecordId>,
}

impl InMemoryLinkStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
            codes: DashMap::with_capacity(capacity),
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let Some(id) = self.codes.get(code).map(|owner| *owner.value()) else {
            return Ok(None);
        };

        Ok(self.records.get(&id).map(|link| link.to_record(id)))
    }

    async fn get_by_record_id(&self, id: RecordId) -> Result<Option<LinkRecord>> {
        Ok(self.records.get(&id).map(|link| link.to_record(id)))
    }

    async fn put(&self, binding: LinkBinding) -> Result<()> {
        let record_id = binding.record_id;
        let code = binding.short_code.clone();

        match self.codes.entry(code.clone()) {
            Entry::Occupied(owner) if *owner.get() != record_id => {
                return Err(StorageError::Conflict(code.to_string()));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(record_id);
            }
        }

        let now = Timestamp::now();
        let released = match self.records.entry(record_id) {
            Entry::Occupied(mut existing) => {
                let link = existing.get_mut();
                let previous = std::mem::replace(&mut link.short_code, code.clone());
                link.destination_url = binding.destination_url;
                link.custom_code_requested = binding.custom_code_requested;
                link.updated_at = now;
                (previous != code).then_some(previous)
            }
            Entry::Vacant(slot) => {
                slot.insert(StoredLink::new(binding, now));
                None
            }
        };

        if let Some(previous) = released {
            self.codes.remove_if(&previous, |_, owner| *owner == record_id);
        }

        Ok(())
    }

    async fn increment_views(&self, id: RecordId) -> Result<u64> {
        self.records
            .get(&id)
            .map(|link| link.view_count.fetch_add(1, Ordering::SeqCst) + 1)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn remove(&self, id: RecordId) -> Result<bool> {
        let Some((_, link)) = self.records.remove(&id) else {
            return Ok(false);
        };

        self.codes.remove_if(&link.short_code, |_, owner| *owner == id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn binding(id: u64, short_code: &str, url: &str) -> LinkBinding {
        LinkBinding {
            record_id: RecordId::new(id),
            short_code: code(short_code),
            destination_url: url.to_string(),
            custom_code_requested: false,
        }
    }

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryLinkStore::new();

        store
            .put(binding(1, "b", "https://example.com"))
            .await
            .unwrap();

        let record = store.get(&code("b")).await.unwrap().unwrap();
        assert_eq!(record.id, RecordId::new(1));
        assert_eq!(record.destination_url, "https://example.com");
        assert_eq!(record.view_count, 0);
        assert!(!record.custom_code_requested);

        let by_id = store.get_by_record_id(RecordId::new(1)).await.unwrap();
        assert_eq!(by_id, Some(record));
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let store = InMemoryLinkStore::new();

        assert!(store.get(&code("nope")).await.unwrap().is_none());
        assert!(store
            .get_by_record_id(RecordId::new(7))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn put_conflict_for_other_record() {
        let store = InMemoryLinkStore::new();

        store
            .put(binding(1, "b", "https://example.com"))
            .await
            .unwrap();
        let err = store
            .put(binding(2, "b", "https://other.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
        let record = store.get(&code("b")).await.unwrap().unwrap();
        assert_eq!(record.id, RecordId::new(1));
        assert!(store
            .get_by_record_id(RecordId::new(2))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn put_same_record_updates_destination_and_keeps_views() {
        let store = InMemoryLinkStore::new();

        store.put(binding(1, "b", "https://old.com")).await.unwrap();
        store.increment_views(RecordId::new(1)).await.unwrap();
        store.put(binding(1, "b", "https://new.com")).await.unwrap();

        let record = store.get(&code("b")).await.unwrap().unwrap();
        assert_eq!(record.destination_url, "https://new.com");
        assert_eq!(record.view_count, 1);
        assert!(record.updated_at >= record.created_at);
    }

    #[tokio::test]
    async fn rebinding_releases_previous_code() {
        let store = InMemoryLinkStore::new();

        store.put(binding(1, "b", "https://example.com")).await.unwrap();
        store
            .put(binding(1, "custom", "https://example.com"))
            .await
            .unwrap();

        assert!(store.get(&code("b")).await.unwrap().is_none());
        assert_eq!(
            store.get(&code("custom")).await.unwrap().unwrap().id,
            RecordId::new(1)
        );

        // The released code is free for another record.
        store.put(binding(2, "b", "https://two.com")).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn increment_views_counts_up() {
        let store = InMemoryLinkStore::new();
        store.put(binding(1, "b", "https://example.com")).await.unwrap();

        assert_eq!(store.increment_views(RecordId::new(1)).await.unwrap(), 1);
        assert_eq!(store.increment_views(RecordId::new(1)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn increment_views_unknown_record() {
        let store = InMemoryLinkStore::new();

        let err = store.increment_views(RecordId::new(9)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = Arc::new(InMemoryLinkStore::new());
        store.put(binding(1, "b", "https://example.com")).await.unwrap();
        store.increment_views(RecordId::new(1)).await.unwrap();

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.increment_views(RecordId::new(1)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let record = store.get_by_record_id(RecordId::new(1)).await.unwrap().unwrap();
        assert_eq!(record.view_count, 101);
    }

    #[tokio::test]
    async fn concurrent_puts_for_one_code_have_single_winner() {
        let store = Arc::new(InMemoryLinkStore::new());

        let handles: Vec<_> = (0..16u64)
            .map(|id| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .put(binding(id, "contested", "https://example.com"))
                        .await
                })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => winners += 1,
                Err(StorageError::Conflict(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn remove_releases_code() {
        let store = InMemoryLinkStore::new();
        store.put(binding(1, "b", "https://example.com")).await.unwrap();

        assert!(store.remove(RecordId::new(1)).await.unwrap());
        assert!(store.get(&code("b")).await.unwrap().is_none());
        assert!(!store.remove(RecordId::new(1)).await.unwrap());
        assert!(store.is_empty());
    }
}
