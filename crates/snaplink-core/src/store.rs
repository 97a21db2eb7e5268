use crate::error::StorageError;
use crate::record::{LinkBinding, LinkRecord, RecordId};
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for link store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistence contract shared by the shortener and the redirector.
///
/// Implementations must keep short codes unique among live records and must
/// increment view counters atomically at the storage layer.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Retrieves the record bound to a short code.
    /// Returns `None` if the code is not bound.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Retrieves a record by its host-assigned identifier.
    async fn get_by_record_id(&self, id: RecordId) -> Result<Option<LinkRecord>>;

    /// Binds `binding.short_code` to `binding.record_id`.
    ///
    /// Creates the record, or updates its destination and code while keeping
    /// its view count. Returns `Err(Conflict)` if the code is bound to a
    /// different record. A replaced code is released.
    async fn put(&self, binding: LinkBinding) -> Result<()>;

    /// Atomically increments the view counter and returns the new value.
    /// Returns `Err(NotFound)` if the record does not exist.
    async fn increment_views(&self, id: RecordId) -> Result<u64>;

    /// Deletes a record and releases its short code.
    /// Returns `true` if the record existed and was removed.
    async fn remove(&self, id: RecordId) -> Result<bool>;
}
