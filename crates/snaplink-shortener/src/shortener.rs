use crate::error::{Result, Warning};
use async_trait::async_trait;
use jiff::Timestamp;
use snaplink_core::{LinkRecord, RecordId, ShortCode};

/// Parameters for saving a link.
#[derive(Debug, Clone)]
pub struct SaveParams {
    /// The host-assigned identifier of the link entry.
    pub record_id: RecordId,
    /// The URL visitors are redirected to.
    pub destination_url: String,
    /// Optional user-chosen code; sanitized before use.
    pub requested_code: Option<String>,
}

/// The result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub short_code: ShortCode,
    pub warning: Option<Warning>,
}

/// Read-only view of a link for listings.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSummary {
    pub record_id: RecordId,
    pub short_code: ShortCode,
    pub destination_url: String,
    pub view_count: u64,
    pub custom_code_requested: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<LinkRecord> for LinkSummary {
    fn from(record: LinkRecord) -> Self {
        Self {
            record_id: record.id,
            short_code: record.short_code,
            destination_url: record.destination_url,
            view_count: record.view_count,
            custom_code_requested: record.custom_code_requested,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Validates the destination, resolves a short code and persists the
    /// binding. Nothing is persisted when validation or resolution fails.
    async fn on_save(&self, params: SaveParams) -> Result<SaveOutcome>;

    /// Returns the link for a record, if any.
    async fn describe(&self, record_id: RecordId) -> Result<Option<LinkSummary>>;

    /// Deletes the link for a record, releasing its short code.
    /// Returns `true` if the record existed and was removed.
    async fn on_delete(&self, record_id: RecordId) -> Result<bool>;
}
