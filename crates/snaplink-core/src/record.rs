use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Host-assigned identifier of a link entry.
///
/// The identifier is the numeric input to the codec before any custom code
/// is considered, so it must stay stable for the lifetime of the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for u128 {
    fn from(value: RecordId) -> Self {
        u128::from(value.0)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored link as seen by readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: RecordId,
    /// The destination visitors are redirected to.
    pub destination_url: String,
    pub short_code: ShortCode,
    /// Number of visits served through the redirector.
    pub view_count: u64,
    /// Whether the current short code came from a user request.
    pub custom_code_requested: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The write-side value handed to [`LinkStore::put`][crate::LinkStore::put].
#[derive(Debug, Clone, PartialEq)]
pub struct LinkBinding {
    pub record_id: RecordId,
    pub short_code: ShortCode,
    pub destination_url: String,
    pub custom_code_requested: bool,
}
