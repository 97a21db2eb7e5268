use snaplink_codec::CodecError;
use snaplink_core::{CoreError, RecordId, ShortCode, StorageError};
use std::fmt::Display;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShortenerError>;

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] CodecError),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("no free short code for record {record_id} after {attempts} attempts")]
    CodeSpaceExhausted { record_id: RecordId, attempts: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidUrl(message) => Self::InvalidUrl(message),
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
        }
    }
}

/// A recoverable condition reported alongside a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The requested custom code belongs to another record; a generated code
    /// was used instead.
    CollisionOnCustomCode { requested: ShortCode },
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::CollisionOnCustomCode { requested } => write!(
                f,
                "custom code '{}' is already in use, a generated code was assigned",
                requested
            ),
        }
    }
}
