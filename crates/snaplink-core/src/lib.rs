//! Core types and traits for the snaplink URL shortener.
//!
//! This crate provides the types shared by the shortener, the redirector and
//! the storage backends: record identifiers, short codes, validated
//! destinations and the [`LinkStore`] contract.

pub mod destination;
pub mod error;
pub mod record;
pub mod shortcode;
pub mod store;

pub use destination::DestinationUrl;
pub use error::{CoreError, StorageError};
pub use record::{LinkBinding, LinkRecord, RecordId};
pub use shortcode::{ShortCode, MAX_SHORT_CODE_LEN};
pub use store::LinkStore;
