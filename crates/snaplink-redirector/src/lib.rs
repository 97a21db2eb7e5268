//! Redirect lookups for the snaplink URL shortener.
//!
//! This crate provides a [`RedirectorService`] that resolves a visited short
//! code to its destination and counts the visit. Counting is best effort: a
//! failed increment is logged and the visitor is still redirected.

pub mod error;
pub mod redirector;
pub mod service;

pub use error::{RedirectorError, Result};
pub use redirector::{Redirector, Visit};
pub use service::RedirectorService;
