//! Link creation for the snaplink URL shortener.
//!
//! This crate resolves short codes for records (custom requests first,
//! codec-generated candidates otherwise) and persists the resulting bindings
//! through a [`LinkStore`][snaplink_core::LinkStore].

pub mod error;
pub mod resolver;
pub mod service;
pub mod shortener;

pub use error::{ShortenerError, Warning};
pub use resolver::{CollisionResolver, ResolvedCode};
pub use service::{ShortenerService, ShortenerSettings};
pub use shortener::{LinkSummary, SaveOutcome, SaveParams, Shortener};
