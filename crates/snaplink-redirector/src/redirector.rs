use crate::Result;
use async_trait::async_trait;

/// Outcome of a visit to a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// The code is bound; the visitor should be sent to `destination_url`.
    Redirect {
        destination_url: String,
        /// The counter after this visit, or `None` if counting failed.
        view_count: Option<u64>,
    },
    NotFound,
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a visited short code, counting the visit on a hit.
    async fn on_visit(&self, code: &str) -> Result<Visit>;
}
