use crate::error::{Result, ShortenerError, Warning};
use snaplink_codec::CodeGenerator;
use snaplink_core::{LinkStore, RecordId, ShortCode};
use std::sync::Arc;
use tracing::{debug, trace};

/// Attempts per resolution: the canonical code plus nine padded retries.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCode {
    pub code: ShortCode,
    /// Whether `code` is the (sanitized) code the caller asked for.
    pub custom: bool,
    pub warning: Option<Warning>,
}

/// Finds a short code for a record that no other record holds.
///
/// Resolution only reads the store; persisting the result is the caller's
/// job, so a failed resolution leaves the store untouched.
#[derive(Debug)]
pub struct CollisionResolver<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    max_attempts: u32,
}

impl<S, G> Clone for CollisionResolver<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            max_attempts: self.max_attempts,
        }
    }
}

impl<S: LinkStore, G: CodeGenerator> CollisionResolver<S, G> {
    pub fn new(store: Arc<S>, generator: Arc<G>) -> Self {
        Self::with_max_attempts(store, generator, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(store: Arc<S>, generator: Arc<G>, max_attempts: u32) -> Self {
        Self {
            store,
            generator,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Resolves the short code for `record_id`.
    ///
    /// A requested code is sanitized and used when free (or already held by
    /// the same record). A request that cannot be a short code fails with
    /// `InvalidShortCode` before the store is read. Otherwise candidates come
    /// from the generator, attempt by attempt, until one is free or the
    /// attempts run out.
    pub async fn resolve(
        &self,
        record_id: RecordId,
        requested_code: Option<&str>,
    ) -> Result<ResolvedCode> {
        let requested = requested_code
            .map(ShortCode::sanitize)
            .transpose()?
            .flatten();
        let mut warning = None;

        if let Some(requested) = requested {
            if self.is_available(&requested, record_id).await? {
                trace!(record_id = %record_id, code = %requested, "using requested code");
                return Ok(ResolvedCode {
                    code: requested,
                    custom: true,
                    warning: None,
                });
            }

            debug!(
                record_id = %record_id,
                code = %requested,
                "requested code is taken, generating one"
            );
            warning = Some(Warning::CollisionOnCustomCode { requested });
        }

        for attempt in 0..self.max_attempts {
            let candidate = self.generator.candidate(record_id, attempt)?;
            if self.is_available(&candidate, record_id).await? {
                trace!(
                    record_id = %record_id,
                    code = %candidate,
                    attempt,
                    "resolved generated code"
                );
                return Ok(ResolvedCode {
                    code: candidate,
                    custom: false,
                    warning,
                });
            }
            trace!(record_id = %record_id, code = %candidate, attempt, "candidate collides");
        }

        Err(ShortenerError::CodeSpaceExhausted {
            record_id,
            attempts: self.max_attempts,
        })
    }

    /// A code is available when unbound or bound to the same record.
    async fn is_available(&self, code: &ShortCode, record_id: RecordId) -> Result<bool> {
        Ok(match self.store.get(code).await? {
            None => true,
            Some(existing) => existing.id == record_id,
        })
    }
}
