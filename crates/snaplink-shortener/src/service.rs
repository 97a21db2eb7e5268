use crate::error::{Result, ShortenerError};
use crate::resolver::{CollisionResolver, DEFAULT_MAX_ATTEMPTS};
use crate::shortener::{LinkSummary, SaveOutcome, SaveParams, Shortener};
use async_trait::async_trait;
use snaplink_codec::CodeGenerator;
use snaplink_core::{DestinationUrl, LinkBinding, LinkStore, RecordId, ShortCode, StorageError};
use std::sync::Arc;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

/// Limits applied while saving a link.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ShortenerSettings {
    /// Candidates tried per resolution round.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
    /// Resolution rounds per save. A new round starts when another writer
    /// binds the resolved code before this one does.
    #[builder(default = 3)]
    pub max_resolution_rounds: u32,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service wraps a [`LinkStore`] and a [`CodeGenerator`] to handle:
/// - destination validation
/// - short code resolution (custom or generated, with collision retries)
/// - persisting the binding, restarting resolution when a concurrent writer
///   wins the code
#[derive(Debug)]
pub struct ShortenerService<S, G> {
    store: Arc<S>,
    resolver: CollisionResolver<S, G>,
    settings: ShortenerSettings,
}

impl<S, G> Clone for ShortenerService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            resolver: self.resolver.clone(),
            settings: self.settings,
        }
    }
}

impl<S: LinkStore, G: CodeGenerator> ShortenerService<S, G> {
    /// Creates a new `ShortenerService` with default settings.
    pub fn new(store: Arc<S>, generator: G) -> Self {
        Self::with_settings(store, generator, ShortenerSettings::default())
    }

    pub fn with_settings(store: Arc<S>, generator: G, settings: ShortenerSettings) -> Self {
        let resolver = CollisionResolver::with_max_attempts(
            Arc::clone(&store),
            Arc::new(generator),
            settings.max_attempts,
        );
        Self {
            store,
            resolver,
            settings,
        }
    }

    pub fn resolver(&self) -> &CollisionResolver<S, G> {
        &self.resolver
    }
}

#[async_trait]
impl<S: LinkStore, G: CodeGenerator> Shortener for ShortenerService<S, G> {
    async fn on_save(&self, params: SaveParams) -> Result<SaveOutcome> {
        let SaveParams {
            record_id,
            destination_url,
            requested_code,
        } = params;

        let destination = DestinationUrl::parse(destination_url).map_err(|e| {
            warn!(record_id = %record_id, error = %e, "rejecting link with invalid destination");
            ShortenerError::from(e)
        })?;
        let requested = requested_code
            .as_deref()
            .map(ShortCode::sanitize)
            .transpose()?
            .flatten();
        let existing = self.store.get_by_record_id(record_id).await?;
        let mut keep_existing = true;

        for round in 0..self.settings.max_resolution_rounds {
            // Re-saving without asking for a different code keeps the current one.
            let kept = existing.as_ref().filter(|record| {
                keep_existing
                    && requested
                        .as_ref()
                        .map_or(true, |code| *code == record.short_code)
            });

            let (short_code, custom, warning) = match kept {
                Some(record) => (
                    record.short_code.clone(),
                    record.custom_code_requested,
                    None,
                ),
                None => {
                    let resolved = self
                        .resolver
                        .resolve(record_id, requested_code.as_deref())
                        .await?;
                    (resolved.code, resolved.custom, resolved.warning)
                }
            };

            let binding = LinkBinding {
                record_id,
                short_code: short_code.clone(),
                destination_url: destination.as_str().to_string(),
                custom_code_requested: custom,
            };

            match self.store.put(binding).await {
                Ok(()) => {
                    info!(record_id = %record_id, code = %short_code, custom, "saved link");
                    if let Some(warning) = &warning {
                        debug!(record_id = %record_id, %warning, "save completed with warning");
                    }
                    return Ok(SaveOutcome {
                        short_code,
                        warning,
                    });
                }
                Err(StorageError::Conflict(_)) => {
                    warn!(
                        record_id = %record_id,
                        code = %short_code,
                        round,
                        "short code was bound concurrently, restarting resolution"
                    );
                    keep_existing = false;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ShortenerError::CodeSpaceExhausted {
            record_id,
            attempts: self.settings.max_resolution_rounds * self.settings.max_attempts,
        })
    }

    async fn describe(&self, record_id: RecordId) -> Result<Option<LinkSummary>> {
        Ok(self
            .store
            .get_by_record_id(record_id)
            .await?
            .map(LinkSummary::from))
    }

    async fn on_delete(&self, record_id: RecordId) -> Result<bool> {
        let removed = self.store.remove(record_id).await?;
        if removed {
            info!(record_id = %record_id, "deleted link");
        }
        Ok(removed)
    }
}
