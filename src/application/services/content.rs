//! Content Resolution Pipeline
//!
//! Resolves links extracted from message text into rendered markup by
//! racing the enabled content providers, then patches the stored message
//! and re-broadcasts the enrichment. Runs detached from the send path;
//! callers never wait on provider fetches.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use url::Url;

use crate::domain::registry::{ClientRegistry, MessageEnrichedPayload, OutboundEvent};
use crate::domain::repository::Repository;
use crate::infrastructure::cache::RecentMessageCache;
use crate::shared::error::ChatError;

pub use crate::domain::content::{ContentProvider, ProviderContent};

/// Concurrent, best-effort link resolution.
pub struct ContentPipeline {
    providers: Vec<Arc<dyn ContentProvider>>,
    repository: Arc<dyn Repository>,
    registry: Arc<dyn ClientRegistry>,
    recent: Arc<RecentMessageCache>,
    provider_timeout: Duration,
}

impl ContentPipeline {
    pub fn new(
        providers: Vec<Arc<dyn ContentProvider>>,
        repository: Arc<dyn Repository>,
        registry: Arc<dyn ClientRegistry>,
        recent: Arc<RecentMessageCache>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            repository,
            registry,
            recent,
            provider_timeout,
        }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Fire-and-forget entry point: spawns the resolution as a detached
    /// task. The triggering send observes nothing but logs.
    pub fn resolve_detached(self: Arc<Self>, room: String, message_id: i64, links: Vec<Url>) {
        if links.is_empty() || self.providers.is_empty() {
            return;
        }
        tokio::spawn(async move {
            self.resolve(&room, message_id, links).await;
        });
    }

    /// Resolve every link of one message. Links resolve independently;
    /// whichever completes first patches the message first.
    pub async fn resolve(&self, room: &str, message_id: i64, links: Vec<Url>) {
        let mut pending: FuturesUnordered<_> = links
            .iter()
            .map(|url| async move { (url.clone(), self.resolve_link(url).await) })
            .collect();

        while let Some((url, resolved)) = pending.next().await {
            let Some(content) = resolved else {
                tracing::debug!(url = %url, message_id = message_id, "No provider produced content");
                continue;
            };
            if let Err(e) = self.apply(room, message_id, &content).await {
                tracing::warn!(
                    url = %url,
                    message_id = message_id,
                    error = %e,
                    "Failed to apply enrichment"
                );
            }
        }
    }

    /// Race all capable providers for one link; first completed
    /// successful, non-empty result wins. Faults and timeouts are logged
    /// and treated as empty.
    async fn resolve_link(&self, url: &Url) -> Option<ProviderContent> {
        let mut pending: FuturesUnordered<_> = self
            .providers
            .iter()
            .filter(|provider| provider.is_valid_content(url))
            .map(|provider| {
                let provider = Arc::clone(provider);
                let url = url.clone();
                let limit = self.provider_timeout;
                async move {
                    match tokio::time::timeout(limit, provider.get_content(&url)).await {
                        Ok(Ok(Some(content))) if !content.markup.is_empty() => Some(content),
                        Ok(Ok(_)) => None,
                        Ok(Err(e)) => {
                            tracing::warn!(
                                provider = provider.name(),
                                url = %url,
                                error = %e,
                                "Content provider failed"
                            );
                            None
                        }
                        Err(_) => {
                            tracing::warn!(
                                provider = provider.name(),
                                url = %url,
                                "Content provider timed out"
                            );
                            None
                        }
                    }
                }
            })
            .collect();

        while let Some(result) = pending.next().await {
            if result.is_some() {
                return result;
            }
        }
        None
    }

    /// Persist the enrichment and re-broadcast it to the room.
    async fn apply(&self, room: &str, message_id: i64, content: &ProviderContent) -> Result<(), ChatError> {
        self.repository
            .append_enrichment(message_id, &content.markup)
            .await?;
        self.repository.commit().await?;
        self.recent.patch_enrichment(room, message_id, &content.markup);

        self.registry.send_to_room(
            room,
            OutboundEvent::MessageEnriched(MessageEnrichedPayload {
                message_id: message_id.to_string(),
                room: room.to_string(),
                content: content.markup.clone(),
            }),
        );
        Ok(())
    }
}
