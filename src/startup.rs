//! Application Startup
//!
//! Builds the coordinator with its collaborators wired for a
//! single-process deployment. Transports attach by opening registry
//! channels and calling into the coordinator.

use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;

use crate::application::services::content::{ContentPipeline, ContentProvider};
use crate::application::services::coordinator::ChatCoordinator;
use crate::application::services::presence::PresenceTracker;
use crate::config::Settings;
use crate::domain::commands::{CommandDispatcher, NullCommandDispatcher};
use crate::domain::registry::ClientRegistry;
use crate::domain::repository::Repository;
use crate::infrastructure::cache::{MembershipCache, RecentMessageCache};
use crate::infrastructure::content::ImageContentProvider;
use crate::infrastructure::memory::InMemoryRepository;
use crate::infrastructure::registry::LocalClientRegistry;
use crate::shared::snowflake::SnowflakeGenerator;

/// Providers shipped with the crate.
pub fn default_providers() -> Vec<Arc<dyn ContentProvider>> {
    vec![Arc::new(ImageContentProvider)]
}

/// Assembled core shared with transport adapters.
pub struct AppCore {
    pub settings: Arc<Settings>,
    pub repository: Arc<InMemoryRepository>,
    pub registry: Arc<LocalClientRegistry>,
    pub presence: Arc<PresenceTracker>,
    pub content: Arc<ContentPipeline>,
    pub coordinator: Arc<ChatCoordinator>,
}

impl AppCore {
    /// Build the core with default collaborators.
    pub fn build(settings: Settings) -> Self {
        Self::build_with(
            settings,
            Arc::new(NullCommandDispatcher),
            default_providers(),
        )
    }

    /// Build the core with a custom command dispatcher and provider set.
    pub fn build_with(
        settings: Settings,
        commands: Arc<dyn CommandDispatcher>,
        providers: Vec<Arc<dyn ContentProvider>>,
    ) -> Self {
        let repository = Arc::new(InMemoryRepository::new());
        let registry = Arc::new(LocalClientRegistry::new());
        let presence = Arc::new(PresenceTracker::new(settings.presence.activity_window()));
        let membership = Arc::new(MembershipCache::new(settings.cache.membership_ttl()));
        let recent = Arc::new(RecentMessageCache::new(
            settings.cache.recent_messages_per_room,
        ));
        let ids = Arc::new(SnowflakeGenerator::new(settings.snowflake.worker_id));

        // Disabled providers are excluded from the candidate set entirely.
        let providers: Vec<Arc<dyn ContentProvider>> = providers
            .into_iter()
            .filter(|provider| {
                let enabled = !settings
                    .content
                    .disabled_providers
                    .iter()
                    .any(|name| name == provider.name());
                if !enabled {
                    tracing::info!(provider = provider.name(), "Content provider disabled");
                }
                enabled
            })
            .collect();

        let repository_port: Arc<dyn Repository> = repository.clone();
        let registry_port: Arc<dyn ClientRegistry> = registry.clone();

        let content = Arc::new(ContentPipeline::new(
            providers,
            repository_port.clone(),
            registry_port.clone(),
            recent.clone(),
            settings.content.provider_timeout(),
        ));

        let coordinator = Arc::new(ChatCoordinator::new(
            repository_port,
            registry_port,
            presence.clone(),
            membership,
            recent,
            content.clone(),
            commands,
            ids,
            &settings,
        ));

        Self {
            settings: Arc::new(settings),
            repository,
            registry,
            presence,
            content,
            coordinator,
        }
    }

    /// Load settings from the environment and build the core.
    pub fn from_env() -> Result<Self> {
        let settings = Settings::load()?;
        Ok(Self::build(settings))
    }

    /// Spawn the periodic idle-demotion sweep. Not on the real-time path;
    /// runs until the returned handle is aborted.
    pub fn spawn_idle_sweep(&self) -> JoinHandle<()> {
        let presence = self.presence.clone();
        let repository: Arc<dyn Repository> = self.repository.clone();
        let period = self.settings.presence.sweep_interval();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = presence.sweep_idle(&repository).await {
                    tracing::warn!(error = %e, "Idle sweep failed");
                }
            }
        })
    }
}
