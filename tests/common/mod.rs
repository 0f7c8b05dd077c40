//! Common Test Utilities
//!
//! Shared fixtures for exercising the full in-process stack: in-memory
//! repository, local registry, and the coordinator.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use chat_coordinator::application::services::content::ContentProvider;
use chat_coordinator::application::services::coordinator::ConnectRequest;
use chat_coordinator::config::Settings;
use chat_coordinator::domain::commands::CommandDispatcher;
use chat_coordinator::domain::entities::{Room, User, UserId};
use chat_coordinator::domain::registry::OutboundEvent;
use chat_coordinator::startup::AppCore;

/// Settings tuned for tests; windows stay at their defaults so paused-clock
/// tests control them explicitly.
pub fn test_settings() -> Settings {
    Settings::default()
}

/// Full in-process stack under test.
pub struct TestCore {
    pub core: AppCore,
}

impl TestCore {
    pub fn new() -> Self {
        Self {
            core: AppCore::build(test_settings()),
        }
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            core: AppCore::build(settings),
        }
    }

    pub fn with_collaborators(
        settings: Settings,
        commands: Arc<dyn CommandDispatcher>,
        providers: Vec<Arc<dyn ContentProvider>>,
    ) -> Self {
        Self {
            core: AppCore::build_with(settings, commands, providers),
        }
    }

    /// Seed a user who is a member of the given rooms.
    pub fn seed_user(&self, id: UserId, username: &str, rooms: &[&str]) -> User {
        let mut user = User::new(id, username);
        for room in rooms {
            user.rooms.insert(room.to_lowercase());
        }
        self.core.repository.seed_user(user.clone());
        user
    }

    /// Seed a room with the given members.
    pub fn seed_room(&self, name: &str, members: &[UserId]) -> Room {
        let mut room = Room::new(name);
        for id in members {
            room.members.insert(*id);
        }
        self.core.repository.seed_room(room.clone());
        room
    }

    /// Open a delivery channel and connect the user on it.
    pub async fn connect(&self, user_id: UserId, connection_id: &str) -> UnboundedReceiver<OutboundEvent> {
        let rx = self.core.registry.open_channel(connection_id);
        self.core
            .coordinator
            .connect(connect_request(user_id, connection_id, false))
            .await
            .expect("connect failed");
        rx
    }

    /// Open a delivery channel and reconnect the user on it.
    pub async fn reconnect(&self, user_id: UserId, connection_id: &str) -> UnboundedReceiver<OutboundEvent> {
        let rx = self.core.registry.open_channel(connection_id);
        self.core
            .coordinator
            .connect(connect_request(user_id, connection_id, true))
            .await
            .expect("reconnect failed");
        rx
    }
}

pub fn connect_request(user_id: UserId, connection_id: &str, reconnect: bool) -> ConnectRequest {
    ConnectRequest {
        user_id,
        connection_id: connection_id.into(),
        user_agent: Some("test-agent".into()),
        client_version: "1.0".into(),
        reconnect,
        active_room: None,
    }
}

/// Drain everything currently queued on a channel.
pub fn drain(rx: &mut UnboundedReceiver<OutboundEvent>) -> Vec<OutboundEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Event names of everything currently queued on a channel.
pub fn drain_names(rx: &mut UnboundedReceiver<OutboundEvent>) -> Vec<&'static str> {
    drain(rx).iter().map(|e| e.event_name()).collect()
}
