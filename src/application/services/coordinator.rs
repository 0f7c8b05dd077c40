//! Session/Message Coordinator
//!
//! The facade external transports call into: connect, send, disconnect,
//! typing, room membership, notifications. Enforces validity and
//! authorization rules, updates presence, persists through the
//! repository, and drives the registry and content pipeline.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::config::Settings;
use crate::domain::commands::{CommandDispatcher, COMMAND_PREFIX};
use crate::domain::entities::{Message, MessageKind, Notification, Room, User, UserId, UserStatus};
use crate::domain::registry::{
    ClientRegistry, MessagePayload, MessageReplacePayload, OutboundEvent, OutOfSyncPayload,
    RoomFocusPayload, RoomUserPayload, UnreadPayload, UserSummary, WelcomePayload,
};
use crate::domain::repository::Repository;
use crate::domain::services::{extract_links, extract_mentions};
use crate::infrastructure::cache::{MembershipCache, RecentMessageCache};
use crate::shared::error::ChatError;
use crate::shared::snowflake::SnowflakeGenerator;

use super::content::ContentPipeline;
use super::presence::{ConnectTransition, PresenceTracker};

/// Connect/reconnect parameters from the transport layer.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    pub user_id: UserId,
    pub connection_id: String,
    pub user_agent: Option<String>,
    /// Protocol version the client declares
    pub client_version: String,
    /// True when the transport re-established a dropped connection
    pub reconnect: bool,
    /// Client-side hint of the last focused room
    pub active_room: Option<String>,
}

/// Send parameters from the transport layer.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub user_id: UserId,
    pub connection_id: String,
    pub room: String,
    pub content: String,
    /// ID the client already rendered optimistically, if any
    pub client_message_id: Option<String>,
}

/// Room detail for display.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub name: String,
    pub topic: Option<String>,
    pub welcome: Option<String>,
    pub closed: bool,
    pub private: bool,
    pub owner_ids: Vec<String>,
    /// Roster restricted to non-Offline members
    pub users: Vec<UserSummary>,
}

/// Room listing entry.
#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub name: String,
    pub topic: Option<String>,
    pub closed: bool,
    pub private: bool,
    pub member_count: usize,
}

/// The coordination facade.
pub struct ChatCoordinator {
    repository: Arc<dyn Repository>,
    registry: Arc<dyn ClientRegistry>,
    presence: Arc<PresenceTracker>,
    membership: Arc<MembershipCache>,
    recent: Arc<RecentMessageCache>,
    content: Arc<ContentPipeline>,
    commands: Arc<dyn CommandDispatcher>,
    ids: Arc<SnowflakeGenerator>,

    max_message_length: usize,
    protocol_version: String,
    disconnect_grace: Duration,
    mention_read_window: chrono::Duration,
    recent_limit: usize,
}

impl ChatCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repository: Arc<dyn Repository>,
        registry: Arc<dyn ClientRegistry>,
        presence: Arc<PresenceTracker>,
        membership: Arc<MembershipCache>,
        recent: Arc<RecentMessageCache>,
        content: Arc<ContentPipeline>,
        commands: Arc<dyn CommandDispatcher>,
        ids: Arc<SnowflakeGenerator>,
        settings: &Settings,
    ) -> Self {
        Self {
            repository,
            registry,
            presence,
            membership,
            recent,
            content,
            commands,
            ids,
            max_message_length: settings.chat.max_message_length,
            protocol_version: settings.chat.protocol_version.clone(),
            disconnect_grace: settings.presence.disconnect_grace(),
            mention_read_window: settings.presence.mention_read_window(),
            recent_limit: settings.cache.recent_messages_per_room,
        }
    }

    // --- Session lifecycle ---

    /// Register a connection for a user.
    ///
    /// A fresh connect stamps a full log-on activity update; a reconnect
    /// of an Offline user flips them to Inactive. Either way, an
    /// Offline-to-online transition re-announces the user to every room
    /// they belong to, since Offline users are hidden from rosters.
    pub async fn connect(&self, request: ConnectRequest) -> Result<(), ChatError> {
        let mut user = self.load_user(request.user_id).await?;

        let transition = self.presence.add_connection(
            request.user_id,
            &request.connection_id,
            request.user_agent.clone(),
        );
        self.registry
            .register_connection(&request.connection_id, request.user_id);
        for room in &user.rooms {
            self.registry.subscribe(&request.connection_id, room);
        }
        self.presence
            .set_active_room(&request.connection_id, request.active_room.clone());

        if request.client_version != self.protocol_version {
            self.registry.send_to_connection(
                &request.connection_id,
                OutboundEvent::OutOfSync(OutOfSyncPayload {
                    server_version: self.protocol_version.clone(),
                    client_version: request.client_version.clone(),
                }),
            );
        }

        let was_offline = !user.status.is_online();

        if !request.reconnect {
            user.status = UserStatus::Active;
            user.touch();
            self.persist_user(&user).await?;
        } else {
            if was_offline {
                user.status = UserStatus::Inactive;
                self.persist_user(&user).await?;
            }
            if let Some(room) = self.presence.active_room(&request.connection_id) {
                if user.rooms.contains(&room) {
                    self.registry.send_to_connection(
                        &request.connection_id,
                        OutboundEvent::RoomFocus(RoomFocusPayload { room }),
                    );
                }
            }
        }

        if transition == ConnectTransition::CameOnline {
            self.announce_presence(&user);
        }

        tracing::info!(
            user_id = user.id,
            connection_id = %request.connection_id,
            reconnect = request.reconnect,
            "User connected"
        );
        Ok(())
    }

    /// Remove a connection. When it was the user's last one, the "left"
    /// announcement is debounced: a detached task re-checks after the
    /// grace period and stays silent if the user reconnected meanwhile.
    pub async fn disconnect(&self, connection_id: &str) -> Result<(), ChatError> {
        let Some(removed) = self.presence.remove_connection(connection_id) else {
            return Ok(());
        };
        self.registry.remove_connection(connection_id);

        tracing::info!(
            user_id = removed.user_id,
            connection_id = %connection_id,
            "User disconnected"
        );

        if removed.now_offline {
            self.spawn_debounced_leave(removed.user_id);
        }
        Ok(())
    }

    fn spawn_debounced_leave(&self, user_id: UserId) {
        let presence = Arc::clone(&self.presence);
        let repository = Arc::clone(&self.repository);
        let registry = Arc::clone(&self.registry);
        let grace = self.disconnect_grace;

        tokio::spawn(async move {
            tokio::time::sleep(grace).await;

            // A new connection during the grace period absorbs the drop.
            if presence.is_user_online(user_id) {
                tracing::debug!(user_id = user_id, "Reconnected within grace period");
                return;
            }

            let user = match repository.user_by_id(user_id).await {
                Ok(Some(mut user)) => {
                    user.status = UserStatus::Offline;
                    user
                }
                Ok(None) => return,
                Err(e) => {
                    tracing::warn!(user_id = user_id, error = %e, "Leave re-check load failed");
                    return;
                }
            };

            let summary = UserSummary::from(&user);
            for room in &user.rooms {
                registry.send_to_room(
                    room,
                    OutboundEvent::UserLeft(RoomUserPayload {
                        room: room.clone(),
                        user: summary.clone(),
                    }),
                );
            }

            if let Err(e) = async {
                repository.update_user(&user).await?;
                repository.commit().await
            }
            .await
            {
                tracing::warn!(user_id = user_id, error = %e, "Failed to persist offline status");
            }
        });
    }

    // --- Messaging ---

    /// Handle a message send. Returns `Ok(false)` when the input was
    /// consumed as a command, `Ok(true)` when a message was persisted and
    /// broadcast.
    pub async fn send(&self, request: SendRequest) -> Result<bool, ChatError> {
        if request.room.trim().is_empty() {
            return Err(ChatError::validation("Room name is required"));
        }
        if request.content.chars().count() > self.max_message_length {
            return Err(ChatError::validation(format!(
                "Message exceeds the maximum length of {} characters",
                self.max_message_length
            )));
        }

        if request.content.trim_start().starts_with(COMMAND_PREFIX) {
            let consumed = self
                .commands
                .try_dispatch(request.user_id, &request.room, request.content.trim())
                .await?;
            if consumed {
                return Ok(false);
            }
        }

        let room = self.load_room(&request.room).await?;
        if !self.is_member_cached(request.user_id, &room) {
            return Err(ChatError::authorization(format!(
                "You're not a member of '{}'",
                room.name
            )));
        }
        if room.closed {
            return Err(ChatError::validation(format!(
                "The room '{}' is closed",
                room.name
            )));
        }
        if room.private && !room.allows(request.user_id) {
            return Err(ChatError::authorization(format!(
                "You're not allowed into '{}'",
                room.name
            )));
        }

        let user = self.touch_user(request.user_id, &request.connection_id).await?;

        let message = Message::new(
            self.ids.generate(),
            room.key(),
            user.id,
            request.content.clone(),
            MessageKind::Ordinary,
        );
        self.repository.add_message(&message).await?;
        self.repository.commit().await?;
        self.recent.append(&room.key(), message.clone());

        let payload = MessagePayload::from_message(&message, &user);
        match &request.client_message_id {
            None => {
                self.registry
                    .send_to_room(&room.key(), OutboundEvent::Message(payload));
            }
            Some(client_id) => {
                // The caller already rendered optimistically: everyone
                // else gets the add, the caller gets a replace carrying
                // the id pair for client-side de-duplication.
                self.registry.send_to_room_except(
                    &room.key(),
                    &request.connection_id,
                    OutboundEvent::Message(payload.clone()),
                );
                self.registry.send_to_connection(
                    &request.connection_id,
                    OutboundEvent::MessageReplace(MessageReplacePayload {
                        client_message_id: client_id.clone(),
                        message: payload,
                    }),
                );
            }
        }

        self.process_mentions(&room, &message).await?;

        let links = extract_links(&message.content);
        Arc::clone(&self.content).resolve_detached(room.key(), message.id, links);

        Ok(true)
    }

    /// Post an owner-only system notice to a room.
    pub async fn post_notification(
        &self,
        user_id: UserId,
        room_name: &str,
        content: &str,
        resolve_content: bool,
    ) -> Result<i64, ChatError> {
        if content.chars().count() > self.max_message_length {
            return Err(ChatError::validation(format!(
                "Message exceeds the maximum length of {} characters",
                self.max_message_length
            )));
        }

        let room = self.load_room(room_name).await?;
        if !room.is_owner(user_id) {
            return Err(ChatError::authorization(format!(
                "Only owners of '{}' can post notifications",
                room.name
            )));
        }
        let user = self.load_user(user_id).await?;

        let message = Message::new(
            self.ids.generate(),
            room.key(),
            user_id,
            content,
            MessageKind::Notification,
        );
        self.repository.add_message(&message).await?;
        self.repository.commit().await?;
        self.recent.append(&room.key(), message.clone());

        self.registry.send_to_room(
            &room.key(),
            OutboundEvent::Message(MessagePayload::from_message(&message, &user)),
        );

        if resolve_content {
            let links = extract_links(&message.content);
            Arc::clone(&self.content).resolve_detached(room.key(), message.id, links);
        }

        Ok(message.id)
    }

    // --- Presence & activity ---

    /// Broadcast a typing indicator and refresh activity.
    pub async fn typing(
        &self,
        user_id: UserId,
        connection_id: &str,
        room_name: &str,
    ) -> Result<(), ChatError> {
        let room = self.load_room(room_name).await?;
        if !self.is_member_cached(user_id, &room) {
            return Err(ChatError::authorization(format!(
                "You're not a member of '{}'",
                room.name
            )));
        }

        let user = self.touch_user(user_id, connection_id).await?;
        self.repository.commit().await?;
        self.presence.set_active_room(connection_id, Some(room.key()));

        self.registry.send_to_room(
            &room.key(),
            OutboundEvent::Typing(RoomUserPayload {
                room: room.key(),
                user: UserSummary::from(&user),
            }),
        );
        Ok(())
    }

    /// Refresh activity and re-derive status, announcing to the user's rooms.
    pub async fn update_activity(
        &self,
        user_id: UserId,
        connection_id: &str,
    ) -> Result<(), ChatError> {
        let user = self.touch_user(user_id, connection_id).await?;
        self.repository.commit().await?;

        let summary = UserSummary::from(&user);
        for room in &user.rooms {
            self.registry.send_to_room(
                room,
                OutboundEvent::Activity(RoomUserPayload {
                    room: room.clone(),
                    user: summary.clone(),
                }),
            );
        }
        Ok(())
    }

    // --- Room membership ---

    /// Join a room. No-op when already a member.
    pub async fn join(&self, user_id: UserId, room_name: &str) -> Result<(), ChatError> {
        let mut room = self.load_room(room_name).await?;
        let mut user = self.load_user(user_id).await?;

        if room.is_member(user_id) {
            return Ok(());
        }
        if room.closed {
            return Err(ChatError::validation(format!(
                "The room '{}' is closed",
                room.name
            )));
        }
        if !room.allows(user_id) {
            return Err(ChatError::authorization(format!(
                "You're not allowed into '{}'",
                room.name
            )));
        }

        room.members.insert(user_id);
        user.rooms.insert(room.key());
        self.repository.update_room(&room).await?;
        self.repository.update_user(&user).await?;
        self.repository.commit().await?;

        self.membership.invalidate(user_id, &room.key());
        for connection_id in self.presence.connections_of(user_id) {
            self.registry.subscribe(&connection_id, &room.key());
        }

        self.registry.send_to_room(
            &room.key(),
            OutboundEvent::UserJoined(RoomUserPayload {
                room: room.key(),
                user: UserSummary::from(&user),
            }),
        );
        if let Some(text) = &room.welcome {
            self.registry.send_to_user(
                user_id,
                OutboundEvent::Welcome(WelcomePayload {
                    room: room.key(),
                    text: text.clone(),
                }),
            );
        }

        tracing::info!(user_id = user_id, room = %room.key(), "User joined room");
        Ok(())
    }

    /// Leave a room. No-op when not a member. Leaves announce
    /// immediately; only disconnects are debounced.
    pub async fn leave(&self, user_id: UserId, room_name: &str) -> Result<(), ChatError> {
        let mut room = self.load_room(room_name).await?;
        let mut user = self.load_user(user_id).await?;

        if !room.is_member(user_id) {
            return Ok(());
        }

        room.members.remove(&user_id);
        user.rooms.remove(&room.key());
        self.repository.update_room(&room).await?;
        self.repository.update_user(&user).await?;
        self.repository.commit().await?;

        self.membership.invalidate(user_id, &room.key());
        for connection_id in self.presence.connections_of(user_id) {
            self.registry.unsubscribe(&connection_id, &room.key());
        }

        self.registry.send_to_room(
            &room.key(),
            OutboundEvent::UserLeft(RoomUserPayload {
                room: room.key(),
                user: UserSummary::from(&user),
            }),
        );

        tracing::info!(user_id = user_id, room = %room.key(), "User left room");
        Ok(())
    }

    // --- Read paths ---

    /// Room detail with a roster of non-Offline members.
    pub async fn room_info(&self, room_name: &str) -> Result<RoomInfo, ChatError> {
        let room = self.load_room(room_name).await?;
        let users = self
            .repository
            .online_users_by_room(&room.key())
            .await?
            .iter()
            .map(UserSummary::from)
            .collect();

        Ok(RoomInfo {
            name: room.name.clone(),
            topic: room.topic.clone(),
            welcome: room.welcome.clone(),
            closed: room.closed,
            private: room.private,
            owner_ids: room.owners.iter().map(|id| id.to_string()).collect(),
            users,
        })
    }

    /// Recent messages for a room, oldest first, through the bounded cache.
    pub async fn previous_messages(&self, room_name: &str) -> Result<Vec<Message>, ChatError> {
        let room = self.load_room(room_name).await?;
        if let Some(cached) = self.recent.get(&room.key()) {
            return Ok(cached);
        }
        let messages = self
            .repository
            .messages_by_room(&room.key(), self.recent_limit)
            .await?;
        self.recent.populate(&room.key(), messages.clone());
        Ok(messages)
    }

    /// List all rooms.
    pub async fn rooms(&self) -> Result<Vec<RoomSummary>, ChatError> {
        Ok(self
            .repository
            .rooms()
            .await?
            .into_iter()
            .map(|room| RoomSummary {
                name: room.name.clone(),
                topic: room.topic.clone(),
                closed: room.closed,
                private: room.private,
                member_count: room.members.len(),
            })
            .collect())
    }

    // --- Internals ---

    async fn load_user(&self, user_id: UserId) -> Result<User, ChatError> {
        self.repository
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| ChatError::not_found(format!("user {}", user_id)))
    }

    async fn load_room(&self, name: &str) -> Result<Room, ChatError> {
        if name.trim().is_empty() {
            return Err(ChatError::validation("Room name is required"));
        }
        self.repository
            .room_by_name(name)
            .await?
            .ok_or_else(|| ChatError::not_found(format!("room '{}'", name)))
    }

    /// Membership check through the TTL cache: computed once, trusted
    /// until invalidated by a join/leave.
    fn is_member_cached(&self, user_id: UserId, room: &Room) -> bool {
        let key = room.key();
        if let Some(verdict) = self.membership.get(user_id, &key) {
            return verdict;
        }
        let verdict = room.is_member(user_id);
        self.membership.set(user_id, &key, verdict);
        verdict
    }

    /// Stamp activity on the connection and the user projection, staging
    /// the user update for the caller's commit.
    async fn touch_user(&self, user_id: UserId, connection_id: &str) -> Result<User, ChatError> {
        self.presence.touch(connection_id);
        let mut user = self.load_user(user_id).await?;
        user.touch();
        user.status = UserStatus::Active;
        self.repository.update_user(&user).await?;
        Ok(user)
    }

    /// Persist a user projection; an in-memory presence mutation is never
    /// rolled back on a persistence fault.
    async fn persist_user(&self, user: &User) -> Result<(), ChatError> {
        let staged = async {
            self.repository.update_user(user).await?;
            self.repository.commit().await
        };
        if let Err(e) = staged.await {
            tracing::error!(user_id = user.id, error = %e, "Failed to persist user state");
            return Err(e);
        }
        Ok(())
    }

    /// Re-announce an Offline-to-online user to every room they belong to.
    fn announce_presence(&self, user: &User) {
        let summary = UserSummary::from(user);
        for room in &user.rooms {
            self.registry.send_to_room(
                room,
                OutboundEvent::UserPresent(RoomUserPayload {
                    room: room.clone(),
                    user: summary.clone(),
                }),
            );
        }
    }

    /// Scan a persisted message for mentions, create notifications in one
    /// commit, then push updated unread counts to each mentioned user.
    async fn process_mentions(&self, room: &Room, message: &Message) -> Result<(), ChatError> {
        let now = Utc::now();
        let mut mentioned: Vec<User> = Vec::new();

        for name in extract_mentions(&message.content) {
            let Some(user) = self.repository.user_by_name(&name).await? else {
                continue;
            };
            if user.id == message.author_id {
                continue;
            }
            if room.private && !room.allows(user.id) {
                continue;
            }
            if mentioned.iter().any(|seen| seen.id == user.id) {
                continue;
            }

            // Heuristic: the mention counts as read only when the
            // recipient plausibly saw the message live.
            let seen_live = self.presence.is_user_online(user.id)
                && !user.afk
                && user.active_within(self.mention_read_window, now)
                && room.is_member(user.id);

            let notification = Notification::new(
                self.ids.generate(),
                user.id,
                message.id,
                room.key(),
                seen_live,
            );
            self.repository.add_notification(&notification).await?;
            mentioned.push(user);
        }

        if mentioned.is_empty() {
            return Ok(());
        }
        self.repository.commit().await?;

        for user in mentioned {
            let unread = self.repository.unread_notification_count(user.id).await?;
            self.registry.send_to_user(
                user.id,
                OutboundEvent::UnreadNotifications(UnreadPayload { unread }),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::{MockCommandDispatcher, NullCommandDispatcher};
    use crate::domain::registry::MockClientRegistry;
    use crate::domain::repository::MockRepository;

    fn build(
        repository: MockRepository,
        registry: MockClientRegistry,
        commands: Arc<dyn CommandDispatcher>,
    ) -> (ChatCoordinator, Arc<PresenceTracker>) {
        let settings = Settings::default();
        let repository: Arc<dyn Repository> = Arc::new(repository);
        let registry: Arc<dyn ClientRegistry> = Arc::new(registry);
        let presence = Arc::new(PresenceTracker::new(settings.presence.activity_window()));
        let membership = Arc::new(MembershipCache::new(settings.cache.membership_ttl()));
        let recent = Arc::new(RecentMessageCache::new(
            settings.cache.recent_messages_per_room,
        ));
        let content = Arc::new(ContentPipeline::new(
            Vec::new(),
            repository.clone(),
            registry.clone(),
            recent.clone(),
            settings.content.provider_timeout(),
        ));
        let coordinator = ChatCoordinator::new(
            repository,
            registry,
            presence.clone(),
            membership,
            recent,
            content,
            commands,
            Arc::new(SnowflakeGenerator::new(1)),
            &settings,
        );
        (coordinator, presence)
    }

    fn connect_request(user_id: UserId, connection_id: &str) -> ConnectRequest {
        ConnectRequest {
            user_id,
            connection_id: connection_id.into(),
            user_agent: None,
            client_version: "1.0".into(),
            reconnect: false,
            active_room: None,
        }
    }

    #[tokio::test]
    async fn test_persistence_fault_keeps_in_memory_presence() {
        let mut repository = MockRepository::new();
        repository
            .expect_user_by_id()
            .returning(|id| Ok(Some(User::new(id, "alice"))));
        repository.expect_update_user().returning(|_| Ok(()));
        repository
            .expect_commit()
            .returning(|| Err(ChatError::persistence("commit failed")));

        let mut registry = MockClientRegistry::new();
        registry.expect_register_connection().return_const(());
        registry.expect_subscribe().return_const(());
        registry.expect_send_to_connection().return_const(());
        registry.expect_send_to_room().return_const(());

        let (coordinator, presence) =
            build(repository, registry, Arc::new(NullCommandDispatcher));

        let result = coordinator.connect(connect_request(1, "c-1")).await;
        assert!(matches!(result, Err(ChatError::Persistence(_))));
        // The in-memory presence model is the source of truth; the fault
        // must not roll the registration back.
        assert!(presence.is_user_online(1));
    }

    #[tokio::test]
    async fn test_membership_verdict_trusted_until_invalidated() {
        let mut repository = MockRepository::new();
        // The room gains the user between the two sends; the cached
        // negative verdict must still win until invalidated.
        repository
            .expect_room_by_name()
            .times(1)
            .returning(|name| Ok(Some(Room::new(name))));
        repository.expect_room_by_name().returning(|name| {
            let mut room = Room::new(name);
            room.members.insert(1);
            Ok(Some(room))
        });

        let registry = MockClientRegistry::new();
        let (coordinator, _presence) =
            build(repository, registry, Arc::new(NullCommandDispatcher));

        let request = SendRequest {
            user_id: 1,
            connection_id: "c-1".into(),
            room: "lobby".into(),
            content: "hello".into(),
            client_message_id: None,
        };

        let first = coordinator.send(request.clone()).await;
        assert!(matches!(first, Err(ChatError::Authorization(_))));

        let second = coordinator.send(request).await;
        assert!(matches!(second, Err(ChatError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_command_input_skips_message_handling() {
        // No repository or registry expectations: a consumed command must
        // not touch persistence or broadcast anything.
        let repository = MockRepository::new();
        let registry = MockClientRegistry::new();

        let mut commands = MockCommandDispatcher::new();
        commands
            .expect_try_dispatch()
            .times(1)
            .returning(|_, _, _| Ok(true));

        let (coordinator, _presence) = build(repository, registry, Arc::new(commands));

        let result = coordinator
            .send(SendRequest {
                user_id: 1,
                connection_id: "c-1".into(),
                room: "lobby".into(),
                content: "/wave".into(),
                client_message_id: None,
            })
            .await;
        assert!(matches!(result, Ok(false)));
    }

    #[tokio::test]
    async fn test_blank_room_name_is_validation_error() {
        let (coordinator, _presence) = build(
            MockRepository::new(),
            MockClientRegistry::new(),
            Arc::new(NullCommandDispatcher),
        );

        let result = coordinator
            .send(SendRequest {
                user_id: 1,
                connection_id: "c-1".into(),
                room: "  ".into(),
                content: "hello".into(),
                client_message_id: None,
            })
            .await;
        assert!(matches!(result, Err(ChatError::Validation(_))));
    }
}
