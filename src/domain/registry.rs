//! Client registry port and outbound event types.
//!
//! The registry is the sole conduit for outbound traffic: it can address
//! a single connection, every device of a user, a room group, or every
//! connected client. The concrete transport behind it is out of scope.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{ConnectionId, Message, User, UserId};

/// Outbound event types routed through the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", content = "d")]
pub enum OutboundEvent {
    // Message events
    #[serde(rename = "MESSAGE")]
    Message(MessagePayload),
    #[serde(rename = "MESSAGE_REPLACE")]
    MessageReplace(MessageReplacePayload),
    #[serde(rename = "MESSAGE_ENRICHED")]
    MessageEnriched(MessageEnrichedPayload),

    // Room membership events
    #[serde(rename = "USER_JOINED")]
    UserJoined(RoomUserPayload),
    #[serde(rename = "USER_LEFT")]
    UserLeft(RoomUserPayload),
    #[serde(rename = "USER_PRESENT")]
    UserPresent(RoomUserPayload),

    // Presence events
    #[serde(rename = "TYPING")]
    Typing(RoomUserPayload),
    #[serde(rename = "ACTIVITY")]
    Activity(RoomUserPayload),

    // Per-user events
    #[serde(rename = "UNREAD_NOTIFICATIONS")]
    UnreadNotifications(UnreadPayload),
    #[serde(rename = "OUT_OF_SYNC")]
    OutOfSync(OutOfSyncPayload),
    #[serde(rename = "WELCOME")]
    Welcome(WelcomePayload),
    #[serde(rename = "ROOM_FOCUS")]
    RoomFocus(RoomFocusPayload),
}

impl OutboundEvent {
    /// Get the event name for dispatch
    pub fn event_name(&self) -> &'static str {
        match self {
            OutboundEvent::Message(_) => "MESSAGE",
            OutboundEvent::MessageReplace(_) => "MESSAGE_REPLACE",
            OutboundEvent::MessageEnriched(_) => "MESSAGE_ENRICHED",
            OutboundEvent::UserJoined(_) => "USER_JOINED",
            OutboundEvent::UserLeft(_) => "USER_LEFT",
            OutboundEvent::UserPresent(_) => "USER_PRESENT",
            OutboundEvent::Typing(_) => "TYPING",
            OutboundEvent::Activity(_) => "ACTIVITY",
            OutboundEvent::UnreadNotifications(_) => "UNREAD_NOTIFICATIONS",
            OutboundEvent::OutOfSync(_) => "OUT_OF_SYNC",
            OutboundEvent::Welcome(_) => "WELCOME",
            OutboundEvent::RoomFocus(_) => "ROOM_FOCUS",
        }
    }
}

// Event payload structs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub status: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            status: user.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: String,
    pub room: String,
    pub author: UserSummary,
    pub content: String,
    pub kind: String,
    pub timestamp: String,
}

impl MessagePayload {
    pub fn from_message(message: &Message, author: &User) -> Self {
        Self {
            id: message.id.to_string(),
            room: message.room.clone(),
            author: UserSummary::from(author),
            content: message.content.clone(),
            kind: message.kind.as_str().to_string(),
            timestamp: message.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReplacePayload {
    /// Client-generated ID of the optimistically rendered entry
    pub client_message_id: String,
    /// Canonical message the client should replace it with
    pub message: MessagePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEnrichedPayload {
    pub message_id: String,
    pub room: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomUserPayload {
    pub room: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadPayload {
    pub unread: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutOfSyncPayload {
    pub server_version: String,
    pub client_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomePayload {
    pub room: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomFocusPayload {
    pub room: String,
}

/// Broadcaster port: every outbound event the core emits goes through an
/// implementation of this trait.
#[cfg_attr(test, mockall::automock)]
pub trait ClientRegistry: Send + Sync {
    /// Register a connection so user-addressed sends reach it.
    fn register_connection(&self, connection_id: &str, user_id: UserId);

    /// Remove a connection from all indexes and room groups.
    fn remove_connection(&self, connection_id: &str);

    /// Add a connection to a room group.
    fn subscribe(&self, connection_id: &str, room: &str);

    /// Remove a connection from a room group.
    fn unsubscribe(&self, connection_id: &str, room: &str);

    /// Send to one connection.
    fn send_to_connection(&self, connection_id: &str, event: OutboundEvent);

    /// Send to every connection of a user.
    fn send_to_user(&self, user_id: UserId, event: OutboundEvent);

    /// Send to every connection subscribed to a room.
    fn send_to_room(&self, room: &str, event: OutboundEvent);

    /// Send to every room subscriber except one connection.
    fn send_to_room_except(&self, room: &str, except: &str, event: OutboundEvent);

    /// Send to every connected client.
    fn broadcast(&self, event: OutboundEvent);

    /// Connection IDs currently registered for a user.
    fn connections_of(&self, user_id: UserId) -> Vec<ConnectionId>;
}
