//! Persistence port.
//!
//! The repository follows the unit-of-work pattern: mutations are staged
//! by the collaborator and only become durable on `commit`. The core
//! treats each call as providing its own consistency and never assumes
//! cross-call transactions.

use async_trait::async_trait;

use crate::domain::entities::{Message, Notification, Room, User, UserId};
use crate::shared::error::ChatError;

/// Data access contract consumed by the coordinator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    /// Find a user by ID.
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, ChatError>;

    /// Find a user by exact username, matched case-insensitively.
    async fn user_by_name(&self, username: &str) -> Result<Option<User>, ChatError>;

    /// Enumerate all users (idle-sweep primitive).
    async fn users(&self) -> Result<Vec<User>, ChatError>;

    /// Find a room by name, matched case-insensitively.
    async fn room_by_name(&self, name: &str) -> Result<Option<Room>, ChatError>;

    /// Enumerate all rooms.
    async fn rooms(&self) -> Result<Vec<Room>, ChatError>;

    /// Stage an update to a user's mutable projection.
    async fn update_user(&self, user: &User) -> Result<(), ChatError>;

    /// Stage an update to a room's mutable projection.
    async fn update_room(&self, room: &Room) -> Result<(), ChatError>;

    /// Stage a new message.
    async fn add_message(&self, message: &Message) -> Result<(), ChatError>;

    /// Find a message by ID.
    async fn message_by_id(&self, id: i64) -> Result<Option<Message>, ChatError>;

    /// Stage enrichment markup onto a stored message (appended, never
    /// replacing earlier enrichment).
    async fn append_enrichment(&self, message_id: i64, markup: &str) -> Result<(), ChatError>;

    /// Most recent messages in a room, oldest first, at most `limit`.
    async fn messages_by_room(&self, room: &str, limit: usize) -> Result<Vec<Message>, ChatError>;

    /// Members of a room whose status is not Offline.
    async fn online_users_by_room(&self, room: &str) -> Result<Vec<User>, ChatError>;

    /// Stage a new mention notification.
    async fn add_notification(&self, notification: &Notification) -> Result<(), ChatError>;

    /// Count of unread notifications for a user.
    async fn unread_notification_count(&self, user_id: UserId) -> Result<u64, ChatError>;

    /// Make all staged mutations durable.
    async fn commit(&self) -> Result<(), ChatError>;
}
