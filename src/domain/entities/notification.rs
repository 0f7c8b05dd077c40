//! Mention notification entity.

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// A per-user notification created when a message mentions the user.
///
/// Created unread unless the recipient plausibly saw the message live
/// (connected, not away, recently active, and in the room).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Snowflake ID
    pub id: i64,

    /// Mentioned user
    pub user_id: UserId,

    /// Message that contained the mention
    pub message_id: i64,

    /// Room key the message was posted to
    pub room: String,

    /// Read flag
    pub read: bool,
}

impl Notification {
    pub fn new(id: i64, user_id: UserId, message_id: i64, room: impl Into<String>, read: bool) -> Self {
        Self {
            id,
            user_id,
            message_id,
            room: room.into(),
            read,
        }
    }
}
