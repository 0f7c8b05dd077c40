//! Connection entity and per-connection client state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Transport-issued connection identifier (one per device/session).
pub type ConnectionId = String;

/// A single device/session connection, exclusively owned by the presence
/// tracker: created on connect, removed on disconnect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID issued by the transport
    pub id: ConnectionId,

    /// Owning user
    pub user_id: UserId,

    /// User-agent string reported by the transport
    pub user_agent: Option<String>,

    /// Timestamp of the connection's last activity
    pub last_activity: DateTime<Utc>,
}

impl Connection {
    pub fn new(id: impl Into<ConnectionId>, user_id: UserId, user_agent: Option<String>) -> Self {
        Self {
            id: id.into(),
            user_id,
            user_agent,
            last_activity: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

/// Per-connection ephemeral hint used only to restore UI focus on
/// reconnect; not authoritative for membership or presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientState {
    /// Name of the room the client last had focused
    pub active_room: Option<String>,
}
