//! Presence Tracker
//!
//! Owns the user -> connections mapping and derives aggregate status.
//! The in-memory state here is the source of truth for real-time
//! behavior; persistence of status is for durability only.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::entities::{ClientState, Connection, ConnectionId, User, UserId, UserStatus};
use crate::domain::repository::Repository;
use crate::shared::error::ChatError;

/// Outcome of registering a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectTransition {
    /// The user had no connections; rooms must be told the user is present
    CameOnline,
    /// Another device was already connected; no announcement
    AlreadyOnline,
}

/// Outcome of removing a connection.
#[derive(Debug, Clone, Copy)]
pub struct Disconnected {
    pub user_id: UserId,
    /// True when this was the user's last connection
    pub now_offline: bool,
}

/// Tracks which connections each user currently has.
pub struct PresenceTracker {
    /// Active connections by connection ID
    connections: DashMap<ConnectionId, Connection>,
    /// User ID to connection IDs (one user can have multiple devices)
    user_connections: DashMap<UserId, HashSet<ConnectionId>>,
    /// Per-connection UI hints
    client_state: DashMap<ConnectionId, ClientState>,
    /// Freshness window separating Active from Inactive
    activity_window: chrono::Duration,
}

impl PresenceTracker {
    pub fn new(activity_window: chrono::Duration) -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
            client_state: DashMap::new(),
            activity_window,
        }
    }

    /// Register a connection for a user.
    pub fn add_connection(
        &self,
        user_id: UserId,
        connection_id: &str,
        user_agent: Option<String>,
    ) -> ConnectTransition {
        let connection = Connection::new(connection_id, user_id, user_agent);
        self.connections.insert(connection_id.to_string(), connection);

        let mut ids = self.user_connections.entry(user_id).or_default();
        let was_offline = ids.is_empty();
        ids.insert(connection_id.to_string());

        tracing::debug!(
            user_id = user_id,
            connection_id = %connection_id,
            was_offline = was_offline,
            "Connection registered"
        );

        if was_offline {
            ConnectTransition::CameOnline
        } else {
            ConnectTransition::AlreadyOnline
        }
    }

    /// Remove a connection. Returns the owner and whether the user's
    /// connection set is now empty.
    pub fn remove_connection(&self, connection_id: &str) -> Option<Disconnected> {
        let (_, connection) = self.connections.remove(connection_id)?;
        self.client_state.remove(connection_id);

        let user_id = connection.user_id;
        let mut now_offline = false;
        if let Some(mut ids) = self.user_connections.get_mut(&user_id) {
            ids.remove(connection_id);
            now_offline = ids.is_empty();
        }
        if now_offline {
            self.user_connections.remove_if(&user_id, |_, ids| ids.is_empty());
        }

        tracing::debug!(
            user_id = user_id,
            connection_id = %connection_id,
            now_offline = now_offline,
            "Connection removed"
        );

        Some(Disconnected { user_id, now_offline })
    }

    /// Refresh a connection's activity timestamp. Returns the owner.
    pub fn touch(&self, connection_id: &str) -> Option<UserId> {
        let mut connection = self.connections.get_mut(connection_id)?;
        connection.touch();
        Some(connection.user_id)
    }

    /// Check if a user has at least one connection.
    pub fn is_user_online(&self, user_id: UserId) -> bool {
        self.user_connections
            .get(&user_id)
            .map(|ids| !ids.is_empty())
            .unwrap_or(false)
    }

    pub fn connection_count(&self, user_id: UserId) -> usize {
        self.user_connections
            .get(&user_id)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }

    pub fn connection_user(&self, connection_id: &str) -> Option<UserId> {
        self.connections.get(connection_id).map(|c| c.user_id)
    }

    pub fn connections_of(&self, user_id: UserId) -> Vec<ConnectionId> {
        self.user_connections
            .get(&user_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Store the active-room hint for a connection.
    pub fn set_active_room(&self, connection_id: &str, room: Option<String>) {
        self.client_state
            .entry(connection_id.to_string())
            .or_default()
            .active_room = room;
    }

    pub fn active_room(&self, connection_id: &str) -> Option<String> {
        self.client_state
            .get(connection_id)
            .and_then(|state| state.active_room.clone())
    }

    /// Derive the aggregate status for a user.
    ///
    /// Offline iff the connection set is empty; otherwise Active within
    /// the freshness window of the user's last activity, else Inactive.
    pub fn derived_status(&self, user: &User, now: DateTime<Utc>) -> UserStatus {
        if !self.is_user_online(user.id) {
            UserStatus::Offline
        } else if user.active_within(self.activity_window, now) {
            UserStatus::Active
        } else {
            UserStatus::Inactive
        }
    }

    /// One idle-sweep pass: demote Active users whose last activity fell
    /// outside the freshness window. Run periodically off the real-time
    /// path. Returns the demoted user IDs.
    pub async fn sweep_idle(&self, repository: &Arc<dyn Repository>) -> Result<Vec<UserId>, ChatError> {
        let now = Utc::now();
        let mut demoted = Vec::new();

        for mut user in repository.users().await? {
            if user.status != UserStatus::Active {
                continue;
            }
            if !self.is_user_online(user.id) {
                continue;
            }
            if user.active_within(self.activity_window, now) {
                continue;
            }
            user.status = UserStatus::Inactive;
            repository.update_user(&user).await?;
            demoted.push(user.id);
        }

        if !demoted.is_empty() {
            repository.commit().await?;
            tracing::debug!(count = demoted.len(), "Idle sweep demoted users");
        }

        Ok(demoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PresenceTracker {
        PresenceTracker::new(chrono::Duration::minutes(5))
    }

    #[test]
    fn test_first_connection_comes_online() {
        let presence = tracker();
        assert_eq!(
            presence.add_connection(1, "c-1", None),
            ConnectTransition::CameOnline
        );
        assert!(presence.is_user_online(1));
    }

    #[test]
    fn test_second_device_is_already_online() {
        let presence = tracker();
        presence.add_connection(1, "c-1", None);
        assert_eq!(
            presence.add_connection(1, "c-2", None),
            ConnectTransition::AlreadyOnline
        );
        assert_eq!(presence.connection_count(1), 2);
    }

    #[test]
    fn test_offline_only_after_last_connection_removed() {
        let presence = tracker();
        presence.add_connection(1, "c-1", None);
        presence.add_connection(1, "c-2", None);

        let first = presence.remove_connection("c-1").unwrap();
        assert!(!first.now_offline);
        assert!(presence.is_user_online(1));

        let second = presence.remove_connection("c-2").unwrap();
        assert!(second.now_offline);
        assert!(!presence.is_user_online(1));
    }

    #[test]
    fn test_remove_unknown_connection_is_none() {
        assert!(tracker().remove_connection("nope").is_none());
    }

    #[test]
    fn test_derived_status_tracks_connections_and_activity() {
        let presence = tracker();
        let mut user = User::new(1, "alice");
        let now = Utc::now();

        // Offline iff connection set is empty
        assert_eq!(presence.derived_status(&user, now), UserStatus::Offline);

        presence.add_connection(1, "c-1", None);
        user.last_activity = now;
        assert_eq!(presence.derived_status(&user, now), UserStatus::Active);

        user.last_activity = now - chrono::Duration::minutes(10);
        assert_eq!(presence.derived_status(&user, now), UserStatus::Inactive);

        presence.remove_connection("c-1");
        assert_eq!(presence.derived_status(&user, now), UserStatus::Offline);
    }

    #[test]
    fn test_active_room_hint_round_trip() {
        let presence = tracker();
        presence.add_connection(1, "c-1", None);
        presence.set_active_room("c-1", Some("lobby".into()));
        assert_eq!(presence.active_room("c-1"), Some("lobby".into()));

        presence.remove_connection("c-1");
        assert_eq!(presence.active_room("c-1"), None);
    }
}
