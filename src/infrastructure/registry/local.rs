//! In-Process Client Registry
//!
//! Routes outbound events to connections over per-connection channels.
//! A transport adapter opens a channel per connection and drains the
//! receiver; everything above it addresses connections, users, or rooms.

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::domain::entities::{ConnectionId, UserId};
use crate::domain::registry::{ClientRegistry, OutboundEvent};

/// Generate a fresh connection ID for transports that do not issue their own.
pub fn new_connection_id() -> ConnectionId {
    uuid::Uuid::new_v4().to_string()
}

/// Registry implementation for a single-process deployment.
pub struct LocalClientRegistry {
    /// Delivery channels by connection ID
    senders: DashMap<ConnectionId, mpsc::UnboundedSender<OutboundEvent>>,
    /// Connection ID to owning user
    connection_users: DashMap<ConnectionId, UserId>,
    /// User ID to connection IDs (one user can have multiple devices)
    user_connections: DashMap<UserId, Vec<ConnectionId>>,
    /// Room key to subscribed connection IDs
    room_connections: DashMap<String, Vec<ConnectionId>>,
}

impl LocalClientRegistry {
    pub fn new() -> Self {
        Self {
            senders: DashMap::new(),
            connection_users: DashMap::new(),
            user_connections: DashMap::new(),
            room_connections: DashMap::new(),
        }
    }

    /// Open the delivery channel for a connection. The transport drains
    /// the returned receiver; events addressed to the connection before a
    /// channel is opened are dropped.
    pub fn open_channel(&self, connection_id: &str) -> mpsc::UnboundedReceiver<OutboundEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.insert(connection_id.to_string(), tx);
        rx
    }

    /// Number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.connection_users.len()
    }

    fn deliver(&self, connection_id: &str, event: OutboundEvent) {
        if let Some(sender) = self.senders.get(connection_id) {
            // A closed receiver just means the transport went away first.
            let _ = sender.send(event);
        }
    }
}

impl Default for LocalClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRegistry for LocalClientRegistry {
    fn register_connection(&self, connection_id: &str, user_id: UserId) {
        self.connection_users
            .insert(connection_id.to_string(), user_id);
        self.user_connections
            .entry(user_id)
            .or_default()
            .push(connection_id.to_string());
    }

    fn remove_connection(&self, connection_id: &str) {
        self.senders.remove(connection_id);
        if let Some((_, user_id)) = self.connection_users.remove(connection_id) {
            if let Some(mut ids) = self.user_connections.get_mut(&user_id) {
                ids.retain(|id| id != connection_id);
            }
        }
        for mut room in self.room_connections.iter_mut() {
            room.retain(|id| id != connection_id);
        }
    }

    fn subscribe(&self, connection_id: &str, room: &str) {
        let mut ids = self.room_connections.entry(room.to_string()).or_default();
        if !ids.iter().any(|id| id == connection_id) {
            ids.push(connection_id.to_string());
        }
    }

    fn unsubscribe(&self, connection_id: &str, room: &str) {
        if let Some(mut ids) = self.room_connections.get_mut(room) {
            ids.retain(|id| id != connection_id);
        }
    }

    fn send_to_connection(&self, connection_id: &str, event: OutboundEvent) {
        self.deliver(connection_id, event);
    }

    fn send_to_user(&self, user_id: UserId, event: OutboundEvent) {
        if let Some(ids) = self.user_connections.get(&user_id) {
            for connection_id in ids.value() {
                self.deliver(connection_id, event.clone());
            }
        }
    }

    fn send_to_room(&self, room: &str, event: OutboundEvent) {
        if let Some(ids) = self.room_connections.get(room) {
            for connection_id in ids.value() {
                self.deliver(connection_id, event.clone());
            }
        }
    }

    fn send_to_room_except(&self, room: &str, except: &str, event: OutboundEvent) {
        if let Some(ids) = self.room_connections.get(room) {
            for connection_id in ids.value() {
                if connection_id != except {
                    self.deliver(connection_id, event.clone());
                }
            }
        }
    }

    fn broadcast(&self, event: OutboundEvent) {
        for entry in self.senders.iter() {
            let _ = entry.value().send(event.clone());
        }
    }

    fn connections_of(&self, user_id: UserId) -> Vec<ConnectionId> {
        self.user_connections
            .get(&user_id)
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::{RoomUserPayload, UserSummary};

    fn typing_event(room: &str) -> OutboundEvent {
        OutboundEvent::Typing(RoomUserPayload {
            room: room.into(),
            user: UserSummary {
                id: "1".into(),
                username: "alice".into(),
                display_name: None,
                status: "active".into(),
            },
        })
    }

    #[test]
    fn test_room_fan_out_skips_unsubscribed() {
        let registry = LocalClientRegistry::new();
        let mut rx_a = registry.open_channel("a");
        let mut rx_b = registry.open_channel("b");
        registry.register_connection("a", 1);
        registry.register_connection("b", 2);
        registry.subscribe("a", "lobby");

        registry.send_to_room("lobby", typing_event("lobby"));

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_send_to_room_except_excludes_sender() {
        let registry = LocalClientRegistry::new();
        let mut rx_a = registry.open_channel("a");
        let mut rx_b = registry.open_channel("b");
        registry.register_connection("a", 1);
        registry.register_connection("b", 2);
        registry.subscribe("a", "lobby");
        registry.subscribe("b", "lobby");

        registry.send_to_room_except("lobby", "a", typing_event("lobby"));

        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn test_send_to_user_reaches_all_devices() {
        let registry = LocalClientRegistry::new();
        let mut rx_a = registry.open_channel("a");
        let mut rx_b = registry.open_channel("b");
        registry.register_connection("a", 1);
        registry.register_connection("b", 1);

        registry.send_to_user(1, typing_event("lobby"));

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn test_remove_connection_cleans_room_groups() {
        let registry = LocalClientRegistry::new();
        let _rx = registry.open_channel("a");
        registry.register_connection("a", 1);
        registry.subscribe("a", "lobby");

        registry.remove_connection("a");

        assert!(registry.connections_of(1).is_empty());
        assert_eq!(registry.connection_count(), 0);
    }
}
