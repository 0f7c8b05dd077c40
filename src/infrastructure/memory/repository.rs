//! In-Memory Repository
//!
//! Unit-of-work repository for a single-process deployment and for the
//! test suite. Mutations land in a staging area and become visible to
//! reads only after `commit`.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::domain::entities::{Message, Notification, Room, User, UserId};
use crate::domain::repository::Repository;
use crate::shared::error::ChatError;

#[derive(Default)]
struct Store {
    users: HashMap<UserId, User>,
    user_names: HashMap<String, UserId>,
    rooms: HashMap<String, Room>,
    messages: HashMap<i64, Message>,
    room_messages: HashMap<String, Vec<i64>>,
    notifications: HashMap<i64, Notification>,
}

impl Store {
    fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::User(user) => {
                self.user_names.insert(user.username.to_lowercase(), user.id);
                self.users.insert(user.id, user);
            }
            Mutation::Room(room) => {
                self.rooms.insert(room.key(), room);
            }
            Mutation::Message(message) => {
                self.room_messages
                    .entry(message.room.clone())
                    .or_default()
                    .push(message.id);
                self.messages.insert(message.id, message);
            }
            Mutation::Enrichment { message_id, markup } => {
                if let Some(message) = self.messages.get_mut(&message_id) {
                    message.append_enrichment(&markup);
                }
            }
            Mutation::Notification(notification) => {
                self.notifications.insert(notification.id, notification);
            }
        }
    }
}

enum Mutation {
    User(User),
    Room(Room),
    Message(Message),
    Enrichment { message_id: i64, markup: String },
    Notification(Notification),
}

/// Repository keeping everything in process memory.
pub struct InMemoryRepository {
    store: RwLock<Store>,
    staged: Mutex<Vec<Mutation>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
            staged: Mutex::new(Vec::new()),
        }
    }

    /// Bootstrap helper: insert a user directly into committed state.
    pub fn seed_user(&self, user: User) {
        self.store.write().apply(Mutation::User(user));
    }

    /// Bootstrap helper: insert a room directly into committed state.
    pub fn seed_room(&self, room: Room) {
        self.store.write().apply(Mutation::Room(room));
    }

    fn stage(&self, mutation: Mutation) {
        self.staged.lock().push(mutation);
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, ChatError> {
        Ok(self.store.read().users.get(&id).cloned())
    }

    async fn user_by_name(&self, username: &str) -> Result<Option<User>, ChatError> {
        let store = self.store.read();
        Ok(store
            .user_names
            .get(&username.to_lowercase())
            .and_then(|id| store.users.get(id))
            .cloned())
    }

    async fn users(&self) -> Result<Vec<User>, ChatError> {
        Ok(self.store.read().users.values().cloned().collect())
    }

    async fn room_by_name(&self, name: &str) -> Result<Option<Room>, ChatError> {
        Ok(self.store.read().rooms.get(&name.to_lowercase()).cloned())
    }

    async fn rooms(&self) -> Result<Vec<Room>, ChatError> {
        Ok(self.store.read().rooms.values().cloned().collect())
    }

    async fn update_user(&self, user: &User) -> Result<(), ChatError> {
        self.stage(Mutation::User(user.clone()));
        Ok(())
    }

    async fn update_room(&self, room: &Room) -> Result<(), ChatError> {
        self.stage(Mutation::Room(room.clone()));
        Ok(())
    }

    async fn add_message(&self, message: &Message) -> Result<(), ChatError> {
        self.stage(Mutation::Message(message.clone()));
        Ok(())
    }

    async fn message_by_id(&self, id: i64) -> Result<Option<Message>, ChatError> {
        Ok(self.store.read().messages.get(&id).cloned())
    }

    async fn append_enrichment(&self, message_id: i64, markup: &str) -> Result<(), ChatError> {
        self.stage(Mutation::Enrichment {
            message_id,
            markup: markup.to_string(),
        });
        Ok(())
    }

    async fn messages_by_room(&self, room: &str, limit: usize) -> Result<Vec<Message>, ChatError> {
        let store = self.store.read();
        let ids = match store.room_messages.get(&room.to_lowercase()) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };
        let start = ids.len().saturating_sub(limit);
        Ok(ids[start..]
            .iter()
            .filter_map(|id| store.messages.get(id))
            .cloned()
            .collect())
    }

    async fn online_users_by_room(&self, room: &str) -> Result<Vec<User>, ChatError> {
        let store = self.store.read();
        let members = match store.rooms.get(&room.to_lowercase()) {
            Some(room) => &room.members,
            None => return Ok(Vec::new()),
        };
        Ok(members
            .iter()
            .filter_map(|id| store.users.get(id))
            .filter(|user| user.is_online())
            .cloned()
            .collect())
    }

    async fn add_notification(&self, notification: &Notification) -> Result<(), ChatError> {
        self.stage(Mutation::Notification(notification.clone()));
        Ok(())
    }

    async fn unread_notification_count(&self, user_id: UserId) -> Result<u64, ChatError> {
        Ok(self
            .store
            .read()
            .notifications
            .values()
            .filter(|n| n.user_id == user_id && !n.read)
            .count() as u64)
    }

    async fn commit(&self) -> Result<(), ChatError> {
        let mutations: Vec<Mutation> = self.staged.lock().drain(..).collect();
        if mutations.is_empty() {
            return Ok(());
        }
        let mut store = self.store.write();
        for mutation in mutations {
            store.apply(mutation);
        }
        Ok(())
    }
}
