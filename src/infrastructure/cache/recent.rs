//! Recent Message Cache
//!
//! Bounded most-recent-N message history per room. Populated lazily on
//! first read, appended to on every send, evicting the oldest beyond N.

use std::collections::VecDeque;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::domain::entities::Message;

struct RoomHistory {
    messages: VecDeque<Message>,
}

/// Per-room bounded message history.
pub struct RecentMessageCache {
    rooms: DashMap<String, Mutex<RoomHistory>>,
    capacity: usize,
}

impl RecentMessageCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            capacity,
        }
    }

    /// Cached history for a room, oldest first. `None` until populated.
    pub fn get(&self, room: &str) -> Option<Vec<Message>> {
        self.rooms
            .get(room)
            .map(|entry| entry.lock().messages.iter().cloned().collect())
    }

    /// Seed a room's history from the repository read.
    pub fn populate(&self, room: &str, messages: Vec<Message>) {
        let mut history: VecDeque<Message> = messages.into();
        while history.len() > self.capacity {
            history.pop_front();
        }
        self.rooms
            .insert(room.to_string(), Mutex::new(RoomHistory { messages: history }));
    }

    /// Append a freshly sent message to an already-populated room.
    ///
    /// Unpopulated rooms are left alone so the first read still sees the
    /// full repository history.
    pub fn append(&self, room: &str, message: Message) {
        if let Some(entry) = self.rooms.get(room) {
            let mut history = entry.lock();
            history.messages.push_back(message);
            while history.messages.len() > self.capacity {
                history.messages.pop_front();
            }
        }
    }

    /// Patch enrichment onto a cached message, if present.
    pub fn patch_enrichment(&self, room: &str, message_id: i64, markup: &str) {
        if let Some(entry) = self.rooms.get(room) {
            let mut history = entry.lock();
            if let Some(message) = history.messages.iter_mut().find(|m| m.id == message_id) {
                message.append_enrichment(markup);
            }
        }
    }

    /// Drop a room's history entirely.
    pub fn evict_room(&self, room: &str) {
        self.rooms.remove(room);
    }
}
