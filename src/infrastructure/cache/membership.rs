//! Membership Verdict Cache
//!
//! Short-lived cache for (user, room) membership checks, so every send
//! does not hit the repository. Verdicts are computed once and trusted
//! until explicitly invalidated on a membership change; the TTL is long
//! because joins and leaves are rare.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::domain::entities::UserId;

/// Cache key prefixes
mod keys {
    pub const MEMBERSHIP: &str = "member:";
}

/// TTL'd membership verdict cache.
pub struct MembershipCache {
    entries: DashMap<String, (bool, Instant)>,
    ttl: Duration,
}

impl MembershipCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    fn key(user_id: UserId, room: &str) -> String {
        format!("{}{}:{}", keys::MEMBERSHIP, user_id, room)
    }

    /// Get a cached verdict, dropping it if expired.
    pub fn get(&self, user_id: UserId, room: &str) -> Option<bool> {
        let key = Self::key(user_id, room);
        let expired = match self.entries.get(&key) {
            Some(entry) => {
                let (verdict, stored_at) = *entry;
                if stored_at.elapsed() < self.ttl {
                    return Some(verdict);
                }
                true
            }
            None => false,
        };
        if expired {
            self.entries.remove(&key);
        }
        None
    }

    /// Store a verdict (positive or negative).
    pub fn set(&self, user_id: UserId, room: &str, is_member: bool) {
        self.entries
            .insert(Self::key(user_id, room), (is_member, Instant::now()));
    }

    /// Drop the verdict for one (user, room) pair.
    pub fn invalidate(&self, user_id: UserId, room: &str) {
        self.entries.remove(&Self::key(user_id, room));
    }

    /// Drop every verdict for a room (e.g. when the room is reconfigured).
    pub fn invalidate_room(&self, room: &str) {
        let suffix = format!(":{}", room);
        self.entries.retain(|key, _| !key.ends_with(&suffix));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
