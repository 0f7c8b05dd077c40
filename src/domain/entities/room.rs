//! Room entity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// A chat room. Names are unique case-insensitively; `key()` yields the
/// canonical lowercase form used everywhere as the lookup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room name as created (display form)
    pub name: String,

    /// Closed rooms reject sends and joins
    pub closed: bool,

    /// Private rooms admit only allowed users and owners
    pub private: bool,

    /// Room topic
    pub topic: Option<String>,

    /// Welcome text sent to joining users
    pub welcome: Option<String>,

    /// User IDs of current members
    pub members: HashSet<UserId>,

    /// User IDs of room owners
    pub owners: HashSet<UserId>,

    /// User IDs allowed into the room; meaningful only when private
    pub allowed: HashSet<UserId>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            closed: false,
            private: false,
            topic: None,
            welcome: None,
            members: HashSet::new(),
            owners: HashSet::new(),
            allowed: HashSet::new(),
        }
    }

    /// Canonical lowercase lookup key.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }

    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owners.contains(&user_id)
    }

    /// Whether the user may enter/see the room. Public rooms admit
    /// everyone; private rooms admit owners and allowed users.
    pub fn allows(&self, user_id: UserId) -> bool {
        !self.private || self.owners.contains(&user_id) || self.allowed.contains(&user_id)
    }
}
