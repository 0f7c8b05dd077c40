//! User entity.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Opaque user identifier issued by the external identity layer.
pub type UserId = i64;

/// Aggregate presence status derived from a user's connections and
/// last-activity recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// No connections; hidden from room rosters
    #[default]
    Offline,
    /// Connected but no activity within the freshness window
    Inactive,
    /// Connected with recent activity
    Active,
}

impl UserStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            _ => Self::Offline,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Inactive => "inactive",
            Self::Active => "active",
        }
    }

    /// Anything other than Offline counts as online.
    pub fn is_online(&self) -> bool {
        !matches!(self, Self::Offline)
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// In-memory projection of a chat user.
///
/// The core mutates status, activity, and room membership; identity fields
/// are owned by the external persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: UserId,

    /// Username (unique, matched case-insensitively)
    pub username: String,

    /// Display name (optional)
    pub display_name: Option<String>,

    /// Aggregate presence status
    #[serde(default)]
    pub status: UserStatus,

    /// Whether the user has marked themselves away
    pub afk: bool,

    /// Optional away note
    pub afk_note: Option<String>,

    /// Timestamp of the user's last activity
    pub last_activity: DateTime<Utc>,

    /// Names of the rooms the user has joined (lowercased keys)
    pub rooms: HashSet<String>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: None,
            status: UserStatus::Offline,
            afk: false,
            afk_note: None,
            last_activity: Utc::now(),
            rooms: HashSet::new(),
        }
    }

    /// Get the user's display name, falling back to username if not set.
    pub fn display_name_or_username(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    pub fn is_online(&self) -> bool {
        self.status.is_online()
    }

    /// Stamp the last-activity timestamp with the current time.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Whether the user was active within `window` of `now`.
    pub fn active_within(&self, window: Duration, now: DateTime<Utc>) -> bool {
        now - self.last_activity <= window
    }
}
