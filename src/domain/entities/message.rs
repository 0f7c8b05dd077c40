//! Message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// A regular user message
    #[default]
    Ordinary,
    /// A system notice posted by a room owner
    Notification,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary",
            Self::Notification => "notification",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message posted to a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake ID
    pub id: i64,

    /// Room key the message was posted to
    pub room: String,

    /// Author user ID
    pub author_id: UserId,

    /// Message content
    pub content: String,

    /// Kind of message
    #[serde(rename = "type")]
    pub kind: MessageKind,

    /// Rendered enrichment markup appended by the content pipeline;
    /// successive results for one message accumulate
    pub enrichment: Option<String>,

    /// Timestamp when the message was sent
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        id: i64,
        room: impl Into<String>,
        author_id: UserId,
        content: impl Into<String>,
        kind: MessageKind,
    ) -> Self {
        Self {
            id,
            room: room.into(),
            author_id,
            content: content.into(),
            kind,
            enrichment: None,
            created_at: Utc::now(),
        }
    }

    /// Append rendered markup, preserving earlier enrichment.
    pub fn append_enrichment(&mut self, markup: &str) {
        match &mut self.enrichment {
            Some(existing) => {
                existing.push_str("\n\n");
                existing.push_str(markup);
            }
            None => self.enrichment = Some(markup.to_string()),
        }
    }

    /// Get the content length in characters.
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }
}
