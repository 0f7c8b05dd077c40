//! Application Error Types
//!
//! Centralized error taxonomy for coordinator operations.

use thiserror::Error;

/// Application error type.
///
/// Validation, authorization, and not-found errors carry a message that is
/// safe to show to the calling client. Provider and persistence errors are
/// internal faults: provider faults are swallowed inside the content
/// pipeline, persistence faults fail the single operation that hit them.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Content provider error: {0}")]
    Provider(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl ChatError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Whether the error message may be surfaced to the client verbatim.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Authorization(_) | Self::NotFound(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChatError>;
