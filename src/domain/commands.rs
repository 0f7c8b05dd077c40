//! Command dispatcher port.
//!
//! Input beginning with the command prefix (`/`) is offered to the
//! dispatcher before normal message handling; a consumed command is never
//! persisted or broadcast.

use async_trait::async_trait;

use crate::domain::entities::UserId;
use crate::shared::error::ChatError;

/// Command prefix convention.
pub const COMMAND_PREFIX: char = '/';

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// Offer raw input for command handling. Returns `true` when the
    /// input was consumed as a command.
    async fn try_dispatch(&self, user_id: UserId, room: &str, input: &str)
        -> Result<bool, ChatError>;
}

/// Dispatcher that consumes nothing; used when no command surface is wired.
pub struct NullCommandDispatcher;

#[async_trait]
impl CommandDispatcher for NullCommandDispatcher {
    async fn try_dispatch(
        &self,
        _user_id: UserId,
        _room: &str,
        _input: &str,
    ) -> Result<bool, ChatError> {
        Ok(false)
    }
}
