//! Core domain entities.

pub mod connection;
pub mod message;
pub mod notification;
pub mod room;
pub mod user;

pub use connection::{ClientState, Connection, ConnectionId};
pub use message::{Message, MessageKind};
pub use notification::Notification;
pub use room::Room;
pub use user::{User, UserId, UserStatus};
