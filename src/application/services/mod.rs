//! Application services.

pub mod content;
pub mod coordinator;
pub mod presence;

pub use content::{ContentPipeline, ContentProvider, ProviderContent};
pub use coordinator::{ChatCoordinator, ConnectRequest, RoomInfo, RoomSummary, SendRequest};
pub use presence::{ConnectTransition, PresenceTracker};
