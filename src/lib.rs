//! # Chat Coordinator
//!
//! Multi-room, multi-device real-time chat coordination core:
//! - Presence tracking tolerant of flaky networks (multi-device
//!   join/leave, reconnect debouncing)
//! - Fan-out broadcast to dynamic room membership
//! - Concurrent best-effort content resolution (link previews/embeds)
//! - Mention/notification bookkeeping under concurrent sends
//!
//! Storage, transports, and identity are external collaborators reached
//! through the ports in [`domain`]; in-process implementations suitable
//! for a single-process deployment live in [`infrastructure`].
//!
//! ## Module Structure
//!
//! ```text
//! chat_coordinator/
//! +-- config/         Configuration management
//! +-- domain/         Entities, collaborator ports, lexical scanners
//! +-- application/    Coordinator facade, presence tracker, content pipeline
//! +-- infrastructure/ Registry, caches, in-memory repository, providers
//! +-- shared/         Common utilities (errors, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Entities and collaborator ports
pub mod domain;

// Application layer - Coordination services
pub mod application;

// Infrastructure layer - In-process implementations
pub mod infrastructure;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
