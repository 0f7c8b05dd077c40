//! # Infrastructure Layer
//!
//! In-process implementations of the domain ports: the local client
//! registry, cache services, the in-memory repository, and built-in
//! content providers.

pub mod cache;
pub mod content;
pub mod memory;
pub mod registry;
