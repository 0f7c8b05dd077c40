//! # Application Layer
//!
//! Stateful coordination services built on the domain ports: the
//! coordinator facade, the presence tracker, and the content pipeline.

pub mod services;

pub use services::*;
