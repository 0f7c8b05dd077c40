//! Registry implementations.

pub mod local;

pub use local::{new_connection_id, LocalClientRegistry};
