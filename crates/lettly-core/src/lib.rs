//! Shared service plumbing: env-driven configuration, tracing setup and
//! serialization helpers.

pub mod config;
pub mod serde;
pub mod tracing;
