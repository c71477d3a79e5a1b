//! # certgate App
//!
//! Invocation surface - JSON-RPC over stdio and process entry point.
//!
//! This crate contains:
//! - The JSON-RPC 2.0 message types and line-oriented server
//! - Application context (config loaded once, dispatcher built once)
//! - Logging setup and the human-readable envelope rendering
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the transports into the dispatcher
//! - Keeps stdout for protocol frames; logs go to stderr

pub mod context;
pub mod protocol;
pub mod utils;

// Re-export for convenience
pub use context::*;
pub use protocol::{Server, ServerError};
