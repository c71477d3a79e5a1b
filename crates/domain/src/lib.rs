//! # certgate Domain
//!
//! Value types shared by every certgate crate.
//!
//! This crate contains:
//! - Request descriptors, raw outcomes and response envelopes
//! - Operation argument contracts and revocation reasons
//! - The error taxonomy and Result alias
//! - Client configuration and wire constants
//!
//! ## Architecture
//! - No dependencies on other certgate crates
//! - No I/O beyond the one-time credential file check in `ClientConfig`

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
