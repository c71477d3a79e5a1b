//! # certgate Core
//!
//! Request-execution layer - no HTTP client or process code.
//!
//! This crate contains:
//! - The operation registry, argument contracts and typed calls
//! - The endpoint mapper and response normalizer
//! - The transport port and the ordered fallback chain
//! - The dispatcher and the diagnostics reports
//!
//! ## Architecture Principles
//! - Only depends on `certgate-domain`
//! - Transports arrive through the `Transport` trait
//! - Mapping and normalization are pure functions

pub mod client;
pub mod diagnostics;
pub mod dispatcher;
pub mod endpoint;
pub mod normalizer;
pub mod operations;
pub mod ports;
pub mod transport;

// Re-export specific items to avoid ambiguity
pub use client::CaClient;
pub use diagnostics::{CredentialReport, Diagnostics};
pub use dispatcher::Dispatcher;
pub use endpoint::map_request;
pub use normalizer::normalize;
pub use operations::{OperationCall, OperationDescriptor, OperationKind};
pub use ports::{CredentialInspector, FsCredentialInspector, Transport};
pub use transport::TransportChain;
