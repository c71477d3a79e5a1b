//! # certgate Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The mutual-TLS HTTPS transport (reqwest)
//! - The curl subprocess fallback transport
//! - Configuration loading from environment and files
//! - Conversions from reqwest and I/O errors into transport errors
//!
//! ## Architecture
//! - Implements traits defined in `certgate-core`
//! - Contains all "impure" code (network, processes, filesystem)

pub mod config;
pub mod errors {
    pub mod conversions;

    pub use conversions::IntoTransportError;
}
pub mod http;
pub mod process;
pub mod transports;

// Re-export commonly used items
pub use http::HttpsTransport;
pub use process::CurlTransport;
pub use transports::{ca_client, default_transports, transport_chain};
