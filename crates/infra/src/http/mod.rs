//! Primary HTTPS transport

pub mod client;

pub use client::{build_client, HttpsTransport};
