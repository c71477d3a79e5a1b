//! Transport wiring
//!
//! Builds the ordered strategy list (HTTPS first, curl second) from the
//! process configuration.

use std::sync::Arc;

use certgate_core::{CaClient, Transport, TransportChain};
use certgate_domain::ClientConfig;

use crate::http::HttpsTransport;
use crate::process::CurlTransport;

/// Primary then fallback, in the order the chain tries them.
pub fn default_transports(config: &ClientConfig) -> Vec<Arc<dyn Transport>> {
    vec![
        Arc::new(HttpsTransport::from_config(config)),
        Arc::new(CurlTransport::from_config(config)),
    ]
}

pub fn transport_chain(config: &ClientConfig) -> TransportChain {
    let chain = TransportChain::new(default_transports(config));
    tracing::debug!(channels = ?chain.available_channels(), "transport chain ready");
    chain
}

/// CA client over the default transports.
pub fn ca_client(config: ClientConfig) -> CaClient {
    let chain = transport_chain(&config);
    CaClient::new(config, chain)
}
