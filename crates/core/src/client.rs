//! CA client: endpoint mapping plus transport execution

use std::sync::Arc;

use certgate_domain::{ClientConfig, RawOutcome, TransportError};
use tracing::{debug, instrument};

use crate::endpoint::map_request;
use crate::operations::OperationCall;
use crate::ports::Transport;
use crate::transport::TransportChain;

/// Executes typed operation calls against the configured backend.
///
/// Built once per process and shared read-only.
#[derive(Clone)]
pub struct CaClient {
    config: ClientConfig,
    chain: TransportChain,
}

impl CaClient {
    pub fn new(config: ClientConfig, chain: TransportChain) -> Self {
        Self { config, chain }
    }

    /// Convenience constructor from an ordered strategy list.
    pub fn with_transports(config: ClientConfig, transports: Vec<Arc<dyn Transport>>) -> Self {
        Self::new(config, TransportChain::new(transports))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn chain(&self) -> &TransportChain {
        &self.chain
    }

    /// Map `call` to a request and run it through the transport chain.
    #[instrument(level = "debug", skip_all, fields(operation = call.kind().name()))]
    pub async fn execute(&self, call: &OperationCall) -> Result<RawOutcome, TransportError> {
        let request = map_request(call);
        debug!(url = %request.url(self.config.base_url()), "mapped request");
        self.chain.execute(&request).await
    }
}
