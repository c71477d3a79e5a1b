//! Application context - dependency injection container

use std::sync::Arc;

use certgate_core::Dispatcher;
use certgate_domain::{ClientConfig, ResponseEnvelope, Result};
use certgate_infra::{ca_client, config};

/// Application context - holds the configuration and the dispatcher
pub struct AppContext {
    pub config: ClientConfig,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppContext {
    /// Load configuration and wire the default transports.
    ///
    /// # Errors
    /// Returns `GatewayError::Config` if configuration cannot be loaded.
    pub fn new() -> Result<Self> {
        let config = config::load()?;
        Ok(Self::new_with_config(config))
    }

    /// Build a context from an already-loaded configuration.
    pub fn new_with_config(config: ClientConfig) -> Self {
        tracing::info!(
            base_url = config.base_url(),
            credentials_available = config.credentials_available(),
            "initializing gateway"
        );

        let client = Arc::new(ca_client(config.clone()));
        let dispatcher = Arc::new(Dispatcher::new(client));
        Self { config, dispatcher }
    }

    /// Use a pre-built dispatcher.
    ///
    /// This is the injection seam for integration tests that swap in stub
    /// transports; the binary always goes through [`AppContext::new`].
    #[doc(hidden)]
    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        let config = dispatcher.client().config().clone();
        Self { config, dispatcher: Arc::new(dispatcher) }
    }

    /// Run the connection test once and log whether the backend answered.
    ///
    /// Never fails: a misconfigured deployment is reported on stderr and the
    /// server still starts.
    pub async fn check_connection(&self) -> ResponseEnvelope {
        let envelope = self.dispatcher.diagnostics().connection_test().await;

        if envelope.is_success() {
            tracing::info!(
                base_url = self.config.base_url(),
                credentials_available = self.config.credentials_available(),
                "startup connection check passed"
            );
        } else {
            tracing::warn!(
                base_url = self.config.base_url(),
                credentials_available = self.config.credentials_available(),
                classification = envelope.classification().as_str(),
                reason = envelope.error_message(),
                "startup connection check failed; serving anyway"
            );
        }

        envelope
    }
}
