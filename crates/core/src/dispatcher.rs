//! Operation dispatcher
//!
//! The single boundary between callers and the gateway: every call, including
//! unknown names and bad arguments, comes back as a `ResponseEnvelope`.

use std::sync::Arc;
use std::time::Instant;

use certgate_domain::constants::TROUBLESHOOT_HINT;
use certgate_domain::{GatewayError, ResponseEnvelope};
use serde_json::Value;
use tracing::debug;

use crate::client::CaClient;
use crate::diagnostics::Diagnostics;
use crate::normalizer::normalize;
use crate::operations::{descriptors, validate, OperationCall, OperationDescriptor, OperationKind};
use crate::ports::CredentialInspector;

/// Routes named operations to the CA client.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<CaClient>,
    diagnostics: Diagnostics,
}

impl Dispatcher {
    pub fn new(client: Arc<CaClient>) -> Self {
        let diagnostics = Diagnostics::new(Arc::clone(&client));
        Self { client, diagnostics }
    }

    /// Replace the credential-file checks used by `troubleshoot_connection`.
    pub fn with_inspector(mut self, inspector: Arc<dyn CredentialInspector>) -> Self {
        self.diagnostics = self.diagnostics.with_inspector(inspector);
        self
    }

    pub fn client(&self) -> &CaClient {
        &self.client
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Registry listing, in stable order.
    pub fn operations(&self) -> Vec<OperationDescriptor> {
        descriptors()
    }

    /// Validate, execute and normalize one named operation.
    pub async fn dispatch(&self, name: &str, args: &Value) -> ResponseEnvelope {
        let started = Instant::now();

        let envelope = match self.try_dispatch(name, args).await {
            Ok(envelope) => envelope,
            Err(err) => {
                let envelope = ResponseEnvelope::from_error(name, &err);
                match err {
                    GatewayError::Validation(_) | GatewayError::UnknownOperation(_) => envelope,
                    _ => envelope.with_hint(TROUBLESHOOT_HINT),
                }
            }
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(
            operation = name,
            classification = envelope.classification().as_str(),
            error_kind = envelope.error_kind().map(|k| k.as_str()),
            elapsed_ms,
            "dispatch finished"
        );

        envelope
    }

    async fn try_dispatch(
        &self,
        name: &str,
        args: &Value,
    ) -> Result<ResponseEnvelope, GatewayError> {
        let kind = OperationKind::from_name(name)
            .ok_or_else(|| GatewayError::UnknownOperation(name.to_string()))?;
        let validated = validate(kind.descriptor().params, args)?;

        debug!(operation = name, "arguments validated");

        match kind {
            OperationKind::TestConnection => Ok(self.diagnostics.connection_test().await),
            OperationKind::Troubleshoot => Ok(self.diagnostics.troubleshoot().await),
            _ => {
                let call = OperationCall::build(kind, &validated)?;
                let result = self.client.execute(&call).await;
                Ok(normalize(name, result))
            }
        }
    }
}
