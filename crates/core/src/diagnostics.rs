//! Connection diagnostics
//!
//! Composite operations built only from other operations plus static
//! credential checks. They never fail hard: a failing sub-operation turns the
//! report into a warning.

use std::path::Path;
use std::sync::Arc;

use certgate_domain::{ClientConfig, EnvelopeBody, EnvelopeError, ResponseEnvelope};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::CaClient;
use crate::normalizer::normalize;
use crate::operations::{OperationCall, OperationKind};
use crate::ports::{CredentialInspector, FsCredentialInspector};

/// Static view of the configured credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialReport {
    pub base_url: String,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
    pub cert_exists: bool,
    pub key_exists: bool,
    pub credentials_available: bool,
}

impl CredentialReport {
    pub fn inspect(config: &ClientConfig, inspector: &dyn CredentialInspector) -> Self {
        let exists = |path: Option<&Path>| path.is_some_and(|p| inspector.file_exists(p));
        let cert_exists = exists(config.cert_path());
        let key_exists = exists(config.key_path());
        Self {
            base_url: config.base_url().to_string(),
            cert_path: config.cert_path().map(|p| p.display().to_string()),
            key_path: config.key_path().map(|p| p.display().to_string()),
            cert_exists,
            key_exists,
            credentials_available: cert_exists && key_exists,
        }
    }
}

/// Builds the connection-test and troubleshoot reports.
#[derive(Clone)]
pub struct Diagnostics {
    client: Arc<CaClient>,
    inspector: Arc<dyn CredentialInspector>,
}

impl Diagnostics {
    pub fn new(client: Arc<CaClient>) -> Self {
        Self { client, inspector: Arc::new(FsCredentialInspector) }
    }

    pub fn with_inspector(mut self, inspector: Arc<dyn CredentialInspector>) -> Self {
        self.inspector = inspector;
        self
    }

    /// Certificate API status and CA version, plus credential availability.
    pub async fn connection_test(&self) -> ResponseEnvelope {
        let operation = OperationKind::TestConnection.name();
        let api_status = self.run(&OperationCall::CertificateApiStatus).await;
        let ca_version = self.run(&OperationCall::CaVersion).await;

        let config = self.client.config();
        let body = json!({
            "connection_test": "completed",
            "certificate_api_status": to_json(&api_status),
            "ca_version": to_json(&ca_version),
            "credentials_available": config.credentials_available(),
            "base_url": config.base_url(),
        });

        classify(operation, body, &[&api_status, &ca_version])
    }

    /// Credential checks, three API checks and derived recommendations.
    pub async fn troubleshoot(&self) -> ResponseEnvelope {
        let operation = OperationKind::Troubleshoot.name();
        let report = CredentialReport::inspect(self.client.config(), self.inspector.as_ref());

        let api_status = self.run(&OperationCall::CertificateApiStatus).await;
        let ca_version = self.run(&OperationCall::CaVersion).await;
        let ca_list = self.run(&OperationCall::ListCas).await;

        let recommendations = recommendations(&report, &api_status, &ca_version);
        debug!(count = recommendations.len(), "troubleshoot recommendations derived");

        let body = json!({
            "diagnostics": report,
            "api_tests": {
                "certificate_status": to_json(&api_status),
                "ca_version": to_json(&ca_version),
                "ca_list": to_json(&ca_list),
            },
            "recommendations": recommendations,
        });

        classify(operation, body, &[&api_status, &ca_version, &ca_list])
    }

    async fn run(&self, call: &OperationCall) -> ResponseEnvelope {
        normalize(call.kind().name(), self.client.execute(call).await)
    }
}

const CONFIGURE_CREDENTIALS: &str = "Configure client certificates using EJBCA_CLIENT_CERT and \
     EJBCA_CLIENT_KEY environment variables";

/// Independent remediation rules over the credential report and API checks.
pub fn recommendations(
    report: &CredentialReport,
    api_status: &ResponseEnvelope,
    ca_version: &ResponseEnvelope,
) -> Vec<String> {
    let mut out = Vec::new();

    if !report.credentials_available {
        out.push(CONFIGURE_CREDENTIALS.to_string());
    }
    if let Some(path) = report.cert_path.as_deref().filter(|_| !report.cert_exists) {
        out.push(format!("Certificate file not found: {path}"));
    }
    if let Some(path) = report.key_path.as_deref().filter(|_| !report.key_exists) {
        out.push(format!("Private key file not found: {path}"));
    }
    if api_status.is_error() {
        out.push(
            "Certificate API not accessible - check EJBCA_BASE_URL and certificate authentication"
                .to_string(),
        );
    }
    if ca_version.is_error() {
        out.push("CA API not accessible - verify EJBCA REST API is enabled".to_string());
    }

    out
}

fn classify(operation: &str, body: Value, parts: &[&ResponseEnvelope]) -> ResponseEnvelope {
    let failed: Vec<&str> =
        parts.iter().filter(|e| !e.is_success()).map(|e| e.operation()).collect();

    if failed.is_empty() {
        ResponseEnvelope::success(operation, EnvelopeBody::json(body))
    } else {
        let note = EnvelopeError::note(format!(
            "Sub-operations did not succeed: {}",
            failed.join(", ")
        ));
        ResponseEnvelope::warning(operation, EnvelopeBody::json(body), note)
    }
}

fn to_json(envelope: &ResponseEnvelope) -> Value {
    serde_json::to_value(envelope).unwrap_or_default()
}
