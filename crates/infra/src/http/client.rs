use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use certgate_core::Transport;
use certgate_domain::constants::{JSON_CONTENT_TYPE, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE};
use certgate_domain::{
    Channel, ClientConfig, HttpMethod, RawBody, RawOutcome, RequestDescriptor, TransportError,
    TransportErrorKind,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Identity, Method};
use tracing::{debug, warn};

use crate::errors::conversions::IntoTransportError;

/// Primary transport: HTTPS with mutual-TLS client authentication.
///
/// The reqwest client is built once from the certificate and key files and
/// reused for every request. Server certificates are not verified.
#[derive(Clone)]
pub struct HttpsTransport {
    client: Option<ReqwestClient>,
    base_url: String,
}

impl HttpsTransport {
    /// Build from config; the transport stays unavailable when credentials are
    /// missing or the identity cannot be loaded.
    pub fn from_config(config: &ClientConfig) -> Self {
        let client = config.credential_paths().and_then(|(cert, key)| {
            match build_client(cert, key) {
                Ok(client) => Some(client),
                Err(err) => {
                    warn!(
                        error = %err.message,
                        "client identity rejected, primary channel disabled"
                    );
                    None
                }
            }
        });

        Self { client, base_url: config.base_url().to_string() }
    }

    /// Use an already-built client (tests, custom TLS setups).
    pub fn with_client(client: ReqwestClient, base_url: impl Into<String>) -> Self {
        Self { client: Some(client), base_url: base_url.into().trim_end_matches('/').to_string() }
    }
}

/// Build a reqwest client presenting the PEM identity at `cert` + `key`.
///
/// # Errors
/// Returns a `Tls` transport error if the files cannot be read or do not
/// form a valid identity.
pub fn build_client(cert: &Path, key: &Path) -> Result<ReqwestClient, TransportError> {
    let read = |path: &Path| {
        std::fs::read(path).map_err(|e| {
            TransportError::new(
                Channel::Primary,
                TransportErrorKind::Tls,
                format!("failed to read {}: {e}", path.display()),
            )
        })
    };
    let mut pem = read(cert)?;
    pem.push(b'\n');
    pem.extend(read(key)?);

    let identity = Identity::from_pem(&pem).map_err(|e| {
        TransportError::new(
            Channel::Primary,
            TransportErrorKind::Tls,
            format!("invalid client certificate or key: {e}"),
        )
    })?;

    ReqwestClient::builder()
        .use_rustls_tls()
        .identity(identity)
        .danger_accept_invalid_certs(true)
        .no_proxy()
        .build()
        .map_err(|e| e.into_transport(Channel::Primary))
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
    }
}

#[async_trait]
impl Transport for HttpsTransport {
    fn channel(&self) -> Channel {
        Channel::Primary
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    async fn execute(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<RawOutcome, TransportError> {
        let url = request.url(&self.base_url);
        let Some(client) = self.client.as_ref() else {
            return Err(TransportError::new(
                Channel::Primary,
                TransportErrorKind::Unavailable,
                "no client credentials available for authentication",
            )
            .with_url(url));
        };

        let mut builder = client
            .request(to_method(request.method), &url)
            .timeout(timeout)
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        debug!(method = %request.method, %url, "sending HTTPS request");

        let response = builder
            .send()
            .await
            .map_err(|e| e.into_transport(Channel::Primary).with_url(url.clone()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| e.into_transport(Channel::Primary).with_url(url.clone()))?;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(%url, status, bytes = bytes.len(), elapsed_ms, "received HTTPS response");

        Ok(RawOutcome {
            status: Some(status),
            body: RawBody::from_bytes(content_type.as_deref(), bytes.to_vec()),
            content_type,
            channel: Channel::Primary,
            url,
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn unavailable_without_credentials() {
        let transport = HttpsTransport::from_config(&ClientConfig::new("https://ca", None, None));
        assert!(!transport.is_available());
        assert_eq!(transport.channel(), Channel::Primary);
    }

    #[test]
    fn unreadable_identity_is_a_tls_error() {
        let garbage = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(garbage.path(), b"not a pem").unwrap();

        let err = build_client(garbage.path(), garbage.path()).unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Tls);
    }

    #[test]
    fn invalid_identity_disables_primary_channel() {
        let cert = tempfile::NamedTempFile::new().unwrap();
        let key = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(cert.path(), b"garbage").unwrap();
        std::fs::write(key.path(), b"garbage").unwrap();

        let config = ClientConfig::new(
            "https://ca",
            Some(PathBuf::from(cert.path())),
            Some(PathBuf::from(key.path())),
        );
        assert!(config.credentials_available());
        assert!(!HttpsTransport::from_config(&config).is_available());
    }

    #[tokio::test]
    async fn unavailable_transport_refuses_requests() {
        let transport = HttpsTransport::from_config(&ClientConfig::new("https://ca", None, None));
        let err = transport
            .execute(&RequestDescriptor::get("ca"), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Unavailable);
        assert_eq!(err.url.as_deref(), Some("https://ca/ejbca/ejbca-rest-api/v1/ca"));
    }
}
