//! Conversions from external infrastructure errors into transport errors.

use std::error::Error as StdError;
use std::io;

use certgate_domain::{Channel, TransportError, TransportErrorKind};
use reqwest::Error as HttpError;

/// Conversion that needs to know which channel produced the failure.
pub trait IntoTransportError {
    fn into_transport(self, channel: Channel) -> TransportError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

impl IntoTransportError for HttpError {
    fn into_transport(self, channel: Channel) -> TransportError {
        let detail = error_chain(&self);
        let url = self.url().map(ToString::to_string);

        let (kind, message) = if self.is_timeout() {
            (TransportErrorKind::Timeout, "HTTP request timed out".to_string())
        } else if self.is_builder() {
            (TransportErrorKind::InvalidRequest, format!("invalid HTTP request: {detail}"))
        } else if looks_like_tls(&detail) {
            (TransportErrorKind::Tls, format!("TLS failure: {detail}"))
        } else if self.is_connect() {
            (TransportErrorKind::Network, format!("HTTP connection failure: {detail}"))
        } else {
            (TransportErrorKind::Network, format!("HTTP request failed: {detail}"))
        };

        let err = TransportError::new(channel, kind, message);
        match url {
            Some(url) => err.with_url(url),
            None => err,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → TransportError */
/* -------------------------------------------------------------------------- */

impl IntoTransportError for io::Error {
    fn into_transport(self, channel: Channel) -> TransportError {
        let kind = match self.kind() {
            io::ErrorKind::TimedOut => TransportErrorKind::Timeout,
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                TransportErrorKind::Process
            }
            _ => TransportErrorKind::Io,
        };
        TransportError::new(channel, kind, self.to_string())
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

fn looks_like_tls(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    ["tls", "certificate", "handshake", "x509"].iter().any(|needle| lower.contains(needle))
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn timeout_maps_to_timeout_kind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client
            .get(server.uri())
            .timeout(Duration::from_millis(50))
            .send()
            .await
            .unwrap_err();

        let mapped = error.into_transport(Channel::Primary);
        assert_eq!(mapped.kind, TransportErrorKind::Timeout);
        assert_eq!(mapped.channel, Channel::Primary);
        assert!(mapped.url.is_some());
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network_kind() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://127.0.0.1:{port}/")).send().await.unwrap_err();

        let mapped = error.into_transport(Channel::Primary);
        assert_eq!(mapped.kind, TransportErrorKind::Network);
        assert!(mapped.message.contains("connection"));
    }

    #[test]
    fn missing_program_maps_to_process_kind() {
        let err = io::Error::new(io::ErrorKind::NotFound, "No such file or directory");
        let mapped = err.into_transport(Channel::Fallback);
        assert_eq!(mapped.kind, TransportErrorKind::Process);
        assert_eq!(mapped.channel, Channel::Fallback);
    }

    #[test]
    fn tls_detection_matches_common_messages() {
        assert!(looks_like_tls("invalid peer certificate: UnknownIssuer"));
        assert!(looks_like_tls("received fatal alert: HandshakeFailure"));
        assert!(!looks_like_tls("tcp connect error: Connection refused"));
    }
}
