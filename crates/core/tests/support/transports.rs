//! Scripted transport implementations for testing

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use certgate_core::{CaClient, CredentialInspector, Dispatcher, Transport};
use certgate_domain::{
    Channel, ClientConfig, RawBody, RawOutcome, RequestDescriptor, TransportError,
    TransportErrorKind,
};

/// What a `SpyTransport` does when called.
#[derive(Clone)]
pub enum Script {
    Respond { status: u16, body: RawBody, content_type: Option<String> },
    Fail(TransportErrorKind),
}

/// Records requests and replays a fixed script.
pub struct SpyTransport {
    channel: Channel,
    available: bool,
    script: Script,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl SpyTransport {
    pub fn responding(channel: Channel, status: u16, body: RawBody) -> Arc<Self> {
        Arc::new(Self {
            channel,
            available: true,
            script: Script::Respond { status, body, content_type: None },
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn responding_with_type(
        channel: Channel,
        status: u16,
        body: RawBody,
        content_type: &str,
    ) -> Arc<Self> {
        Arc::new(Self {
            channel,
            available: true,
            script: Script::Respond { status, body, content_type: Some(content_type.to_string()) },
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(channel: Channel, kind: TransportErrorKind) -> Arc<Self> {
        Arc::new(Self {
            channel,
            available: true,
            script: Script::Fail(kind),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn unavailable(channel: Channel) -> Arc<Self> {
        Arc::new(Self {
            channel,
            available: false,
            script: Script::Fail(TransportErrorKind::Unavailable),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<RequestDescriptor> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for SpyTransport {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn execute(
        &self,
        request: &RequestDescriptor,
        _timeout: Duration,
    ) -> Result<RawOutcome, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let url = request.url("https://ca.test");

        match &self.script {
            Script::Respond { status, body, content_type } => Ok(RawOutcome {
                status: Some(*status),
                body: body.clone(),
                content_type: content_type.clone(),
                channel: self.channel,
                url,
                elapsed_ms: 1,
            }),
            Script::Fail(kind) => {
                Err(TransportError::new(self.channel, *kind, "scripted failure").with_url(url))
            }
        }
    }
}

/// Credential inspector answering from a fixed list of existing paths.
pub struct FixedInspector {
    existing: Vec<String>,
}

impl FixedInspector {
    pub fn new(existing: &[&str]) -> Arc<Self> {
        Arc::new(Self { existing: existing.iter().map(ToString::to_string).collect() })
    }
}

impl CredentialInspector for FixedInspector {
    fn file_exists(&self, path: &Path) -> bool {
        self.existing.iter().any(|p| Path::new(p) == path)
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new("https://ca.test", None, None)
}

/// Dispatcher over the given spies, in order.
pub fn dispatcher(transports: &[Arc<SpyTransport>]) -> Dispatcher {
    dispatcher_with_config(config(), transports)
}

pub fn dispatcher_with_config(
    config: ClientConfig,
    transports: &[Arc<SpyTransport>],
) -> Dispatcher {
    let strategies: Vec<Arc<dyn Transport>> =
        transports.iter().map(|t| Arc::clone(t) as Arc<dyn Transport>).collect();
    Dispatcher::new(Arc::new(CaClient::with_transports(config, strategies)))
}
