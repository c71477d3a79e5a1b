#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use certgate_core::{CaClient, Dispatcher, Transport};
use certgate_domain::{
    Channel, ClientConfig, RawBody, RawOutcome, RequestDescriptor, TransportError,
};
use certgate_lib::{AppContext, Server};

/// Answers every request with the same status and body.
pub struct StubTransport {
    status: u16,
    body: RawBody,
    calls: AtomicUsize,
}

impl StubTransport {
    pub fn new(status: u16, body: RawBody) -> Arc<Self> {
        Arc::new(Self { status, body, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn channel(&self) -> Channel {
        Channel::Primary
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn execute(
        &self,
        request: &RequestDescriptor,
        _timeout: Duration,
    ) -> Result<RawOutcome, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RawOutcome {
            status: Some(self.status),
            body: self.body.clone(),
            content_type: None,
            channel: Channel::Primary,
            url: request.url("https://ca.test"),
            elapsed_ms: 1,
        })
    }
}

/// A context whose only backend is `transport`.
pub fn context_with(transport: Arc<StubTransport>) -> AppContext {
    let config = ClientConfig::new("https://ca.test", None, None);
    let transports: Vec<Arc<dyn Transport>> = vec![transport];
    let dispatcher = Dispatcher::new(Arc::new(CaClient::with_transports(config, transports)));
    AppContext::with_dispatcher(dispatcher)
}

/// A server whose backend is `transport`.
pub fn server_with(transport: Arc<StubTransport>) -> Server {
    Server::new(Arc::new(context_with(transport)))
}

/// Feed newline-joined `lines` through the serve loop and collect replies.
pub async fn exchange(server: &Server, lines: &[&str]) -> Vec<serde_json::Value> {
    let input = lines.join("\n");
    let mut output: Vec<u8> = Vec::new();
    server.run(input.as_bytes(), &mut output).await.expect("serve loop");

    String::from_utf8(output)
        .expect("utf-8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each output line is JSON"))
        .collect()
}
