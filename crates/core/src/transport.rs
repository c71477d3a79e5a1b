//! Ordered transport strategies with fallback
//!
//! The chain tries each available strategy in turn. A strategy that returns
//! an outcome (any HTTP status) ends the chain; a strategy that fails to reach
//! the backend hands over to the next one. There are no retries within a
//! strategy and no backoff between them.

use std::sync::Arc;
use std::time::Duration;

use certgate_domain::constants::REQUEST_TIMEOUT_SECS;
use certgate_domain::{Channel, RawOutcome, RequestDescriptor, TransportError, TransportErrorKind};
use tracing::{debug, warn};

use crate::ports::Transport;

/// Transports tried in sequence until one yields a definitive outcome.
#[derive(Clone)]
pub struct TransportChain {
    strategies: Vec<Arc<dyn Transport>>,
    timeout: Duration,
}

impl TransportChain {
    /// Create a chain; strategies are tried in the given order.
    pub fn new(strategies: Vec<Arc<dyn Transport>>) -> Self {
        Self { strategies, timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS) }
    }

    /// Override the per-attempt time bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Channels of the strategies that can currently be attempted.
    pub fn available_channels(&self) -> Vec<Channel> {
        self.strategies.iter().filter(|s| s.is_available()).map(|s| s.channel()).collect()
    }

    /// Execute `request` on the first strategy that produces an outcome.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<RawOutcome, TransportError> {
        let mut last_error: Option<TransportError> = None;

        for strategy in &self.strategies {
            let channel = strategy.channel();
            if !strategy.is_available() {
                debug!(%channel, path = %request.path, "transport unavailable, skipping");
                continue;
            }

            debug!(
                %channel,
                method = %request.method,
                path = %request.path,
                "attempting transport"
            );

            match strategy.execute(request, self.timeout).await {
                Ok(outcome) => {
                    debug!(
                        %channel,
                        status = ?outcome.status,
                        elapsed_ms = outcome.elapsed_ms,
                        "transport produced outcome"
                    );
                    return Ok(outcome);
                }
                Err(err) => {
                    warn!(
                        %channel,
                        kind = ?err.kind,
                        error = %err.message,
                        "transport attempt failed"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            TransportError::new(
                Channel::Fallback,
                TransportErrorKind::Unavailable,
                "no client credentials available for authentication",
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use certgate_domain::RawBody;

    use super::*;

    struct Scripted {
        channel: Channel,
        available: bool,
        fail_with: Option<TransportErrorKind>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(channel: Channel) -> Arc<Self> {
            Arc::new(Self { channel, available: true, fail_with: None, calls: AtomicUsize::new(0) })
        }

        fn failing(channel: Channel, kind: TransportErrorKind) -> Arc<Self> {
            Arc::new(Self {
                channel,
                available: true,
                fail_with: Some(kind),
                calls: AtomicUsize::new(0),
            })
        }

        fn unavailable(channel: Channel) -> Arc<Self> {
            Arc::new(Self {
                channel,
                available: false,
                fail_with: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for Scripted {
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
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with {
                Some(kind) => Err(TransportError::new(self.channel, kind, "scripted failure")),
                None => Ok(RawOutcome {
                    status: Some(404),
                    body: RawBody::Empty,
                    content_type: None,
                    channel: self.channel,
                    url: request.path.clone(),
                    elapsed_ms: 1,
                }),
            }
        }
    }

    fn chain(strategies: &[Arc<Scripted>]) -> TransportChain {
        TransportChain::new(strategies.iter().map(|s| s.clone() as Arc<dyn Transport>).collect())
    }

    #[tokio::test]
    async fn non_2xx_answer_does_not_trigger_fallback() {
        let primary = Scripted::ok(Channel::Primary);
        let fallback = Scripted::ok(Channel::Fallback);

        let request = RequestDescriptor::get("ca");
        let outcome = chain(&[primary.clone(), fallback.clone()]).execute(&request).await;

        assert_eq!(outcome.unwrap().status, Some(404));
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn primary_failure_falls_back_exactly_once() {
        let primary = Scripted::failing(Channel::Primary, TransportErrorKind::Tls);
        let fallback = Scripted::ok(Channel::Fallback);

        let outcome = chain(&[primary.clone(), fallback.clone()])
            .execute(&RequestDescriptor::get("ca"))
            .await
            .unwrap();

        assert_eq!(outcome.channel, Channel::Fallback);
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn both_failing_returns_last_error() {
        let primary = Scripted::failing(Channel::Primary, TransportErrorKind::Network);
        let fallback = Scripted::failing(Channel::Fallback, TransportErrorKind::Timeout);

        let err =
            chain(&[primary, fallback]).execute(&RequestDescriptor::get("ca")).await.unwrap_err();

        assert_eq!(err.channel, Channel::Fallback);
        assert!(err.timed_out());
    }

    #[tokio::test]
    async fn unavailable_strategies_are_skipped() {
        let primary = Scripted::unavailable(Channel::Primary);
        let fallback = Scripted::unavailable(Channel::Fallback);
        let chain = chain(&[primary.clone(), fallback.clone()]);

        assert!(chain.available_channels().is_empty());
        let err = chain.execute(&RequestDescriptor::get("ca")).await.unwrap_err();

        assert_eq!(err.kind, TransportErrorKind::Unavailable);
        assert_eq!(primary.calls() + fallback.calls(), 0);
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        let chain = TransportChain::new(Vec::new());
        assert_eq!(chain.timeout(), Duration::from_secs(30));
        assert_eq!(
            chain.with_timeout(Duration::from_millis(5)).timeout(),
            Duration::from_millis(5)
        );
    }
}
