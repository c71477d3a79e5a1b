//! Caller-facing response envelope
//!
//! Every dispatched call, success or failure, ends as one `ResponseEnvelope`.
//! Fields are private so the classification/error pairing can only be built
//! through the constructors: a `SUCCESS` envelope never carries an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::BINARY_PREVIEW_BYTES;
use crate::errors::{ErrorKind, GatewayError};
use crate::types::Channel;

/// Outcome classification shown to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Success,
    Error,
    Warning,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
        }
    }
}

/// Normalized body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvelopeBody {
    Json {
        value: Value,
    },
    Text {
        text: String,
    },
    /// Binary payload summary; `size_bytes` is always the full length.
    Binary {
        content_type: Option<String>,
        size_bytes: usize,
        preview_hex: String,
        preview_truncated: bool,
    },
    Empty,
}

impl EnvelopeBody {
    pub fn json(value: Value) -> Self {
        Self::Json { value }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Summarize binary bytes with a bounded preview.
    pub fn binary(content_type: Option<String>, bytes: &[u8]) -> Self {
        let preview_len = bytes.len().min(BINARY_PREVIEW_BYTES);
        Self::Binary {
            content_type,
            size_bytes: bytes.len(),
            preview_hex: hex::encode(&bytes[..preview_len]),
            preview_truncated: bytes.len() > BINARY_PREVIEW_BYTES,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json { value } => Some(value),
            _ => None,
        }
    }
}

/// Failure details, present only on `ERROR` and `WARNING` envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub kind: Option<ErrorKind>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl EnvelopeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind: Some(kind), message: message.into(), detail: None, hint: None, url: None }
    }

    /// A warning explanation with no error kind attached.
    pub fn note(message: impl Into<String>) -> Self {
        Self { kind: None, message: message.into(), detail: None, hint: None, url: None }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// The uniform response to a dispatched operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    operation: String,
    classification: Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<Channel>,
    body: EnvelopeBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<EnvelopeError>,
}

impl ResponseEnvelope {
    pub fn success(operation: impl Into<String>, body: EnvelopeBody) -> Self {
        Self {
            operation: operation.into(),
            classification: Classification::Success,
            status: None,
            channel: None,
            body,
            error: None,
        }
    }

    pub fn warning(operation: impl Into<String>, body: EnvelopeBody, note: EnvelopeError) -> Self {
        Self {
            operation: operation.into(),
            classification: Classification::Warning,
            status: None,
            channel: None,
            body,
            error: Some(note),
        }
    }

    pub fn error(operation: impl Into<String>, error: EnvelopeError) -> Self {
        Self {
            operation: operation.into(),
            classification: Classification::Error,
            status: None,
            channel: None,
            body: EnvelopeBody::Empty,
            error: Some(error),
        }
    }

    /// Error envelope for a failure raised inside the gateway.
    pub fn from_error(operation: impl Into<String>, err: &GatewayError) -> Self {
        let mut detail = EnvelopeError::new(err.kind(), err.to_string());
        if let GatewayError::Transport(transport) = err {
            detail.url.clone_from(&transport.url);
            detail.detail.clone_from(&transport.stderr);
        }
        let mut envelope = Self::error(operation, detail);
        if let GatewayError::Transport(transport) = err {
            envelope.channel = Some(transport.channel);
        }
        envelope
    }

    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.status = status;
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Replace the body; error envelopes may carry the backend's error body.
    pub fn with_body(mut self, body: EnvelopeBody) -> Self {
        self.body = body;
        self
    }

    /// Attach a remediation hint to an error or warning.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.hint = Some(hint.into());
        }
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn is_success(&self) -> bool {
        self.classification == Classification::Success
    }

    pub fn is_error(&self) -> bool {
        self.classification == Classification::Error
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn channel(&self) -> Option<Channel> {
        self.channel
    }

    pub fn body(&self) -> &EnvelopeBody {
        &self.body
    }

    pub fn error_detail(&self) -> Option<&EnvelopeError> {
        self.error.as_ref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().and_then(|e| e.kind)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}
