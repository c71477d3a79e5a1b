//! Error types used throughout the gateway

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Channel;

/// Main error type for certgate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Validation failed: {0}")]
    Validation(ValidationError),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Stable classification used in envelopes and log fields.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Self::Transport(err) if err.kind == TransportErrorKind::Unavailable => {
                ErrorKind::Credential
            }
            Self::Transport(_) => ErrorKind::Transport,
            Self::Config(_) => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<ValidationError> for GatewayError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Caller-visible error classification carried by envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing operation argument; never reaches the network
    Validation,
    /// Operation name is not registered
    UnknownOperation,
    /// Neither channel produced an outcome (network, TLS, timeout, process)
    Transport,
    /// Backend answered with a non-2xx status or an error body
    Backend,
    /// Client certificate or key unavailable
    Credential,
    /// Invalid process configuration
    Config,
    /// Invariant violated inside the gateway
    Internal,
}

impl ErrorKind {
    /// Label suitable for metrics and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::UnknownOperation => "unknown_operation",
            Self::Transport => "transport",
            Self::Backend => "backend",
            Self::Credential => "credential",
            Self::Config => "config",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/* -------------------------------------------------------------------------- */
/* Transport errors */
/* -------------------------------------------------------------------------- */

/// Why a transport attempt failed to produce any backend answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// The channel cannot be used (no credentials configured or on disk)
    Unavailable,
    /// Connection refused, DNS failure, reset
    Network,
    /// TLS handshake or identity failure
    Tls,
    /// Attempt exceeded its time bound
    Timeout,
    /// External process failed to spawn or exited non-zero
    Process,
    /// Local I/O failure (temp files, credential files)
    Io,
    /// The request could not be built
    InvalidRequest,
}

/// A failed attempt on one channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{channel} channel failed ({kind:?}): {message}")]
pub struct TransportError {
    pub channel: Channel,
    pub kind: TransportErrorKind,
    pub message: String,
    pub url: Option<String>,
    pub stderr: Option<String>,
}

impl TransportError {
    pub fn new(channel: Channel, kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self { channel, kind, message: message.into(), url: None, stderr: None }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        let stderr = stderr.into();
        if !stderr.trim().is_empty() {
            self.stderr = Some(stderr.trim().to_string());
        }
        self
    }

    pub fn timed_out(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

/* -------------------------------------------------------------------------- */
/* Validation errors */
/* -------------------------------------------------------------------------- */

/// Field-level argument violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every contract violation found in one set of arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError { field: field.into(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> =
            self.errors.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}
