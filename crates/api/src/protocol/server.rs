//! Line-oriented JSON-RPC server
//!
//! One request per line in, one response per line out. Notifications
//! (requests without an `id`) are handled but never answered. Only protocol
//! frames are written to the output; diagnostics go through `tracing`.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use super::messages::{
    error_codes, Id, Request, Response, RpcError, ToolCallParams, JSONRPC_VERSION,
};
use crate::context::AppContext;
use crate::utils::format::render_text;
use crate::utils::logging::log_operation_execution;

pub const SERVER_NAME: &str = "certgate";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Failures that end the serve loop.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Serves the operation registry to one peer.
#[derive(Clone)]
pub struct Server {
    context: Arc<AppContext>,
}

impl Server {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    /// Read requests until EOF, answering each on `writer`.
    ///
    /// # Errors
    /// Returns `ServerError` when reading input or writing a frame fails.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut frame = serde_json::to_vec(&response)?;
                frame.push(b'\n');
                writer.write_all(&frame).await?;
                writer.flush().await?;
            }
        }
        debug!("input closed, stopping server");
        Ok(())
    }

    /// Handle one raw line; `None` when no response is due.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparseable request line");
                return Some(Response::error(Id::Null, RpcError::parse_error(e.to_string())));
            }
        };

        let request: Request = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = value
                    .get("id")
                    .and_then(|id| serde_json::from_value(id.clone()).ok())
                    .unwrap_or_default();
                return Some(Response::error(id, RpcError::invalid_request(e.to_string())));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            let id = request.id.unwrap_or_default();
            let message = format!("unsupported jsonrpc version {}", request.jsonrpc);
            return Some(Response::error(id, RpcError::invalid_request(message)));
        }

        let outcome = self.handle_request(&request).await;
        if request.is_notification() {
            debug!(method = %request.method, "notification handled");
            return None;
        }

        let id = request.id.unwrap_or_default();
        Some(match outcome {
            Ok(result) => Response::result(id, result),
            Err(error) => Response::error(id, error),
        })
    }

    /// Route one request to its method.
    ///
    /// # Errors
    /// Returns `RpcError` for unknown methods and malformed parameters.
    pub async fn handle_request(&self, request: &Request) -> Result<Value, RpcError> {
        debug!(method = %request.method, "handling request");
        match request.method.as_str() {
            "initialize" => Ok(Self::initialize()),
            "ping" => Ok(json!({})),
            "notifications/initialized" => Ok(Value::Null),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(request.params.clone()).await,
            other => Err(RpcError::method_not_found(other)),
        }
    }

    fn initialize() -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": { "tools": {} },
        })
    }

    fn list_tools(&self) -> Value {
        let tools: Vec<Value> = self
            .context
            .dispatcher
            .operations()
            .iter()
            .map(|descriptor| {
                json!({
                    "name": descriptor.name(),
                    "description": descriptor.description,
                    "inputSchema": descriptor.input_schema(),
                })
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let params: ToolCallParams = params
            .ok_or_else(|| RpcError::invalid_params("tools/call requires params"))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| RpcError::invalid_params(e.to_string()))
            })?;

        let started = Instant::now();
        let envelope = self.context.dispatcher.dispatch(&params.name, &params.arguments).await;
        let text = render_text(&envelope);
        log_operation_execution(&params.name, &envelope, started.elapsed());

        let is_error = envelope.is_error();
        let envelope = serde_json::to_value(&envelope).map_err(|e| {
            RpcError::new(error_codes::INTERNAL_ERROR, format!("Failed to encode envelope: {e}"))
        })?;

        Ok(json!({
            "envelope": envelope,
            "content": [{ "type": "text", "text": text }],
            "isError": is_error,
        }))
    }
}
