//! curl subprocess transport with timeout handling.
//!
//! Used when the in-process HTTPS client cannot reach the backend. The body is
//! written to a temp file so binary payloads survive byte-exact; status code
//! and content type come back through curl's `--write-out`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use certgate_core::Transport;
use certgate_domain::constants::{JSON_CONTENT_TYPE, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE};
use certgate_domain::{
    Channel, ClientConfig, RawBody, RawOutcome, RequestDescriptor, TransportError,
    TransportErrorKind,
};
use tempfile::NamedTempFile;
use wait_timeout::ChildExt;

use crate::errors::conversions::IntoTransportError;

const DEFAULT_PROGRAM: &str = "curl";
const WRITE_OUT_FORMAT: &str = "%{http_code}\n%{content_type}";

/// Fallback transport shelling out to `curl`.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    program: PathBuf,
    base_url: String,
    credentials: Option<(PathBuf, PathBuf)>,
}

/// Status line and content type reported by `--write-out`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOut {
    pub status: Option<u16>,
    pub content_type: Option<String>,
}

impl CurlTransport {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            base_url: config.base_url().to_string(),
            credentials: config
                .credential_paths()
                .map(|(cert, key)| (cert.to_path_buf(), key.to_path_buf())),
        }
    }

    /// Run a different executable instead of `curl` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

/// Full argument list for one request.
pub fn curl_args(
    request: &RequestDescriptor,
    url: &str,
    cert: &Path,
    key: &Path,
    output: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-s".into(),
        "-S".into(),
        "-k".into(),
        "--cert".into(),
        cert.into(),
        "--key".into(),
        key.into(),
        "-H".into(),
        format!("{REQUESTED_WITH_HEADER}: {REQUESTED_WITH_VALUE}").into(),
        "-H".into(),
        format!("Accept: {JSON_CONTENT_TYPE}").into(),
        "-H".into(),
        format!("Content-Type: {JSON_CONTENT_TYPE}").into(),
        "-X".into(),
        request.method.as_str().into(),
    ];

    if let Some(body) = &request.body {
        args.push("-d".into());
        args.push(body.to_string().into());
    }

    args.extend([
        "-o".into(),
        output.into(),
        "-w".into(),
        WRITE_OUT_FORMAT.into(),
        url.into(),
    ]);
    args
}

/// Parse `%{http_code}\n%{content_type}`; `000` means no response.
pub fn parse_write_out(stdout: &str) -> WriteOut {
    let mut lines = stdout.splitn(2, '\n');
    let status = lines
        .next()
        .and_then(|code| code.trim().parse::<u16>().ok())
        .filter(|code| *code != 0);
    let content_type = lines.next().map(str::trim).filter(|ct| !ct.is_empty()).map(str::to_string);
    WriteOut { status, content_type }
}

/// Run curl, killing and reaping it if it exceeds `timeout`.
fn run_curl(
    program: &Path,
    args: &[OsString],
    timeout: Duration,
) -> Result<WriteOut, TransportError> {
    let process_error = |message: String| {
        TransportError::new(Channel::Fallback, TransportErrorKind::Process, message)
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            let mut err = e.into_transport(Channel::Fallback);
            err.message = format!("failed to spawn {}: {}", program.display(), err.message);
            err
        })?;

    // Wait for the command with timeout
    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => {
            tracing::trace!(exit_code = status.code(), "curl exited");
            status
        }
        Ok(None) => {
            tracing::warn!(timeout_ms = timeout.as_millis(), "curl timed out, killing process");
            let _ = child.kill();
            let _ = child.wait(); // Reap the zombie
            return Err(TransportError::new(
                Channel::Fallback,
                TransportErrorKind::Timeout,
                format!("curl timed out after {}s", timeout.as_secs_f32()),
            ));
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(process_error(format!("failed to wait for curl: {e}")));
        }
    };

    let output = child
        .wait_with_output()
        .map_err(|e| process_error(format!("failed to collect curl output: {e}")))?;

    if !status.success() {
        let code = status.code().map_or_else(|| "signal".to_string(), |c| c.to_string());
        return Err(process_error(format!("curl exited with code {code}"))
            .with_stderr(String::from_utf8_lossy(&output.stderr)));
    }

    let write_out = parse_write_out(&String::from_utf8_lossy(&output.stdout));
    if write_out.status.is_none() {
        return Err(TransportError::new(
            Channel::Fallback,
            TransportErrorKind::Network,
            "curl completed without an HTTP status",
        )
        .with_stderr(String::from_utf8_lossy(&output.stderr)));
    }
    Ok(write_out)
}

#[async_trait]
impl Transport for CurlTransport {
    fn channel(&self) -> Channel {
        Channel::Fallback
    }

    fn is_available(&self) -> bool {
        self.credentials.is_some()
    }

    async fn execute(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<RawOutcome, TransportError> {
        let url = request.url(&self.base_url);
        let Some((cert, key)) = self.credentials.as_ref() else {
            return Err(TransportError::new(
                Channel::Fallback,
                TransportErrorKind::Unavailable,
                "no client credentials available for authentication",
            )
            .with_url(url));
        };

        let output_file = NamedTempFile::new()
            .map_err(|e| e.into_transport(Channel::Fallback).with_url(url.clone()))?;
        let args = curl_args(request, &url, cert, key, output_file.path());
        let program = self.program.clone();

        tracing::debug!(
            method = %request.method,
            %url,
            program = %program.display(),
            "invoking curl"
        );
        let started = Instant::now();

        let write_out =
            tokio::task::spawn_blocking(move || run_curl(&program, &args, timeout))
                .await
                .map_err(|e| {
                    TransportError::new(
                        Channel::Fallback,
                        TransportErrorKind::Process,
                        format!("curl task failed: {e}"),
                    )
                })?
                .map_err(|e| e.with_url(url.clone()))?;

        let bytes = tokio::fs::read(output_file.path())
            .await
            .map_err(|e| e.into_transport(Channel::Fallback).with_url(url.clone()))?;
        drop(output_file);

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(
            %url,
            status = ?write_out.status,
            bytes = bytes.len(),
            elapsed_ms,
            "curl produced response"
        );

        Ok(RawOutcome {
            status: write_out.status,
            body: RawBody::from_bytes(write_out.content_type.as_deref(), bytes),
            content_type: write_out.content_type,
            channel: Channel::Fallback,
            url,
            elapsed_ms,
        })
    }
}
