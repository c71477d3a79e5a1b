use std::time::Duration;

use certgate_domain::ResponseEnvelope;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format (`json` or plain).
pub const LOG_FORMAT_ENV: &str = "CERTGATE_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` overrides the default `info` filter. Calling this twice is a
/// no-op; the first subscriber stays installed.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = if json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.with_target(false).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Log the outcome of one operation call with structured fields.
///
/// # Parameters
/// * `operation` - Operation name as requested by the caller.
/// * `envelope` - The envelope returned to the caller.
/// * `elapsed` - Time spent dispatching and rendering.
///
/// Argument values are never logged; they may carry certificate requests.
#[inline]
pub fn log_operation_execution(operation: &str, envelope: &ResponseEnvelope, elapsed: Duration) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    let classification = envelope.classification().as_str();
    let channel = envelope.channel().map(|c| c.as_str());

    if envelope.is_success() {
        info!(
            operation,
            classification,
            channel,
            status = envelope.status(),
            duration_ms,
            "operation_execution_success"
        );
    } else {
        warn!(
            operation,
            classification,
            channel,
            status = envelope.status(),
            error_kind = envelope.error_kind().map(|k| k.as_str()),
            error = envelope.error_message(),
            duration_ms,
            "operation_execution_failure"
        );
    }
}
