//! certgate - EJBCA named-operation gateway
//!
//! Serves newline-delimited JSON-RPC on stdin/stdout.

use std::process::ExitCode;
use std::sync::Arc;

use certgate_lib::utils::logging::init_logging;
use certgate_lib::{AppContext, Server};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before logging so RUST_LOG from the file applies
    let dotenv = dotenvy::dotenv();
    init_logging();

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "certgate starting");

    let ctx = match AppContext::new() {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize gateway");
            return ExitCode::FAILURE;
        }
    };

    ctx.check_connection().await;

    let server = Server::new(ctx);
    match server.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await {
        Ok(()) => {
            tracing::info!("certgate stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "server loop failed");
            ExitCode::FAILURE
        }
    }
}
