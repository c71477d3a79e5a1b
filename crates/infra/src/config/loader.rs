//! Configuration loader
//!
//! Loads backend connection settings from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `CERTGATE_CONFIG` names a file, load that file
//! 2. Otherwise read the `EJBCA_*` environment variables
//! 3. Files may be JSON or TOML (detected by extension)
//!
//! ## Environment Variables
//! - `EJBCA_BASE_URL`: Backend base URL (default `https://localhost:443`)
//! - `EJBCA_CLIENT_CERT`: Client certificate PEM path
//! - `EJBCA_CLIENT_KEY`: Client private key PEM path
//! - `CERTGATE_CONFIG`: Optional config file path
//!
//! Empty values are treated as unset.
//!
//! ## File Locations
//! When no explicit path is given, the loader searches (in order):
//! 1. `./certgate.json` or `./certgate.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use certgate_domain::constants::DEFAULT_BASE_URL;
use certgate_domain::{ClientConfig, ClientSettings, GatewayError, Result};
use url::Url;

pub const ENV_BASE_URL: &str = "EJBCA_BASE_URL";
pub const ENV_CLIENT_CERT: &str = "EJBCA_CLIENT_CERT";
pub const ENV_CLIENT_KEY: &str = "EJBCA_CLIENT_KEY";
pub const ENV_CONFIG_PATH: &str = "CERTGATE_CONFIG";

const CONFIG_FILE_NAMES: &[&str] =
    &["certgate.json", "certgate.toml", "config.json", "config.toml"];

/// Load configuration once for the process.
///
/// # Errors
/// Returns `GatewayError::Config` if the named file cannot be read or
/// parsed, or if the base URL is invalid.
pub fn load() -> Result<ClientConfig> {
    match env_opt(ENV_CONFIG_PATH) {
        Some(path) => {
            tracing::debug!(%path, "CERTGATE_CONFIG set, loading from file");
            load_from_file(Some(PathBuf::from(path)))
        }
        None => {
            let config = load_from_env()?;
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `GatewayError::Config` if `EJBCA_BASE_URL` is not a valid URL.
pub fn load_from_env() -> Result<ClientConfig> {
    let settings = ClientSettings {
        base_url: env_opt(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        client_cert: env_opt(ENV_CLIENT_CERT).map(PathBuf::from),
        client_key: env_opt(ENV_CLIENT_KEY).map(PathBuf::from),
    };
    into_client_config(settings)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations.
///
/// # Errors
/// Returns `GatewayError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The base URL is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(GatewayError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            GatewayError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| GatewayError::Config(format!("Failed to read config file: {e}")))?;

    into_client_config(parse_config(&contents, &config_path)?)
}

/// Validate raw settings and derive the runtime config.
///
/// # Errors
/// Returns `GatewayError::Config` if the base URL does not parse or is not
/// an http(s) URL with a host.
pub fn into_client_config(settings: ClientSettings) -> Result<ClientConfig> {
    let url = Url::parse(&settings.base_url).map_err(|e| {
        GatewayError::Config(format!("Invalid base URL '{}': {e}", settings.base_url))
    })?;

    if !matches!(url.scheme(), "https" | "http") || url.host_str().is_none() {
        return Err(GatewayError::Config(format!(
            "Base URL must be an http(s) URL with a host: {}",
            settings.base_url
        )));
    }

    let config = ClientConfig::from_settings(settings);
    if !config.credentials_available() {
        tracing::warn!(
            cert_configured = config.cert_path().is_some(),
            key_configured = config.key_path().is_some(),
            "client credentials unavailable; backend calls will fail until they are configured"
        );
    }
    Ok(config)
}

/// Parse settings from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientSettings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| GatewayError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| GatewayError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(GatewayError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Search the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    find_config_in(&dirs)
}

/// First existing config file across `dirs`, checking names in priority order
/// within each directory before moving to the next.
pub fn find_config_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Optional environment variable; empty or whitespace counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
