//! Configuration management

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BASE_URL;

/// Raw settings as read from the environment or a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub client_cert: Option<PathBuf>,
    #[serde(default)]
    pub client_key: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self { base_url: default_base_url(), client_cert: None, client_key: None }
    }
}

/// Backend connection settings, fixed for the lifetime of the process.
///
/// `credentials_available` is derived once at construction: both paths must be
/// configured and both files must exist at that moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    base_url: String,
    cert_path: Option<PathBuf>,
    key_path: Option<PathBuf>,
    credentials_available: bool,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        cert_path: Option<PathBuf>,
        key_path: Option<PathBuf>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let cert_path = cert_path.filter(|p| !p.as_os_str().is_empty());
        let key_path = key_path.filter(|p| !p.as_os_str().is_empty());
        let credentials_available = matches!(
            (&cert_path, &key_path),
            (Some(cert), Some(key)) if cert.is_file() && key.is_file()
        );

        Self { base_url, cert_path, key_path, credentials_available }
    }

    pub fn from_settings(settings: ClientSettings) -> Self {
        Self::new(settings.base_url, settings.client_cert, settings.client_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cert_path(&self) -> Option<&Path> {
        self.cert_path.as_deref()
    }

    pub fn key_path(&self) -> Option<&Path> {
        self.key_path.as_deref()
    }

    pub fn credentials_available(&self) -> bool {
        self.credentials_available
    }

    /// Both credential paths, only when they were present at startup.
    pub fn credential_paths(&self) -> Option<(&Path, &Path)> {
        if !self.credentials_available {
            return None;
        }
        match (self.cert_path(), self.key_path()) {
            (Some(cert), Some(key)) => Some((cert, key)),
            _ => None,
        }
    }
}
