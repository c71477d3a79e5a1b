//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use certgate_infra::config;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_json_file() {
    let cert = NamedTempFile::new().expect("Failed to create cert file");
    let key = NamedTempFile::new().expect("Failed to create key file");
    let json_content = format!(
        r#"{{
        "base_url": "https://ejbca.example.com:8443/",
        "client_cert": "{}",
        "client_key": "{}"
    }}"#,
        cert.path().display(),
        key.path().display()
    );

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_ok(), "Failed to load config from JSON file: {:?}", result.err());

    let config = result.unwrap();
    assert_eq!(config.base_url(), "https://ejbca.example.com:8443");
    assert_eq!(config.cert_path(), Some(cert.path()));
    assert_eq!(config.key_path(), Some(key.path()));
    assert!(config.credentials_available());

    // Cleanup
    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
base_url = "https://ca.internal"
client_cert = "/nonexistent/client.pem"
client_key = "/nonexistent/client.key"
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let config = config::load_from_file(Some(path.clone())).expect("TOML config should load");
    assert_eq!(config.base_url(), "https://ca.internal");
    assert!(config.cert_path().is_some());
    assert!(!config.credentials_available(), "missing files must not count as credentials");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_invalid_json() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(b"{ not json").expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(err.to_string().contains("Invalid JSON format"));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_rejects_invalid_base_url() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(br#"{"base_url": "ejbca.example.com"}"#).expect("write");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(err.to_string().contains("Invalid base URL"));

    std::fs::remove_file(path).ok();
}
