//! Raw transport outcomes, before normalization

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{CRL_CONTENT_TYPE_PREFIX, JSON_CONTENT_TYPE};
use crate::impl_wire_enum_conversions;

/// Which transport strategy produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Persistent mutual-TLS HTTP client
    Primary,
    /// External curl process
    Fallback,
}

impl_wire_enum_conversions!(Channel {
    Primary => "primary",
    Fallback => "fallback",
});

/// Response body as received, decoded only as far as its shape allows.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    Json(Value),
    Text(String),
    Binary(Vec<u8>),
    Empty,
}

impl RawBody {
    /// Classify a received body.
    ///
    /// Revocation-list media types stay raw bytes with their exact length.
    /// JSON is attempted for JSON content types and for untyped bodies; a body
    /// that fails to decode falls back to text, and non-UTF-8 bytes stay binary.
    pub fn from_bytes(content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            return Self::Empty;
        }

        let media_type = content_type.map(|ct| ct.trim().to_ascii_lowercase()).unwrap_or_default();

        if media_type.starts_with(CRL_CONTENT_TYPE_PREFIX) {
            return Self::Binary(bytes);
        }

        let wants_json = media_type.is_empty()
            || media_type.starts_with(JSON_CONTENT_TYPE)
            || media_type.contains("+json");
        if wants_json {
            if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
                return Self::Json(value);
            }
        }

        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(err) => Self::Binary(err.into_bytes()),
        }
    }

    /// Body rendered as text, for error details.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Json(value) => Some(value.to_string()),
            Self::Text(text) => Some(text.clone()),
            Self::Binary(_) | Self::Empty => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Json(value) => value.to_string().len(),
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
            Self::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What one channel got back from the backend.
///
/// A non-2xx status is still an outcome: the backend answered.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutcome {
    pub status: Option<u16>,
    pub body: RawBody,
    pub content_type: Option<String>,
    pub channel: Channel,
    pub url: String,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn crl_media_type_is_kept_binary() {
        let bytes = vec![0x30, 0x82, 0x04, 0xb0];
        let body = RawBody::from_bytes(Some("application/pkix-crl"), bytes.clone());
        assert_eq!(body, RawBody::Binary(bytes));
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn json_content_type_is_decoded() {
        let body = RawBody::from_bytes(
            Some("application/json; charset=utf-8"),
            br#"{"status":"OK"}"#.to_vec(),
        );
        assert_eq!(body, RawBody::Json(json!({ "status": "OK" })));
    }

    #[test]
    fn malformed_json_becomes_text() {
        let body = RawBody::from_bytes(Some("application/json"), b"{not json".to_vec());
        assert_eq!(body, RawBody::Text("{not json".into()));
    }

    #[test]
    fn untyped_json_is_still_decoded() {
        let body = RawBody::from_bytes(None, b"[1,2]".to_vec());
        assert_eq!(body, RawBody::Json(json!([1, 2])));
    }

    #[test]
    fn pem_text_stays_text() {
        let pem = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";
        let body = RawBody::from_bytes(Some("application/x-pem-file"), pem.as_bytes().to_vec());
        assert_eq!(body, RawBody::Text(pem.into()));
    }

    #[test]
    fn invalid_utf8_is_binary() {
        let body = RawBody::from_bytes(Some("application/octet-stream"), vec![0xff, 0xfe, 0x00]);
        assert_eq!(body, RawBody::Binary(vec![0xff, 0xfe, 0x00]));
    }

    #[test]
    fn empty_body() {
        assert_eq!(RawBody::from_bytes(Some("application/json"), Vec::new()), RawBody::Empty);
        assert!(RawBody::Empty.is_empty());
    }

    #[test]
    fn channel_wire_names() {
        assert_eq!(Channel::Primary.to_string(), "primary");
        assert_eq!(serde_json::to_value(Channel::Fallback).unwrap(), json!("fallback"));
    }
}
