//! Response normalizer
//!
//! Turns whatever a transport produced into one `ResponseEnvelope`. Rules are
//! applied in priority order: transport failure, error indicator, success
//! indicator, everything else is a warning.

use certgate_domain::constants::{ERROR_DETAIL_MAX_CHARS, INTERNAL_BODY_FIELDS, TROUBLESHOOT_HINT};
use certgate_domain::{
    EnvelopeBody, EnvelopeError, ErrorKind, GatewayError, RawBody, RawOutcome, ResponseEnvelope,
    TransportError, TransportErrorKind,
};
use serde_json::Value;

const CREDENTIAL_HINT: &str = "Set EJBCA_CLIENT_CERT and EJBCA_CLIENT_KEY to readable PEM files \
     for the client certificate and key.";

/// Normalize one operation's transport result.
pub fn normalize(
    operation: &str,
    result: Result<RawOutcome, TransportError>,
) -> ResponseEnvelope {
    match result {
        Ok(outcome) => normalize_outcome(operation, outcome),
        Err(err) => normalize_transport_error(operation, err),
    }
}

fn normalize_transport_error(operation: &str, err: TransportError) -> ResponseEnvelope {
    let hint = if err.kind == TransportErrorKind::Unavailable {
        CREDENTIAL_HINT
    } else {
        TROUBLESHOOT_HINT
    };
    ResponseEnvelope::from_error(operation, &GatewayError::Transport(err)).with_hint(hint)
}

fn normalize_outcome(operation: &str, outcome: RawOutcome) -> ResponseEnvelope {
    let RawOutcome { status, body, content_type, channel, url, .. } = outcome;
    let error_text = body.as_text();
    let json_error = json_error_message(&body);
    let body_success = json_success_flag(&body);
    let envelope_body = to_envelope_body(content_type, body);

    let status_is_error = status.is_some_and(|code| !(200..300).contains(&code));

    let envelope = if status_is_error || json_error.is_some() {
        let message = match (status_is_error, status, json_error) {
            (true, Some(code), _) => format!("HTTP {code}"),
            (_, _, Some(message)) => message,
            _ => "Backend reported an error".to_string(),
        };
        let mut error = EnvelopeError::new(ErrorKind::Backend, message).with_url(url);
        if let Some(text) = error_text.filter(|t| !t.is_empty()) {
            error = error.with_detail(truncate_chars(&text, ERROR_DETAIL_MAX_CHARS));
        }
        ResponseEnvelope::error(operation, error).with_body(envelope_body)
    } else if status == Some(200) || body_success {
        ResponseEnvelope::success(operation, envelope_body)
    } else {
        let note = match status {
            Some(code) => format!("Backend answered HTTP {code} without a success indicator"),
            None => "Backend answer carried no status code".to_string(),
        };
        ResponseEnvelope::warning(operation, envelope_body, EnvelopeError::note(note))
    };

    envelope.with_status(status).with_channel(channel)
}

fn json_error_message(body: &RawBody) -> Option<String> {
    let RawBody::Json(Value::Object(map)) = body else {
        return None;
    };
    map.get("error").map(|value| match value {
        Value::String(message) => message.clone(),
        Value::Null => "Backend reported an error".to_string(),
        other => other.to_string(),
    })
}

fn json_success_flag(body: &RawBody) -> bool {
    matches!(
        body,
        RawBody::Json(Value::Object(map)) if map.get("success") == Some(&Value::Bool(true))
    )
}

fn to_envelope_body(content_type: Option<String>, body: RawBody) -> EnvelopeBody {
    match body {
        RawBody::Json(mut value) => {
            if let Value::Object(map) = &mut value {
                for field in INTERNAL_BODY_FIELDS {
                    map.remove(*field);
                }
            }
            EnvelopeBody::json(value)
        }
        RawBody::Text(text) => EnvelopeBody::text(text),
        RawBody::Binary(bytes) => EnvelopeBody::binary(content_type, &bytes),
        RawBody::Empty => EnvelopeBody::Empty,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use certgate_domain::{Channel, Classification};
    use serde_json::json;

    use super::*;

    fn outcome(status: u16, body: RawBody) -> RawOutcome {
        RawOutcome {
            status: Some(status),
            body,
            content_type: None,
            channel: Channel::Primary,
            url: "https://ca/ejbca/ejbca-rest-api/v1/ca".to_string(),
            elapsed_ms: 3,
        }
    }

    #[test]
    fn status_200_is_success() {
        let envelope =
            normalize("get_ca_list", Ok(outcome(200, RawBody::Json(json!({"cas": []})))));

        assert_eq!(envelope.classification(), Classification::Success);
        assert!(envelope.error_detail().is_none());
        assert_eq!(envelope.status(), Some(200));
        assert_eq!(envelope.channel(), Some(Channel::Primary));
        assert_eq!(envelope.body().as_json(), Some(&json!({"cas": []})));
    }

    #[test]
    fn internal_fields_are_stripped() {
        let body = json!({"revoked": true, "_method": "PUT", "_status_code": 200, "_url": "x"});
        let envelope = normalize("revoke_certificate", Ok(outcome(200, RawBody::Json(body))));
        assert_eq!(envelope.body().as_json(), Some(&json!({"revoked": true})));
    }

    #[test]
    fn non_2xx_is_backend_error_with_truncated_detail() {
        let long_body = "x".repeat(ERROR_DETAIL_MAX_CHARS + 200);
        let envelope = normalize("get_crl_info", Ok(outcome(404, RawBody::Text(long_body))));

        assert!(envelope.is_error());
        assert_eq!(envelope.error_kind(), Some(ErrorKind::Backend));
        assert_eq!(envelope.error_message(), Some("HTTP 404"));
        let error = envelope.error_detail().unwrap();
        assert_eq!(error.detail.as_ref().map(|d| d.chars().count()), Some(ERROR_DETAIL_MAX_CHARS));
        assert_eq!(error.url.as_deref(), Some("https://ca/ejbca/ejbca-rest-api/v1/ca"));
        assert_eq!(envelope.status(), Some(404));
    }

    #[test]
    fn error_key_wins_over_success_status() {
        let body = json!({"error": "Certificate not found", "success": true});
        let envelope = normalize("get_certificate_status", Ok(outcome(200, RawBody::Json(body))));

        assert!(envelope.is_error());
        assert_eq!(envelope.error_message(), Some("Certificate not found"));
    }

    #[test]
    fn success_flag_lifts_non_200_status() {
        let body = json!({"success": true});
        let envelope = normalize("create_crl", Ok(outcome(201, RawBody::Json(body))));
        assert!(envelope.is_success());
    }

    #[test]
    fn other_2xx_without_indicator_is_warning() {
        let envelope = normalize("create_crl", Ok(outcome(204, RawBody::Empty)));

        assert_eq!(envelope.classification(), Classification::Warning);
        assert_eq!(envelope.error_kind(), None);
        assert!(envelope.error_message().unwrap().contains("HTTP 204"));
    }

    #[test]
    fn undecodable_200_body_stays_text_and_succeeds() {
        let envelope =
            normalize("get_ca_version", Ok(outcome(200, RawBody::Text("{not json".to_string()))));
        assert!(envelope.is_success());
        assert_eq!(envelope.body(), &EnvelopeBody::text("{not json"));
    }

    #[test]
    fn binary_body_keeps_exact_size() {
        let mut raw = outcome(200, RawBody::Binary(vec![0x30; 1200]));
        raw.content_type = Some("application/pkix-crl".to_string());
        let envelope = normalize("get_crl", Ok(raw));

        let EnvelopeBody::Binary { size_bytes, preview_hex, preview_truncated, content_type } =
            envelope.body()
        else {
            panic!("expected binary body");
        };
        assert_eq!(*size_bytes, 1200);
        assert_eq!(preview_hex.len(), 100);
        assert!(*preview_truncated);
        assert_eq!(content_type.as_deref(), Some("application/pkix-crl"));
    }

    #[test]
    fn transport_failure_is_transport_error() {
        let err = TransportError::new(Channel::Fallback, TransportErrorKind::Timeout, "timed out")
            .with_url("https://ca/ejbca/ejbca-rest-api/v1/ca")
            .with_stderr("curl: (28) Operation timed out");
        let envelope = normalize("get_ca_list", Err(err));

        assert!(envelope.is_error());
        assert_eq!(envelope.error_kind(), Some(ErrorKind::Transport));
        assert_eq!(envelope.channel(), Some(Channel::Fallback));
        let error = envelope.error_detail().unwrap();
        assert_eq!(error.detail.as_deref(), Some("curl: (28) Operation timed out"));
        assert_eq!(error.hint.as_deref(), Some(TROUBLESHOOT_HINT));
    }

    #[test]
    fn missing_credentials_is_credential_error() {
        let err = TransportError::new(
            Channel::Fallback,
            TransportErrorKind::Unavailable,
            "no client credentials available for authentication",
        );
        let envelope = normalize("get_ca_list", Err(err));

        assert_eq!(envelope.error_kind(), Some(ErrorKind::Credential));
        let hint = envelope.error_detail().unwrap().hint.as_deref().unwrap();
        assert!(hint.contains("EJBCA_CLIENT_CERT"));
    }
}
