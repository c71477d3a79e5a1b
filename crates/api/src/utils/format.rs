//! Human-readable rendering of envelopes for text content blocks.

use std::fmt::Write;

use certgate_domain::{Classification, EnvelopeBody, ResponseEnvelope};
use serde_json::{json, Value};

fn icon(classification: Classification) -> &'static str {
    match classification {
        Classification::Success => "✅",
        Classification::Warning => "⚠️",
        Classification::Error => "❌",
    }
}

/// Markdown rendering: headline, channel and status line, body, then any
/// error or warning details.
pub fn render_text(envelope: &ResponseEnvelope) -> String {
    let classification = envelope.classification();
    let mut out = format!(
        "{} **{}**: EJBCA {}\n\n",
        icon(classification),
        classification.as_str(),
        envelope.operation()
    );

    let channel = envelope.channel().map_or("N/A", |c| c.as_str());
    let status = envelope.status().map_or_else(|| "N/A".to_string(), |s| s.to_string());
    let _ = write!(out, "**Channel**: {channel} | **Status**: {status}");

    match envelope.body() {
        EnvelopeBody::Json { value } => push_json(&mut out, value),
        EnvelopeBody::Text { text } => {
            let _ = write!(out, "\n\n```text\n{text}\n```");
        }
        EnvelopeBody::Binary { content_type, size_bytes, preview_hex, preview_truncated } => {
            push_json(
                &mut out,
                &json!({
                    "content_type": content_type,
                    "size_bytes": size_bytes,
                    "preview_hex": preview_hex,
                    "preview_truncated": preview_truncated,
                }),
            );
        }
        EnvelopeBody::Empty => {}
    }

    if let Some(error) = envelope.error_detail() {
        let label = if classification == Classification::Warning { "Note" } else { "Error" };
        let _ = write!(out, "\n\n**{label}**: {}", error.message);
        if let Some(detail) = &error.detail {
            let _ = write!(out, "\n\n**Detail**: {detail}");
        }
        if let Some(url) = &error.url {
            let _ = write!(out, "\n\n**URL**: {url}");
        }
        if let Some(hint) = &error.hint {
            let _ = write!(out, "\n\n**Tip**: {hint}");
        }
    }

    out
}

fn push_json(out: &mut String, value: &Value) {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    let _ = write!(out, "\n\n```json\n{pretty}\n```");
}
