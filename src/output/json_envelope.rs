//! JSON envelope types for CLI output.
//!
//! Every line printed in JSON mode is one envelope, so synthscan can sit
//! behind a web frontend or a script without screen scraping.

use crate::error::{Error, ErrorCategory};
use crate::inference::{ClassificationResult, Label};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Envelope format version.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct JsonEnvelope<T> {
    /// Envelope format version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// One input was classified.
    Result,
    /// One input failed.
    Error,
}

/// Where a classified image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Local file (upload path).
    File,
    /// Social media post link.
    Post,
}

/// Payload for `result` events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationPayload {
    /// File path or post link as given.
    pub source: String,
    /// Kind of source.
    pub source_kind: SourceKind,
    /// Hex SHA-256 of the classified bytes.
    pub sha256: String,
    /// Winning label.
    pub label: Label,
    /// Probability of the winning label.
    pub confidence: f64,
    /// Probability that the image is AI-generated.
    pub prob_ai: f64,
    /// Probability that the image is human-made.
    pub prob_human: f64,
    /// Post shortcode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcode: Option<String>,
    /// URL the post image was fetched from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Base64 of the fetched image, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

impl ClassificationPayload {
    /// Build a payload for classified bytes.
    pub fn new(
        source: impl Into<String>,
        source_kind: SourceKind,
        bytes: &[u8],
        result: &ClassificationResult,
    ) -> Self {
        Self {
            source: source.into(),
            source_kind,
            sha256: sha256_hex(bytes),
            label: result.label,
            confidence: result.confidence,
            prob_ai: result.prob_ai,
            prob_human: result.prob_human,
            shortcode: None,
            image_url: None,
            image_base64: None,
        }
    }
}

/// Error payload for error events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// File path or post link the error belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Error category.
    pub code: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorPayload {
    /// Build a payload from a crate error.
    pub fn from_error(source: Option<&str>, error: &Error) -> Self {
        Self {
            source: source.map(ToString::to_string),
            code: error.category(),
            message: error.to_string(),
        }
    }
}

/// Lowercase hex SHA-256 digest.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Standard base64 encoding of image bytes.
pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::UnsupportedKind;

    fn sample_result() -> ClassificationResult {
        ClassificationResult {
            label: Label::Ai,
            confidence: 0.75,
            prob_ai: 0.75,
            prob_human: 0.25,
        }
    }

    #[test]
    fn test_envelope_serialization() {
        let payload = ClassificationPayload::new("photo.png", SourceKind::File, b"abc", &sample_result());
        let envelope = JsonEnvelope::new(EventType::Result, payload);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["spec_version"], "1.0");
        assert_eq!(json["event"], "result");
        assert_eq!(json["payload"]["label"], "AI");
        assert_eq!(json["payload"]["source_kind"], "file");
        assert!(json["payload"].get("image_base64").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_encode_image() {
        assert_eq!(encode_image(b"\x89PNG"), "iVBORw==");
    }

    #[test]
    fn test_error_payload_uses_category() {
        let error = Error::UnsupportedMedia {
            kind: UnsupportedKind::Video,
        };
        let payload = ErrorPayload::from_error(Some("https://www.instagram.com/p/x/"), &error);
        let json = serde_json::to_value(JsonEnvelope::new(EventType::Error, payload)).unwrap();

        assert_eq!(json["event"], "error");
        assert_eq!(json["payload"]["code"], "unsupported_media");
        assert!(json["payload"]["message"].as_str().unwrap().contains("video"));
    }

    #[test]
    fn test_error_payload_skips_missing_source() {
        let payload = ErrorPayload::from_error(None, &Error::ModelNotConfigured);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("source").is_none());
        assert_eq!(json["code"], "model_load");
    }
}
