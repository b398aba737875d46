//! Result output: human text, JSON envelopes and progress indicators.

pub mod json_envelope;
pub mod progress;
mod reporter;

pub use json_envelope::{
    ClassificationPayload, ErrorPayload, EventType, JsonEnvelope, SourceKind, encode_image,
    sha256_hex,
};
pub use reporter::{HumanReporter, JsonReporter, ResultReporter, format_human};
