//! Result reporting for CLI output.
//!
//! Human mode prints a short block per input; JSON mode prints one
//! envelope per line on stdout.

use crate::error::Error;
use crate::inference::ClassificationResult;
use crate::output::json_envelope::{
    ClassificationPayload, ErrorPayload, EventType, JsonEnvelope, SourceKind, encode_image,
};
use crate::pipeline::UrlClassification;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::error;

/// Sink for per-input classification outcomes.
pub trait ResultReporter: Send + Sync {
    /// Report a classified local file.
    fn file_result(&self, path: &Path, bytes: &[u8], result: &ClassificationResult);

    /// Report a classified post.
    fn post_result(&self, link: &str, classification: &UrlClassification);

    /// Report a failed input.
    fn failure(&self, source: &str, error: &Error);
}

/// Writes lines to a shared writer, warning once if the writer breaks.
struct LineWriter {
    writer: Mutex<Box<dyn Write + Send>>,
    error_logged: AtomicBool,
}

impl LineWriter {
    fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            error_logged: AtomicBool::new(false),
        }
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{line}") {
                // Broken pipes would otherwise warn once per input.
                if !self.error_logged.swap(true, Ordering::Relaxed) {
                    eprintln!(
                        "synthscan: warning: failed to write to stdout: {e} (subsequent errors suppressed)"
                    );
                }
            }
            let _ = writer.flush();
        }
    }
}

/// Human-readable reporter.
pub struct HumanReporter {
    out: LineWriter,
}

impl HumanReporter {
    /// Create a reporter writing to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a reporter with a custom writer.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: LineWriter::new(Box::new(writer)),
        }
    }
}

impl Default for HumanReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultReporter for HumanReporter {
    fn file_result(&self, path: &Path, _bytes: &[u8], result: &ClassificationResult) {
        self.out
            .write_line(&format_human(&path.display().to_string(), result));
    }

    fn post_result(&self, link: &str, classification: &UrlClassification) {
        let heading = format!("{link} (post {})", classification.image.shortcode);
        self.out
            .write_line(&format_human(&heading, &classification.result));
    }

    fn failure(&self, source: &str, error: &Error) {
        error!("{}: {}", source, error);
    }
}

/// Format one result the way the interactive tool shows it.
pub fn format_human(heading: &str, result: &ClassificationResult) -> String {
    format!(
        "{heading}\n  Prediction: {}\n  Confidence: {:.2}%\n  AI-generated: {:.2}%  Human-made: {:.2}%",
        result.label,
        result.confidence * 100.0,
        result.prob_ai * 100.0,
        result.prob_human * 100.0
    )
}

/// Line-delimited JSON reporter.
pub struct JsonReporter {
    out: LineWriter,
    include_image: bool,
}

impl JsonReporter {
    /// Create a reporter writing to stdout.
    ///
    /// With `include_image`, post results carry the fetched image as base64.
    pub fn new(include_image: bool) -> Self {
        Self::with_writer(io::stdout(), include_image)
    }

    /// Create a reporter with a custom writer.
    pub fn with_writer<W: Write + Send + 'static>(writer: W, include_image: bool) -> Self {
        Self {
            out: LineWriter::new(Box::new(writer)),
            include_image,
        }
    }

    fn emit<T: serde::Serialize>(&self, event: EventType, payload: T) {
        let envelope = JsonEnvelope::new(event, payload);
        match serde_json::to_string(&envelope) {
            Ok(json) => self.out.write_line(&json),
            Err(e) => error!("Failed to serialize {:?} event: {}", event, e),
        }
    }
}

impl ResultReporter for JsonReporter {
    fn file_result(&self, path: &Path, bytes: &[u8], result: &ClassificationResult) {
        let payload = ClassificationPayload::new(
            path.display().to_string(),
            SourceKind::File,
            bytes,
            result,
        );
        self.emit(EventType::Result, payload);
    }

    fn post_result(&self, link: &str, classification: &UrlClassification) {
        let image = &classification.image;
        let mut payload =
            ClassificationPayload::new(link, SourceKind::Post, &image.bytes, &classification.result);
        payload.shortcode = Some(image.shortcode.clone());
        payload.image_url = Some(image.source_url.clone());
        if self.include_image {
            payload.image_base64 = Some(encode_image(&image.bytes));
        }
        self.emit(EventType::Result, payload);
    }

    fn failure(&self, source: &str, error: &Error) {
        self.emit(EventType::Error, ErrorPayload::from_error(Some(source), error));
    }
}
