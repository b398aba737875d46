//! Error types for synthscan.

use serde::{Deserialize, Serialize};

/// Result type alias for synthscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of media the classifier refuses to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedKind {
    /// Short-form video post (reel link).
    Reel,
    /// Post whose primary media is a video.
    Video,
}

impl std::fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reel => write!(f, "reel"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Closed set of failure categories reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The classifier model could not be loaded.
    ModelLoad,
    /// Inference failed for one request.
    Inference,
    /// The post link is not a recognized post URL.
    InvalidLink,
    /// The post is a reel or video.
    UnsupportedMedia,
    /// The post is private or the platform answered with garbage.
    AccessDenied,
    /// The platform could not be reached (blocked, rate limited, timed out).
    UpstreamUnavailable,
    /// The image bytes could not be retrieved.
    Download,
    /// The bytes are not a supported image.
    Decode,
    /// Configuration is missing or invalid.
    Config,
    /// Local I/O failure.
    Io,
    /// Unexpected internal failure.
    Internal,
}

impl ErrorCategory {
    /// Stable `snake_case` identifier of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ModelLoad => "model_load",
            Self::Inference => "inference",
            Self::InvalidLink => "invalid_link",
            Self::UnsupportedMedia => "unsupported_media",
            Self::AccessDenied => "access_denied",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::Download => "download",
            Self::Decode => "decode",
            Self::Config => "config",
            Self::Io => "io",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for synthscan.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// No model path configured.
    #[error("no model configured (use --model or set model.path in config)")]
    ModelNotConfigured,

    /// Classifier model could not be loaded.
    #[error("failed to load model '{path}': {reason}")]
    ModelLoad {
        /// Path to the model file.
        path: std::path::PathBuf,
        /// Description of the load failure.
        reason: String,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Link is not a recognized post URL.
    #[error("invalid post link '{link}': {reason}")]
    InvalidLink {
        /// The offending link.
        link: String,
        /// Why the link was rejected.
        reason: String,
    },

    /// Post media kind is not supported.
    #[error("post is a {kind}; only still images can be classified")]
    UnsupportedMedia {
        /// Kind of media that was rejected.
        kind: UnsupportedKind,
    },

    /// Post is not accessible.
    #[error("post '{shortcode}' is not accessible: {reason}")]
    AccessDenied {
        /// Post shortcode.
        shortcode: String,
        /// Description of the denial.
        reason: String,
    },

    /// Platform could not be reached.
    #[error("cannot reach the platform (the server IP may be blocked or rate limited): {reason}")]
    UpstreamUnavailable {
        /// Description of the failure.
        reason: String,
        /// Underlying transport error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image bytes could not be retrieved.
    #[error("failed to download image from '{url}': {reason}")]
    Download {
        /// URL that failed.
        url: String,
        /// Description of the failure.
        reason: String,
    },

    /// Bytes are not a supported image.
    #[error("failed to decode image: {reason}")]
    Decode {
        /// Description of the decode failure.
        reason: String,
    },

    /// No valid image files found.
    #[error("no valid image files found in the provided paths")]
    NoValidImageFiles,

    /// Some inputs failed to classify.
    #[error("{failed} of {total} input(s) failed to classify")]
    ClassificationFailures {
        /// Number of failed inputs.
        failed: usize,
        /// Total number of inputs.
        total: usize,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Map this error onto the closed category set.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) => ErrorCategory::Io,
            Self::ConfigDirNotFound
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigValidation { .. }
            | Self::ConfigWrite { .. }
            | Self::ConfigSerialize { .. }
            | Self::NoValidImageFiles => ErrorCategory::Config,
            Self::ModelNotConfigured | Self::ModelLoad { .. } => ErrorCategory::ModelLoad,
            Self::Inference { .. } => ErrorCategory::Inference,
            Self::InvalidLink { .. } => ErrorCategory::InvalidLink,
            Self::UnsupportedMedia { .. } => ErrorCategory::UnsupportedMedia,
            Self::AccessDenied { .. } => ErrorCategory::AccessDenied,
            Self::UpstreamUnavailable { .. } => ErrorCategory::UpstreamUnavailable,
            Self::Download { .. } => ErrorCategory::Download,
            Self::Decode { .. } => ErrorCategory::Decode,
            Self::ClassificationFailures { .. } | Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Build an upstream error from a transport failure.
    pub(crate) fn upstream(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::UpstreamUnavailable {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}
