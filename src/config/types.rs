//! Configuration type definitions.

use crate::constants::{DEFAULT_MAX_IMAGE_BYTES, resolver};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classifier model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Image preprocessing settings.
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,

    /// Post resolver settings.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Input limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Classifier model settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    pub path: Option<PathBuf>,

    /// Intra-op thread count for ONNX Runtime (runtime default if unset).
    pub intra_threads: Option<usize>,
}

/// Image preprocessing settings.
///
/// `darken` is applied identically to uploaded and post-sourced images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Scale normalized pixel values by the darkening factor.
    pub darken: bool,

    /// Resampling filter used when resizing to the model input size.
    pub resize_filter: ResizeFilter,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            darken: true,
            resize_filter: ResizeFilter::default(),
        }
    }
}

/// Resampling filter for the resize step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear.
    Triangle,
    /// Bicubic (Catmull-Rom spline).
    #[default]
    CatmullRom,
    /// Lanczos with window 3.
    Lanczos3,
}

impl From<ResizeFilter> for image::imageops::FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => Self::Nearest,
            ResizeFilter::Triangle => Self::Triangle,
            ResizeFilter::CatmullRom => Self::CatmullRom,
            ResizeFilter::Lanczos3 => Self::Lanczos3,
        }
    }
}

/// Strategy for retrieving the image bytes of a resolved post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    /// Fetch the display URL straight into memory.
    #[default]
    Direct,
    /// Download every still image into a scoped temporary directory and pick the first.
    Staged,
}

impl std::fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Staged => write!(f, "staged"),
        }
    }
}

/// Post resolver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Platform base URL.
    pub base_url: String,

    /// Retrieval strategy.
    pub retrieval: RetrievalMode,

    /// Parent directory for staged downloads (system temp dir if unset).
    pub staging_dir: Option<PathBuf>,

    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds.
    pub timeout_secs: u64,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Number of posts resolved concurrently.
    pub concurrency: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: resolver::DEFAULT_BASE_URL.to_string(),
            retrieval: RetrievalMode::default(),
            staging_dir: None,
            connect_timeout_secs: resolver::DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: resolver::DEFAULT_TIMEOUT_SECS,
            user_agent: resolver::DEFAULT_USER_AGENT.to_string(),
            concurrency: resolver::DEFAULT_CONCURRENCY,
        }
    }
}

/// Input limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest accepted raw image, in bytes.
    pub max_image_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocessing_defaults_to_darken() {
        let preprocessing = PreprocessingConfig::default();
        assert!(preprocessing.darken);
        assert_eq!(preprocessing.resize_filter, ResizeFilter::CatmullRom);
    }

    #[test]
    fn test_resolver_defaults() {
        let resolver = ResolverConfig::default();
        assert_eq!(resolver.retrieval, RetrievalMode::Direct);
        assert_eq!(resolver.concurrency, 2);
        assert!(resolver.base_url.starts_with("https://"));
    }

    #[test]
    fn test_retrieval_mode_deserialize() {
        let config: Config = toml::from_str("[resolver]\nretrieval = \"staged\"\n").expect("parse");
        assert_eq!(config.resolver.retrieval, RetrievalMode::Staged);
        assert_eq!(RetrievalMode::Staged.to_string(), "staged");
    }

    #[test]
    fn test_resize_filter_deserialize() {
        let config: Config =
            toml::from_str("[preprocessing]\nresize_filter = \"lanczos3\"\ndarken = false\n")
                .expect("parse");
        assert_eq!(config.preprocessing.resize_filter, ResizeFilter::Lanczos3);
        assert!(!config.preprocessing.darken);
    }
}
