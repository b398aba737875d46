//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "synthscan";

/// Model input geometry.
pub mod tensor {
    /// Input width in pixels.
    pub const WIDTH: u32 = 512;
    /// Input height in pixels.
    pub const HEIGHT: u32 = 512;
    /// Color channels (RGB).
    pub const CHANNELS: usize = 3;
    /// Batch dimension.
    pub const BATCH: usize = 1;
    /// Divisor mapping 8-bit pixel values to [0, 1].
    pub const PIXEL_SCALE: f32 = 255.0;
    /// Multiplier applied to every value when darkening is enabled.
    pub const DARKENING_FACTOR: f32 = 0.6;
}

/// Default upper bound on raw image size (16 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 16 * 1024 * 1024;

/// Image file extensions recognized in directories and staged downloads.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Post resolver constants.
pub mod resolver {
    /// Default platform base URL.
    pub const DEFAULT_BASE_URL: &str = "https://www.instagram.com";

    /// Host that post links must belong to.
    pub const PLATFORM_HOST: &str = "instagram.com";

    /// Path segment that precedes a post shortcode.
    pub const POST_SEGMENT: &str = "p";

    /// Path segments that mark short-form video links.
    pub const REEL_SEGMENTS: &[&str] = &["reel", "reels", "tv"];

    /// GraphQL endpoint path, relative to the base URL.
    pub const GRAPHQL_PATH: &str = "graphql/query";

    /// Persisted query id for the shortcode lookup.
    pub const POST_DOC_ID: &str = "8845758582119845";

    /// Public web application id sent with every lookup.
    pub const APP_ID: &str = "936619743392459";

    /// Default browser-like user agent.
    pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

    /// Default connect timeout in seconds.
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Default total request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default number of posts resolved concurrently.
    pub const DEFAULT_CONCURRENCY: usize = 2;

    /// Prefix of per-request staging directories.
    pub const STAGING_PREFIX: &str = "synthscan-";

    /// Extension used when a download URL carries none.
    pub const FALLBACK_EXTENSION: &str = "jpg";
}
