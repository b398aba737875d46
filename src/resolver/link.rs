//! Post link parsing.

use crate::constants::resolver::{PLATFORM_HOST, POST_SEGMENT, REEL_SEGMENTS};
use crate::error::{Error, Result, UnsupportedKind};
use url::Url;

/// Shortcode identifying a single post.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostReference {
    shortcode: String,
}

impl PostReference {
    /// Build a reference from a bare shortcode.
    pub fn new(shortcode: impl Into<String>) -> Result<Self> {
        let shortcode = shortcode.into();
        if !is_valid_shortcode(&shortcode) {
            return Err(Error::InvalidLink {
                link: shortcode,
                reason: "shortcode may only contain letters, digits, '-' and '_'".to_string(),
            });
        }
        Ok(Self { shortcode })
    }

    /// The post shortcode.
    pub fn shortcode(&self) -> &str {
        &self.shortcode
    }
}

impl std::fmt::Display for PostReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.shortcode)
    }
}

/// Extract the post reference from a link.
///
/// Links without a scheme are treated as `https`. Reel and TV links are
/// rejected here, before anything touches the network.
pub fn parse_post_link(link: &str) -> Result<PostReference> {
    let trimmed = link.trim();
    let invalid = |reason: &str| Error::InvalidLink {
        link: trimmed.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{trimmed}")))
        .map_err(|_| invalid("not a URL"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("only http and https links are supported"));
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    if !is_platform_host(&host) {
        return Err(invalid("not an instagram.com link"));
    }

    let mut segments = url
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty());

    // The first marker segment decides what kind of link this is.
    while let Some(segment) = segments.next() {
        if REEL_SEGMENTS.contains(&segment) {
            return Err(Error::UnsupportedMedia {
                kind: UnsupportedKind::Reel,
            });
        }
        if segment == POST_SEGMENT {
            let shortcode = segments
                .next()
                .ok_or_else(|| invalid("missing shortcode after /p/"))?;
            if !is_valid_shortcode(shortcode) {
                return Err(invalid("malformed shortcode"));
            }
            return Ok(PostReference {
                shortcode: shortcode.to_string(),
            });
        }
    }

    Err(invalid("no /p/ post marker in path"))
}

fn is_platform_host(host: &str) -> bool {
    host == PLATFORM_HOST
        || host
            .strip_suffix(PLATFORM_HOST)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn is_valid_shortcode(shortcode: &str) -> bool {
    !shortcode.is_empty()
        && shortcode
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
