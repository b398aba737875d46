//! Post resolution: link to a single image.

mod instagram;
mod link;
mod retrieve;

pub use instagram::{InstagramClient, parse_post_media};
pub use link::{PostReference, parse_post_link};

use crate::config::RetrievalMode;
use crate::error::{Error, Result, UnsupportedKind};
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info};

/// Primary media kind of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Single still image.
    Image,
    /// Single video.
    Video,
    /// Multi-item post.
    Carousel,
}

/// Whether the post's media can be fetched anonymously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Publicly visible.
    Public,
    /// Private, deleted, or behind a login wall.
    Restricted,
}

/// Post metadata as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMedia {
    /// Post shortcode.
    pub shortcode: String,
    /// Primary media kind.
    pub kind: MediaKind,
    /// Accessibility of the media.
    pub access: Access,
    /// Display URL of the primary media.
    pub display_url: Option<String>,
    /// Still-image URLs of carousel children, in post order.
    pub image_urls: Vec<String>,
}

impl PostMedia {
    /// Metadata for a post that cannot be viewed.
    pub fn restricted(shortcode: impl Into<String>) -> Self {
        Self {
            shortcode: shortcode.into(),
            kind: MediaKind::Image,
            access: Access::Restricted,
            display_url: None,
            image_urls: Vec::new(),
        }
    }

    /// Every still image of the post, first one first.
    pub fn still_images(&self) -> Vec<&str> {
        match self.kind {
            MediaKind::Carousel => self.image_urls.iter().map(String::as_str).collect(),
            MediaKind::Image => self.display_url.as_deref().into_iter().collect(),
            MediaKind::Video => Vec::new(),
        }
    }
}

/// One image fetched for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Shortcode of the post the image belongs to.
    pub shortcode: String,
    /// URL the bytes were fetched from.
    pub source_url: String,
    /// Raw encoded image bytes.
    pub bytes: Vec<u8>,
}

/// Access to the platform: metadata lookup and byte download.
///
/// The live implementation is [`InstagramClient`]; tests substitute an
/// in-process source.
pub trait PostSource: Send + Sync {
    /// Look up post metadata.
    fn fetch_post(&self, post: &PostReference) -> impl Future<Output = Result<PostMedia>> + Send;

    /// Download raw bytes from a media URL.
    fn download(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Resolves post links into image bytes.
pub struct PostResolver<S> {
    source: S,
    retrieval: RetrievalMode,
    staging_root: PathBuf,
}

impl<S: PostSource> PostResolver<S> {
    /// Create a resolver over a post source.
    ///
    /// `staging_root` is the parent of the scratch directories used by
    /// [`RetrievalMode::Staged`].
    pub fn new(source: S, retrieval: RetrievalMode, staging_root: PathBuf) -> Self {
        Self {
            source,
            retrieval,
            staging_root,
        }
    }

    /// The underlying post source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve a post link into exactly one still image.
    pub async fn resolve(&self, link: &str) -> Result<ResolvedImage> {
        let post = parse_post_link(link)?;
        debug!("Resolving post {}", post);

        let media = self.source.fetch_post(&post).await?;

        if media.access == Access::Restricted {
            return Err(Error::AccessDenied {
                shortcode: post.shortcode().to_string(),
                reason: "post is private, deleted or requires login".to_string(),
            });
        }

        if media.kind == MediaKind::Video {
            return Err(Error::UnsupportedMedia {
                kind: UnsupportedKind::Video,
            });
        }

        // A carousel made only of videos has nothing to classify.
        let urls = media.still_images();
        if urls.is_empty() {
            return Err(Error::UnsupportedMedia {
                kind: UnsupportedKind::Video,
            });
        }

        let image = match self.retrieval {
            RetrievalMode::Direct => retrieve::direct(&self.source, &media.shortcode, &urls).await?,
            RetrievalMode::Staged => {
                retrieve::staged(&self.source, &media.shortcode, &urls, &self.staging_root).await?
            }
        };

        info!(
            "Resolved post {} ({} bytes, {} retrieval)",
            post,
            image.bytes.len(),
            self.retrieval
        );

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(urls: &[&str]) -> PostMedia {
        PostMedia {
            shortcode: "abc".to_string(),
            kind: MediaKind::Carousel,
            access: Access::Public,
            display_url: Some("https://cdn.test/cover.jpg".to_string()),
            image_urls: urls.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_still_images_for_carousel_uses_children() {
        let media = carousel(&["https://cdn.test/1.jpg", "https://cdn.test/2.jpg"]);
        assert_eq!(
            media.still_images(),
            vec!["https://cdn.test/1.jpg", "https://cdn.test/2.jpg"]
        );
    }

    #[test]
    fn test_still_images_for_video_is_empty() {
        let media = PostMedia {
            kind: MediaKind::Video,
            display_url: Some("https://cdn.test/poster.jpg".to_string()),
            ..carousel(&[])
        };
        assert!(media.still_images().is_empty());
    }

    #[test]
    fn test_restricted_has_no_images() {
        let media = PostMedia::restricted("abc");
        assert_eq!(media.access, Access::Restricted);
        assert!(media.still_images().is_empty());
    }
}
