//! Live post source backed by the platform's public web API.

use super::{Access, MediaKind, PostMedia, PostReference, PostSource};
use crate::config::ResolverConfig;
use crate::constants::resolver::{APP_ID, GRAPHQL_PATH, POST_DOC_ID};
use crate::error::{Error, Result};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// HTTP client for post metadata and media downloads.
#[derive(Debug, Clone)]
pub struct InstagramClient {
    client: Client,
    endpoint: Url,
    max_bytes: u64,
}

impl InstagramClient {
    /// Build a client from resolver settings.
    ///
    /// `max_bytes` caps every media download.
    pub fn new(config: &ResolverConfig, max_bytes: u64) -> Result<Self> {
        let endpoint = lookup_endpoint(&config.base_url)?;
        debug!("Post lookups go to {}", endpoint);

        let mut headers = HeaderMap::new();
        headers.insert("x-ig-app-id", HeaderValue::from_static(APP_ID));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Internal {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            max_bytes,
        })
    }
}

/// Metadata lookup URL under a base URL, keeping any base path.
fn lookup_endpoint(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url).map_err(|e| Error::ConfigValidation {
        message: format!("resolver.base_url '{base_url}' is not a URL: {e}"),
    })?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(GRAPHQL_PATH).map_err(|e| Error::ConfigValidation {
        message: format!("cannot build lookup endpoint: {e}"),
    })
}

impl PostSource for InstagramClient {
    async fn fetch_post(&self, post: &PostReference) -> Result<PostMedia> {
        let variables = serde_json::json!({ "shortcode": post.shortcode() }).to_string();
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("variables", &variables)
            .append_pair("doc_id", POST_DOC_ID)
            .finish();

        debug!("Looking up post {} at {}", post, self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::upstream("metadata request failed", e))?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => {
                return Err(Error::AccessDenied {
                    shortcode: post.shortcode().to_string(),
                    reason: "post not found".to_string(),
                });
            }
            StatusCode::TOO_MANY_REQUESTS | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("Platform refused lookup for {} with HTTP {}", post, status);
                return Err(Error::UpstreamUnavailable {
                    reason: format!("lookup refused with HTTP {status}"),
                    source: None,
                });
            }
            s if !s.is_success() => {
                return Err(Error::UpstreamUnavailable {
                    reason: format!("lookup failed with HTTP {status}"),
                    source: None,
                });
            }
            _ => {}
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::upstream("metadata response interrupted", e))?;

        parse_post_media(post.shortcode(), &bytes)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let download_error = |reason: String| Error::Download {
            url: url.to_string(),
            reason,
        };

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                Error::upstream("media request failed", e)
            } else {
                download_error(e.to_string())
            }
        })?;

        if response.status() != StatusCode::OK {
            return Err(download_error(format!("HTTP {}", response.status())));
        }

        if let Some(length) = response.content_length()
            && length > self.max_bytes
        {
            return Err(download_error(format!(
                "image is {length} bytes, limit is {}",
                self.max_bytes
            )));
        }

        let mut stream = response.bytes_stream();
        let mut bytes = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                if e.is_timeout() {
                    Error::upstream("media download timed out", e)
                } else {
                    download_error(e.to_string())
                }
            })?;

            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(download_error(format!(
                    "image exceeds the {} byte limit",
                    self.max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    data: Option<LookupData>,
    #[serde(default)]
    require_login: bool,
    status: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupData {
    xdt_shortcode_media: Option<ShortcodeMedia>,
}

#[derive(Debug, Deserialize)]
struct ShortcodeMedia {
    #[serde(rename = "__typename", default)]
    typename: Option<String>,
    #[serde(default)]
    is_video: bool,
    display_url: Option<String>,
    edge_sidecar_to_children: Option<SidecarEdges>,
}

#[derive(Debug, Deserialize)]
struct SidecarEdges {
    #[serde(default)]
    edges: Vec<SidecarEdge>,
}

#[derive(Debug, Deserialize)]
struct SidecarEdge {
    node: SidecarNode,
}

#[derive(Debug, Deserialize)]
struct SidecarNode {
    #[serde(default)]
    is_video: bool,
    display_url: Option<String>,
}

/// Interpret a metadata lookup response body.
///
/// A body that is not the expected JSON is [`Error::AccessDenied`]: the
/// platform serves HTML login walls with a success status. A `"fail"`
/// status without media is the platform throttling this client and maps to
/// [`Error::UpstreamUnavailable`].
pub fn parse_post_media(shortcode: &str, body: &[u8]) -> Result<PostMedia> {
    let malformed = |reason: String| Error::AccessDenied {
        shortcode: shortcode.to_string(),
        reason,
    };

    let response: LookupResponse = serde_json::from_slice(body)
        .map_err(|e| malformed(format!("unexpected lookup response: {e}")))?;

    let media = response.data.and_then(|d| d.xdt_shortcode_media);

    if media.is_none() && response.status.as_deref() == Some("fail") {
        let message = response
            .message
            .unwrap_or_else(|| "lookup rejected".to_string());
        warn!("Platform rejected lookup for {}: {}", shortcode, message);
        return Err(Error::UpstreamUnavailable {
            reason: format!("lookup rejected: {message}"),
            source: None,
        });
    }

    if response.require_login {
        return Ok(PostMedia::restricted(shortcode));
    }

    let Some(media) = media else {
        return Ok(PostMedia::restricted(shortcode));
    };

    if let Some(sidecar) = media.edge_sidecar_to_children {
        let image_urls = sidecar
            .edges
            .into_iter()
            .filter(|edge| !edge.node.is_video)
            .filter_map(|edge| edge.node.display_url)
            .collect();
        return Ok(PostMedia {
            shortcode: shortcode.to_string(),
            kind: MediaKind::Carousel,
            access: Access::Public,
            display_url: media.display_url,
            image_urls,
        });
    }

    let is_video = media.is_video
        || media
            .typename
            .as_deref()
            .is_some_and(|t| t.ends_with("GraphVideo"));

    if !is_video && media.display_url.is_none() {
        return Err(malformed("image post without a display URL".to_string()));
    }

    Ok(PostMedia {
        shortcode: shortcode.to_string(),
        kind: if is_video {
            MediaKind::Video
        } else {
            MediaKind::Image
        },
        access: Access::Public,
        display_url: media.display_url,
        image_urls: Vec::new(),
    })
}
