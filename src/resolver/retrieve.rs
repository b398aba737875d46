//! Byte retrieval strategies for resolved posts.

use super::{PostSource, ResolvedImage};
use crate::constants::resolver::{FALLBACK_EXTENSION, STAGING_PREFIX};
use crate::error::{Error, Result};
use crate::imaging::{is_image_extension, is_image_file};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fetch the first still image straight into memory.
pub(super) async fn direct<S: PostSource>(
    source: &S,
    shortcode: &str,
    urls: &[&str],
) -> Result<ResolvedImage> {
    let url = urls.first().ok_or_else(|| Error::Download {
        url: shortcode.to_string(),
        reason: "post has no still image".to_string(),
    })?;

    let bytes = source.download(url).await?;

    Ok(ResolvedImage {
        shortcode: shortcode.to_string(),
        source_url: (*url).to_string(),
        bytes,
    })
}

/// Download every still image into a scratch directory and keep the first.
///
/// The scratch directory is unique per call and removed when this returns,
/// whether or not retrieval succeeded.
pub(super) async fn staged<S: PostSource>(
    source: &S,
    shortcode: &str,
    urls: &[&str],
    staging_root: &Path,
) -> Result<ResolvedImage> {
    tokio::fs::create_dir_all(staging_root).await?;
    let scratch = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(staging_root)?;
    debug!("Staging post {} in {}", shortcode, scratch.path().display());

    let mut origins = Vec::with_capacity(urls.len());
    for (index, url) in urls.iter().enumerate() {
        let bytes = source.download(url).await?;
        let name = staged_file_name(shortcode, index, url);
        tokio::fs::write(scratch.path().join(&name), &bytes).await?;
        origins.push((name, (*url).to_string()));
    }

    let chosen = first_image_file(scratch.path()).await?.ok_or_else(|| Error::Download {
        url: shortcode.to_string(),
        reason: "no image file among the downloaded post files".to_string(),
    })?;

    let bytes = tokio::fs::read(&chosen).await?;
    let chosen_name = chosen
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let source_url = origins
        .into_iter()
        .find_map(|(name, url)| (name == chosen_name).then_some(url))
        .unwrap_or_default();

    Ok(ResolvedImage {
        shortcode: shortcode.to_string(),
        source_url,
        bytes,
    })
}

/// File name for the `index`-th download, keeping the URL's image extension.
fn staged_file_name(shortcode: &str, index: usize, url: &str) -> String {
    let extension = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            Path::new(u.path())
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
        })
        .filter(|ext| is_image_extension(ext))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    format!("{shortcode}_{:02}.{extension}", index + 1)
}

/// First regular file in `dir`, sorted by name, with an image extension.
async fn first_image_file(dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut candidates = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_image_file(&path) {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}
