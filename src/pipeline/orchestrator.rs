//! Classification pipeline: bytes or post link to labeled result.

use crate::config::PreprocessingConfig;
use crate::error::{Error, Result};
use crate::imaging::{decode_image, normalize};
use crate::inference::{ClassificationResult, ScoreModel, interpret};
use crate::resolver::{PostResolver, PostSource, ResolvedImage};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Result of classifying a post, with the image that was classified.
#[derive(Debug, Clone)]
pub struct UrlClassification {
    /// Labeled result.
    pub result: ClassificationResult,
    /// Image fetched from the post.
    pub image: ResolvedImage,
}

/// Runs decode, normalize, predict and interpret over shared model state.
///
/// Cloning is cheap; clones share the same model.
#[derive(Clone)]
pub struct Pipeline {
    model: Arc<dyn ScoreModel>,
    preprocessing: PreprocessingConfig,
    max_image_bytes: u64,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("preprocessing", &self.preprocessing)
            .field("max_image_bytes", &self.max_image_bytes)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pipeline around a loaded model.
    pub fn new(
        model: Arc<dyn ScoreModel>,
        preprocessing: PreprocessingConfig,
        max_image_bytes: u64,
    ) -> Self {
        Self {
            model,
            preprocessing,
            max_image_bytes,
        }
    }

    /// Classify raw uploaded image bytes.
    ///
    /// Runs on the calling thread.
    pub fn classify_upload(&self, bytes: &[u8]) -> Result<ClassificationResult> {
        let start = Instant::now();

        let image = decode_image(bytes, self.max_image_bytes)?;
        let tensor = normalize(
            &image,
            self.preprocessing.darken,
            self.preprocessing.resize_filter,
        );
        let score = self.model.predict(&tensor)?;
        let result = interpret(score);

        debug!(
            "Classified {}x{} image as {} ({:.4}) in {:.3}s",
            image.width(),
            image.height(),
            result.label,
            result.confidence,
            start.elapsed().as_secs_f64()
        );

        Ok(result)
    }

    /// Classify owned bytes on the blocking thread pool.
    pub async fn classify_blocking(&self, bytes: Vec<u8>) -> Result<(ClassificationResult, Vec<u8>)> {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || {
            let result = pipeline.classify_upload(&bytes)?;
            Ok((result, bytes))
        })
        .await
        .map_err(|e| Error::Internal {
            message: format!("classification task failed: {e}"),
        })?
    }

    /// Resolve a post link and classify its image.
    ///
    /// Uses the same preprocessing policy as [`Pipeline::classify_upload`].
    pub async fn classify_from_url<S: PostSource>(
        &self,
        resolver: &PostResolver<S>,
        link: &str,
    ) -> Result<UrlClassification> {
        let mut image = resolver.resolve(link).await?;
        let bytes = std::mem::take(&mut image.bytes);

        let (result, bytes) = self.classify_blocking(bytes).await?;
        image.bytes = bytes;

        info!(
            "Post {}: {} ({:.1}%)",
            image.shortcode,
            result.label,
            result.confidence * 100.0
        );

        Ok(UrlClassification { result, image })
    }
}
