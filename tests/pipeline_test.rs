//! End-to-end pipeline behavior with an in-process model and post source.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use synthscan::config::{PreprocessingConfig, ResizeFilter, RetrievalMode};
use synthscan::error::{Error, ErrorCategory};
use synthscan::imaging::NormalizedTensor;
use synthscan::inference::{ClassificationScore, Label, ScoreModel};
use synthscan::pipeline::Pipeline;
use synthscan::resolver::{
    Access, MediaKind, PostMedia, PostReference, PostResolver, PostSource,
};
use tempfile::TempDir;

const LIMIT: u64 = 4 * 1024 * 1024;

/// Model returning a fixed score and recording the largest input value it saw.
struct RecordingModel {
    score: f64,
    max_seen: Mutex<Vec<f32>>,
}

impl RecordingModel {
    fn new(score: f64) -> Arc<Self> {
        Arc::new(Self {
            score,
            max_seen: Mutex::new(Vec::new()),
        })
    }

    fn maxima(&self) -> Vec<f32> {
        self.max_seen.lock().unwrap().clone()
    }
}

impl ScoreModel for RecordingModel {
    fn predict(&self, tensor: &NormalizedTensor) -> synthscan::Result<ClassificationScore> {
        assert_eq!(tensor.shape(), [1, 512, 512, 3]);
        let max = tensor.iter().copied().fold(f32::MIN, f32::max);
        self.max_seen.lock().unwrap().push(max);
        ClassificationScore::new(self.score)
    }
}

/// Model that always fails at inference time.
struct BrokenModel;

impl ScoreModel for BrokenModel {
    fn predict(&self, _tensor: &NormalizedTensor) -> synthscan::Result<ClassificationScore> {
        Err(Error::Inference {
            reason: "backend fault".to_string(),
        })
    }
}

/// Source with a single public image post.
struct SinglePost {
    bytes: Vec<u8>,
}

impl PostSource for SinglePost {
    async fn fetch_post(&self, post: &PostReference) -> synthscan::Result<PostMedia> {
        Ok(PostMedia {
            shortcode: post.shortcode().to_string(),
            kind: MediaKind::Image,
            access: Access::Public,
            display_url: Some("https://cdn.test/white.png".to_string()),
            image_urls: Vec::new(),
        })
    }

    async fn download(&self, _url: &str) -> synthscan::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

fn white_png() -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([255, 255, 255])));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn preprocessing(darken: bool) -> PreprocessingConfig {
    PreprocessingConfig {
        darken,
        resize_filter: ResizeFilter::Triangle,
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

#[test]
fn test_upload_is_classified() {
    let model = RecordingModel::new(0.3);
    let pipeline = Pipeline::new(model.clone(), preprocessing(true), LIMIT);

    let result = pipeline.classify_upload(&white_png()).unwrap();

    assert_eq!(result.label, Label::Human);
    assert!((result.confidence - 0.7).abs() < 1e-12);
    assert_eq!(model.maxima().len(), 1);
}

#[test]
fn test_non_image_upload_is_decode_error() {
    let model = RecordingModel::new(0.3);
    let pipeline = Pipeline::new(model.clone(), preprocessing(true), LIMIT);

    let err = pipeline.classify_upload(b"%PDF-1.7 not an image").unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Decode);
    assert!(model.maxima().is_empty(), "model must not run on bad input");
}

#[test]
fn test_inference_failure_is_reported() {
    let pipeline = Pipeline::new(Arc::new(BrokenModel), preprocessing(true), LIMIT);

    let err = pipeline.classify_upload(&white_png()).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Inference);
}

#[test]
fn test_darken_policy_applies_to_both_paths() {
    for darken in [true, false] {
        let model = RecordingModel::new(0.8);
        let pipeline = Pipeline::new(model.clone(), preprocessing(darken), LIMIT);
        let staging = TempDir::new().unwrap();
        let resolver = PostResolver::new(
            SinglePost { bytes: white_png() },
            RetrievalMode::Direct,
            staging.path().to_path_buf(),
        );

        pipeline.classify_upload(&white_png()).unwrap();
        runtime()
            .block_on(pipeline.classify_from_url(&resolver, "https://www.instagram.com/p/WHITE1/"))
            .unwrap();

        let maxima = model.maxima();
        let expected = if darken { 0.6 } else { 1.0 };
        assert_eq!(maxima.len(), 2);
        assert!((maxima[0] - expected).abs() < 1e-6, "upload path, darken={darken}");
        assert!((maxima[1] - expected).abs() < 1e-6, "url path, darken={darken}");
    }
}

#[test]
fn test_url_classification_returns_image() {
    let model = RecordingModel::new(0.95);
    let pipeline = Pipeline::new(model, preprocessing(true), LIMIT);
    let staging = TempDir::new().unwrap();
    let bytes = white_png();
    let resolver = PostResolver::new(
        SinglePost {
            bytes: bytes.clone(),
        },
        RetrievalMode::Staged,
        staging.path().to_path_buf(),
    );

    let classification = runtime()
        .block_on(pipeline.classify_from_url(&resolver, "https://instagram.com/p/WHITE2/"))
        .unwrap();

    assert_eq!(classification.result.label, Label::Ai);
    assert_eq!(classification.image.shortcode, "WHITE2");
    assert_eq!(classification.image.bytes, bytes);
}

#[test]
fn test_url_errors_short_circuit() {
    let model = RecordingModel::new(0.5);
    let pipeline = Pipeline::new(model.clone(), preprocessing(true), LIMIT);
    let staging = TempDir::new().unwrap();
    let resolver = PostResolver::new(
        SinglePost {
            bytes: b"<html>login</html>".to_vec(),
        },
        RetrievalMode::Direct,
        staging.path().to_path_buf(),
    );

    let err = runtime()
        .block_on(pipeline.classify_from_url(&resolver, "https://www.instagram.com/p/HTML01/"))
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Decode);
    assert!(model.maxima().is_empty());
}
