//! Classifier adapter around an ONNX Runtime session.

use crate::error::{Error, Result};
use crate::imaging::NormalizedTensor;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, info};

/// Raw classifier output: probability that the image is AI-generated.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ClassificationScore(f64);

impl ClassificationScore {
    /// Wrap a score, rejecting values outside `[0, 1]` and non-finite values.
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::Inference {
                reason: format!("model produced score {value}, expected a probability in [0, 1]"),
            })
        }
    }

    /// The score as a probability.
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// Anything that maps a normalized tensor to a score.
///
/// Implementations must be safe to share across threads; the pipeline holds
/// one instance for the process lifetime.
pub trait ScoreModel: Send + Sync {
    /// Score a single normalized image.
    fn predict(&self, tensor: &NormalizedTensor) -> Result<ClassificationScore>;
}

/// Binary classifier backed by an ONNX model.
///
/// The model takes a `(1, 512, 512, 3)` f32 tensor and emits one sigmoid
/// probability. Runs are serialized because a session needs exclusive access.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    path: PathBuf,
}

impl OnnxClassifier {
    /// Load a model file and verify it accepts the expected input shape.
    pub fn load(path: &Path, intra_threads: Option<usize>) -> Result<Self> {
        let start = Instant::now();
        let load_error = |reason: String| Error::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(load_error("model file does not exist".to_string()));
        }

        let model_bytes = std::fs::read(path).map_err(|e| load_error(e.to_string()))?;

        let mut builder = Session::builder()
            .map_err(|e| load_error(format!("failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(format!("failed to set optimization level: {e}")))?;

        if let Some(threads) = intra_threads {
            builder = builder
                .with_intra_threads(threads)
                .map_err(|e| load_error(format!("failed to set intra threads: {e}")))?;
        }

        let session = builder
            .commit_from_memory(&model_bytes)
            .map_err(|e| load_error(format!("not a valid ONNX model: {e}")))?;

        let classifier = Self {
            session: Mutex::new(session),
            path: path.to_path_buf(),
        };

        // A dry run catches models whose input or output shape does not match.
        classifier
            .predict(&NormalizedTensor::zeros())
            .map_err(|e| load_error(format!("model rejected a (1, 512, 512, 3) input: {e}")))?;

        info!(
            "Loaded model {} in {:.2}s",
            path.display(),
            start.elapsed().as_secs_f64()
        );

        Ok(classifier)
    }

    /// Path the model was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreModel for OnnxClassifier {
    fn predict(&self, tensor: &NormalizedTensor) -> Result<ClassificationScore> {
        let input =
            Tensor::from_array((tensor.shape(), tensor.to_vec())).map_err(|e| Error::Inference {
                reason: format!("failed to build input tensor: {e}"),
            })?;

        let mut session = self.session.lock().map_err(|_| Error::Inference {
            reason: "inference session lock poisoned".to_string(),
        })?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| Error::Inference {
                reason: e.to_string(),
            })?;

        let (shape, values) =
            outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| Error::Inference {
                    reason: format!("unexpected output type: {e}"),
                })?;

        debug!("Model output shape: {:?}", shape);

        let raw = values.first().copied().ok_or_else(|| Error::Inference {
            reason: "model produced an empty output".to_string(),
        })?;

        ClassificationScore::new(f64::from(raw))
    }
}
