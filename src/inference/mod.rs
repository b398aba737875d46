//! Inference: the classifier adapter and interpretation of its output.

mod classifier;
mod interpret;

pub use classifier::{ClassificationScore, OnnxClassifier, ScoreModel};
pub use interpret::{ClassificationResult, Label, interpret};
