//! Interpretation of classifier scores.

use crate::inference::ClassificationScore;
use serde::{Deserialize, Serialize};

/// Predicted origin of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Made by a person.
    Human,
    /// Generated by a model.
    #[serde(rename = "AI")]
    Ai,
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "Human"),
            Self::Ai => write!(f, "AI"),
        }
    }
}

/// Labeled classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning label.
    pub label: Label,
    /// Probability of the winning label, in `[0.5, 1.0]`.
    pub confidence: f64,
    /// Probability that the image is AI-generated.
    pub prob_ai: f64,
    /// Probability that the image is human-made.
    pub prob_human: f64,
}

/// Turn a raw score into a labeled result.
///
/// Human wins only when its probability strictly exceeds the AI probability,
/// so a score of exactly 0.5 is labeled AI.
pub fn interpret(score: ClassificationScore) -> ClassificationResult {
    let prob_ai = score.value();
    let prob_human = 1.0 - prob_ai;

    let label = if prob_human > prob_ai {
        Label::Human
    } else {
        Label::Ai
    };

    ClassificationResult {
        label,
        confidence: prob_human.max(prob_ai),
        prob_ai,
        prob_human,
    }
}
