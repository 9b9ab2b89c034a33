//! Text Classifier Port - capability interface over in-process ML models.
//!
//! Both the binary domain classifier and the intent classifier satisfy this
//! contract, so any on-device or embedded model can be plugged in without the
//! domain layer knowing the backing implementation.

use serde::{Deserialize, Serialize};

/// A single classifier prediction.
///
/// `confidence < 0` is a sentinel meaning the model provides no calibrated
/// probability; callers trust the label alone in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierPrediction {
    /// Predicted label, model-specific vocabulary.
    pub label: String,
    /// Calibrated probability in [0, 1], or negative when uncalibrated.
    pub confidence: f32,
}

impl ClassifierPrediction {
    /// Creates a prediction with a calibrated confidence.
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Creates a label-only prediction (no calibrated probability).
    pub fn uncalibrated(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            confidence: -1.0,
        }
    }

    /// Whether the model supplied a calibrated probability.
    pub fn is_calibrated(&self) -> bool {
        self.confidence >= 0.0
    }
}

/// Port for in-process text classification.
///
/// Classification is synchronous: models run on-device and never suspend.
/// `None` means the classifier is unavailable or failed for this input;
/// callers degrade to their conservative default.
pub trait TextClassifier: Send + Sync {
    /// Classify `text`, returning the top prediction if one is available.
    fn predict(&self, text: &str) -> Option<ClassifierPrediction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibrated_prediction() {
        let p = ClassifierPrediction::new("game", 0.92);
        assert!(p.is_calibrated());
        assert_eq!(p.label, "game");
    }

    #[test]
    fn uncalibrated_sentinel_is_negative() {
        let p = ClassifierPrediction::uncalibrated("guide");
        assert!(!p.is_calibrated());
        assert!(p.confidence < 0.0);
    }
}
