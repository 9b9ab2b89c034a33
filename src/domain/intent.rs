//! Intent resolution - response-style classification for admitted messages.
//!
//! The resolved label steers prompt construction only; it is never persisted.
//! Whenever the classification signal is weak or absent the resolver falls
//! back to `Info`, the safest and most general response style.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::IntentConfig;
use crate::ports::{ClassifierPrediction, TextClassifier};

/// Coarse response-style label attached to each user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentLabel {
    /// Walkthrough / how-to-progress help.
    Guide,
    /// Factual game information.
    Info,
    /// Game recommendations.
    Recommend,
}

impl IntentLabel {
    /// Parses a recognized in-domain label. The non-domain sentinel and
    /// anything unrecognized yield `None`.
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label {
            "guide" => Some(IntentLabel::Guide),
            "info" => Some(IntentLabel::Info),
            "recommend" => Some(IntentLabel::Recommend),
            _ => None,
        }
    }

    /// Wire form used in prompt payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::Guide => "guide",
            IntentLabel::Info => "info",
            IntentLabel::Recommend => "recommend",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a user message to an intent label via the intent classifier.
pub struct IntentResolver {
    classifier: Arc<dyn TextClassifier>,
    config: IntentConfig,
}

impl IntentResolver {
    /// Creates a resolver over the given classifier.
    pub fn new(classifier: Arc<dyn TextClassifier>, config: IntentConfig) -> Self {
        Self { classifier, config }
    }

    /// Resolves the intent for a message, defaulting to `Info` whenever the
    /// signal is missing, unrecognized, or below the confidence floor.
    pub fn resolve(&self, text: &str) -> IntentLabel {
        let Some(prediction) = self.classifier.predict(text.trim()) else {
            debug!("intent classifier unavailable, defaulting to info");
            return IntentLabel::Info;
        };

        let resolved = self.accept(&prediction);
        debug!(
            label = %prediction.label,
            confidence = prediction.confidence,
            resolved = %resolved,
            "intent resolved"
        );
        resolved
    }

    /// Applies the acceptance rules to a raw prediction.
    fn accept(&self, prediction: &ClassifierPrediction) -> IntentLabel {
        let recognized = IntentLabel::from_model_label(&prediction.label);

        if !prediction.is_calibrated() {
            // Uncalibrated model: trust the label alone.
            return recognized.unwrap_or(IntentLabel::Info);
        }

        if prediction.confidence >= self.config.confidence_floor {
            recognized.unwrap_or(IntentLabel::Info)
        } else {
            IntentLabel::Info
        }
    }
}
