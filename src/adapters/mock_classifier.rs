//! Classifier test doubles.
//!
//! Two small implementations of the TextClassifier port: one that always
//! returns the same prediction, and one that scripts a sequence of
//! predictions with call recording.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{ClassifierPrediction, TextClassifier};

/// Classifier returning the same prediction for every input.
#[derive(Debug)]
pub struct StaticClassifier {
    prediction: Option<ClassifierPrediction>,
}

impl StaticClassifier {
    /// Always predicts the given label and confidence.
    pub fn predicting(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            prediction: Some(ClassifierPrediction::new(label, confidence)),
        }
    }

    /// Never produces a prediction (unavailable model).
    pub fn unavailable() -> Self {
        Self { prediction: None }
    }
}

impl TextClassifier for StaticClassifier {
    fn predict(&self, _text: &str) -> Option<ClassifierPrediction> {
        self.prediction.clone()
    }
}

/// Classifier consuming a scripted sequence of predictions.
///
/// Falls back to `None` when the script runs out. Inputs are recorded for
/// verification.
#[derive(Debug, Default)]
pub struct ScriptedClassifier {
    script: Mutex<VecDeque<Option<ClassifierPrediction>>>,
    inputs: Mutex<Vec<String>>,
}

impl ScriptedClassifier {
    /// Creates a classifier with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a prediction.
    pub fn then_predict(self, label: impl Into<String>, confidence: f32) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Some(ClassifierPrediction::new(label, confidence)));
        self
    }

    /// Queues an absent prediction.
    pub fn then_none(self) -> Self {
        self.script.lock().unwrap().push_back(None);
        self
    }

    /// Returns every input the classifier saw, in order.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl TextClassifier for ScriptedClassifier {
    fn predict(&self, text: &str) -> Option<ClassifierPrediction> {
        self.inputs.lock().unwrap().push(text.to_string());
        self.script.lock().unwrap().pop_front().flatten()
    }
}
