//! Prediction service
//!
//! Owns the classifier loaded at startup and turns raw email text into a
//! [`PredictionResult`]. Every call takes a single pass:
//!
//! 1. no model loaded -> `Error`, empty cleaned text
//! 2. normalise; empty result -> `Ham` with confidence 1.0, classifier not called
//! 3. classify; any failure (error, malformed distribution, panic) -> `Error`
//! 4. otherwise the argmax label, with the probability mass of that same label
//!    as confidence

use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::classifier::{ClassDistribution, Classifier, Label, NaiveBayesModel};
use crate::error::{Result, SpamError};
use crate::normalize::normalize;

/// Why a prediction could not be made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// The model failed to load at startup
    ModelUnavailable,
    /// The classifier failed on this request
    ClassificationFailure,
}

/// Outcome of a single prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Outcome {
    Spam { confidence: f64 },
    Ham { confidence: f64 },
    Error(FailureKind),
}

impl Outcome {
    fn classified(label: Label, confidence: f64) -> Self {
        match label {
            Label::Spam => Outcome::Spam { confidence },
            Label::Ham => Outcome::Ham { confidence },
        }
    }
}

/// Result handed back to adapters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub outcome: Outcome,
    pub normalized_text: String,
}

impl PredictionResult {
    fn failed(kind: FailureKind, normalized_text: String) -> Self {
        Self {
            outcome: Outcome::Error(kind),
            normalized_text,
        }
    }

    /// "Spam", "Ham" or "Error"
    pub fn label(&self) -> &'static str {
        match self.outcome {
            Outcome::Spam { .. } => Label::Spam.as_str(),
            Outcome::Ham { .. } => Label::Ham.as_str(),
            Outcome::Error(_) => "Error",
        }
    }

    /// Confidence in the returned label; 0.0 for errors
    pub fn confidence(&self) -> f64 {
        match self.outcome {
            Outcome::Spam { confidence } | Outcome::Ham { confidence } => confidence,
            Outcome::Error(_) => 0.0,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

/// Classifier availability, fixed at startup
pub enum ModelState {
    Ready(Arc<dyn Classifier>),
    Unavailable { reason: String },
}

/// Spam/ham predictor
pub struct Predictor {
    model: ModelState,
}

impl Predictor {
    /// Create a predictor around a loaded classifier
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            model: ModelState::Ready(classifier),
        }
    }

    /// Create a predictor in degraded mode
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            model: ModelState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// Load the model artifact at `path`.
    ///
    /// Never fails: a missing or invalid artifact yields a predictor that
    /// answers every request with `Error`, so the process can still serve
    /// its health route.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match NaiveBayesModel::load(path) {
            Ok(model) => {
                info!(
                    "Model '{}' ready ({} vocabulary terms)",
                    model.name(),
                    model.vocabulary_len()
                );
                Self::new(Arc::new(model))
            }
            Err(e) => {
                error!("Failed to load model from {}: {}", path.display(), e);
                warn!("Starting in degraded mode: every prediction will return Error");
                let reason = SpamError::ModelUnavailable(format!("{}: {}", path.display(), e));
                Self::unavailable(reason.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.model, ModelState::Ready(_))
    }

    /// Name of the loaded classifier, if any
    pub fn model_name(&self) -> Option<&str> {
        match &self.model {
            ModelState::Ready(classifier) => Some(classifier.name()),
            ModelState::Unavailable { .. } => None,
        }
    }

    /// Why the model is unavailable, if it is
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.model {
            ModelState::Ready(_) => None,
            ModelState::Unavailable { reason } => Some(reason),
        }
    }

    /// Classify raw email text
    pub fn predict(&self, raw: &str) -> PredictionResult {
        let classifier = match &self.model {
            ModelState::Ready(classifier) => classifier,
            ModelState::Unavailable { .. } => {
                return PredictionResult::failed(FailureKind::ModelUnavailable, String::new());
            }
        };

        let normalized_text = normalize(raw);
        debug!(
            "Normalized {} bytes of input into {} bytes",
            raw.len(),
            normalized_text.len()
        );

        if normalized_text.is_empty() {
            return PredictionResult {
                outcome: Outcome::Ham { confidence: 1.0 },
                normalized_text,
            };
        }

        match classify(classifier.as_ref(), &normalized_text) {
            Ok(dist) => {
                let label = dist.predicted_label();
                let confidence = dist.probability(label);
                debug!("Predicted {} with confidence {:.4}", label, confidence);
                PredictionResult {
                    outcome: Outcome::classified(label, confidence),
                    normalized_text,
                }
            }
            Err(e) => {
                error!("Prediction failed with classifier '{}': {}", classifier.name(), e);
                PredictionResult::failed(FailureKind::ClassificationFailure, normalized_text)
            }
        }
    }
}

/// Query the classifier, turning panics and malformed output into errors
fn classify(classifier: &dyn Classifier, text: &str) -> Result<ClassDistribution> {
    let dist = catch_unwind(AssertUnwindSafe(|| classifier.predict_proba(text))).map_err(
        |payload| {
            let message = payload
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| payload.downcast_ref::<&str>().copied())
                .unwrap_or("unknown panic");
            SpamError::Classification(format!("classifier panicked: {}", message))
        },
    )??;

    if !dist.is_well_formed() {
        return Err(SpamError::Classification(format!(
            "malformed distribution p_spam={} p_ham={}",
            dist.p_spam, dist.p_ham
        )));
    }

    Ok(dist)
}
