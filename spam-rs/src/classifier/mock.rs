//! Mock classifier for testing
//!
//! Returns a scripted distribution (or failure) regardless of input, and
//! records how many times it was queried.

use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use super::{ClassDistribution, Classifier};
use crate::error::{Result, SpamError};

/// What the mock does when queried
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return this distribution
    Fixed(ClassDistribution),
    /// Return a classification error with this message
    Fail(String),
    /// Panic with this message
    Panic(String),
}

/// Mock classifier implementation for testing
pub struct MockClassifier {
    name: String,
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            name: "mock-classifier".to_string(),
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answers with `p_spam` / `1 - p_spam`
    pub fn fixed(p_spam: f64) -> Self {
        Self::new(MockBehavior::Fixed(ClassDistribution::new(p_spam, 1.0 - p_spam)))
    }

    /// Always fails with a classification error
    pub fn failing(message: &str) -> Self {
        Self::new(MockBehavior::Fail(message.to_string()))
    }

    /// Always panics
    pub fn panicking(message: &str) -> Self {
        Self::new(MockBehavior::Panic(message.to_string()))
    }

    /// Number of `predict_proba` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for MockClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_proba(&self, text: &str) -> Result<ClassDistribution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("MockClassifier: scoring {} bytes", text.len());

        match &self.behavior {
            MockBehavior::Fixed(dist) => Ok(*dist),
            MockBehavior::Fail(message) => Err(SpamError::Classification(message.clone())),
            MockBehavior::Panic(message) => panic!("{}", message),
        }
    }
}
