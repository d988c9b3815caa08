//! Classifier abstraction

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SpamError};

pub mod mock;
pub mod naive_bayes;

pub use naive_bayes::NaiveBayesModel;

/// Tolerance used when checking that a distribution sums to one
const SUM_TOLERANCE: f64 = 1e-6;

/// Class predicted by a classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Spam,
    Ham,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Spam => "Spam",
            Label::Ham => "Ham",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = SpamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spam" => Ok(Label::Spam),
            "ham" => Ok(Label::Ham),
            other => Err(SpamError::ModelFormat(format!("unknown class label '{}'", other))),
        }
    }
}

/// Probability mass over {spam, ham}
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassDistribution {
    pub p_spam: f64,
    pub p_ham: f64,
}

impl ClassDistribution {
    pub fn new(p_spam: f64, p_ham: f64) -> Self {
        Self { p_spam, p_ham }
    }

    /// Probability assigned to `label`
    pub fn probability(&self, label: Label) -> f64 {
        match label {
            Label::Spam => self.p_spam,
            Label::Ham => self.p_ham,
        }
    }

    /// Argmax class; a tie goes to Ham
    pub fn predicted_label(&self) -> Label {
        if self.p_spam > self.p_ham {
            Label::Spam
        } else {
            Label::Ham
        }
    }

    /// Both probabilities finite, in [0, 1], and summing to 1
    pub fn is_well_formed(&self) -> bool {
        let in_range = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
        in_range(self.p_spam)
            && in_range(self.p_ham)
            && ((self.p_spam + self.p_ham) - 1.0).abs() <= SUM_TOLERANCE
    }
}

/// A trained spam/ham classifier.
///
/// Implementations are loaded once and queried concurrently, so `predict_proba`
/// takes `&self` and must not mutate shared state.
pub trait Classifier: Send + Sync {
    /// Short identifier for logs and the health route
    fn name(&self) -> &str;

    /// Score normalised text
    fn predict_proba(&self, text: &str) -> Result<ClassDistribution>;

    /// Most likely class for normalised text
    fn predict(&self, text: &str) -> Result<Label> {
        Ok(self.predict_proba(text)?.predicted_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse() {
        assert_eq!("spam".parse::<Label>().unwrap(), Label::Spam);
        assert_eq!(" HAM ".parse::<Label>().unwrap(), Label::Ham);
        assert!("eggs".parse::<Label>().is_err());
    }

    #[test]
    fn test_predicted_label_and_probability() {
        let dist = ClassDistribution::new(0.7, 0.3);
        assert_eq!(dist.predicted_label(), Label::Spam);
        assert_eq!(dist.probability(Label::Spam), 0.7);
        assert_eq!(dist.probability(Label::Ham), 0.3);

        let dist = ClassDistribution::new(0.2, 0.8);
        assert_eq!(dist.predicted_label(), Label::Ham);
    }

    #[test]
    fn test_tie_goes_to_ham() {
        assert_eq!(ClassDistribution::new(0.5, 0.5).predicted_label(), Label::Ham);
    }

    #[test]
    fn test_well_formed() {
        assert!(ClassDistribution::new(0.25, 0.75).is_well_formed());
        assert!(ClassDistribution::new(1.0, 0.0).is_well_formed());
        assert!(!ClassDistribution::new(0.6, 0.6).is_well_formed());
        assert!(!ClassDistribution::new(f64::NAN, 0.5).is_well_formed());
        assert!(!ClassDistribution::new(1.5, -0.5).is_well_formed());
    }
}
