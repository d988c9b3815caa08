//! TF-IDF + multinomial naive Bayes model
//!
//! Loads the parameters of a trained pipeline exported as JSON and reproduces
//! its inference: word n-gram term counts, optional sublinear tf, idf weighting,
//! row normalisation, then multinomial naive Bayes joint log likelihood turned
//! into probabilities with a log-sum-exp softmax.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

use super::{ClassDistribution, Classifier, Label};
use crate::error::{Result, SpamError};

/// Artifact format understood by this loader
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Tokens shorter than this are not features
const MIN_TOKEN_LEN: usize = 2;

/// Row normalisation applied to the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk model artifact
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Class labels in column order of the naive Bayes parameters
    pub classes: Vec<String>,
    pub vectorizer: VectorizerParams,
    pub naive_bayes: NaiveBayesParams,
}

/// Vectoriser parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VectorizerParams {
    /// Term -> feature column
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column; absent means raw counts
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

/// Multinomial naive Bayes parameters, one row per class
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NaiveBayesParams {
    pub class_log_prior: Vec<f64>,
    pub feature_log_prob: Vec<Vec<f64>>,
}

fn default_model_name() -> String {
    "naive-bayes".to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Per-class naive Bayes parameters
#[derive(Debug, Clone)]
struct ClassParams {
    log_prior: f64,
    feature_log_prob: Vec<f64>,
}

impl ClassParams {
    fn joint_log_likelihood(&self, features: &BTreeMap<usize, f64>) -> f64 {
        features
            .iter()
            .fold(self.log_prior, |acc, (&i, &x)| acc + x * self.feature_log_prob[i])
    }
}

/// Validated, ready-to-query model
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    name: String,
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    norm: Option<Norm>,
    spam: ClassParams,
    ham: ClassParams,
}

impl NaiveBayesModel {
    /// Load and validate a model artifact from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading model artifact from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let model = Self::from_json_str(&content)?;

        info!(
            "Loaded model '{}' from {} ({} features, ngram range {:?})",
            model.name,
            path.display(),
            model.n_features(),
            model.ngram_range
        );
        Ok(model)
    }

    /// Parse and validate a model artifact from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(content)?;
        Self::from_artifact(artifact)
    }

    /// Validate an artifact and build the model
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        if artifact.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(SpamError::ModelFormat(format!(
                "unsupported format version {} (expected {})",
                artifact.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }

        let ModelArtifact {
            name,
            classes,
            vectorizer,
            naive_bayes,
            ..
        } = artifact;

        if classes.len() != 2 {
            return Err(SpamError::ModelFormat(format!(
                "expected 2 classes, found {}",
                classes.len()
            )));
        }
        let labels = classes
            .iter()
            .map(|c| c.parse::<Label>())
            .collect::<Result<Vec<_>>>()?;
        if labels[0] == labels[1] {
            return Err(SpamError::ModelFormat(format!(
                "classes must be one spam and one ham, found {:?}",
                classes
            )));
        }

        let NaiveBayesParams {
            class_log_prior,
            feature_log_prob,
        } = naive_bayes;

        let class_log_prior: [f64; 2] = class_log_prior.try_into().map_err(|_| {
            SpamError::ModelFormat("class_log_prior must have one entry per class".to_string())
        })?;
        let feature_log_prob: [Vec<f64>; 2] = feature_log_prob.try_into().map_err(|_| {
            SpamError::ModelFormat("feature_log_prob must have one row per class".to_string())
        })?;

        let n_features = feature_log_prob[0].len();
        if n_features == 0 || vectorizer.vocabulary.is_empty() {
            return Err(SpamError::ModelFormat("model has no features".to_string()));
        }
        if feature_log_prob[1].len() != n_features {
            return Err(SpamError::ModelFormat(format!(
                "feature_log_prob rows differ in length ({} vs {})",
                n_features,
                feature_log_prob[1].len()
            )));
        }
        if let Some((term, index)) = vectorizer
            .vocabulary
            .iter()
            .find(|(_, index)| **index >= n_features)
        {
            return Err(SpamError::ModelFormat(format!(
                "vocabulary term '{}' maps to column {} but the model has {} features",
                term, index, n_features
            )));
        }
        if let Some(idf) = &vectorizer.idf {
            if idf.len() != n_features {
                return Err(SpamError::ModelFormat(format!(
                    "idf has {} entries but the model has {} features",
                    idf.len(),
                    n_features
                )));
            }
            if !idf.iter().all(|v| v.is_finite()) {
                return Err(SpamError::ModelFormat("idf contains non-finite values".to_string()));
            }
        }
        let all_finite = class_log_prior.iter().all(|v| v.is_finite())
            && feature_log_prob.iter().flatten().all(|v| v.is_finite());
        if !all_finite {
            return Err(SpamError::ModelFormat(
                "naive Bayes parameters contain non-finite values".to_string(),
            ));
        }

        let (min_n, max_n) = vectorizer.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(SpamError::ModelFormat(format!(
                "invalid ngram range ({}, {})",
                min_n, max_n
            )));
        }

        let [first_prior, second_prior] = class_log_prior;
        let [first_row, second_row] = feature_log_prob;
        let first = ClassParams {
            log_prior: first_prior,
            feature_log_prob: first_row,
        };
        let second = ClassParams {
            log_prior: second_prior,
            feature_log_prob: second_row,
        };
        let (spam, ham) = match labels[0] {
            Label::Spam => (first, second),
            Label::Ham => (second, first),
        };

        Ok(Self {
            name,
            vocabulary: vectorizer.vocabulary,
            idf: vectorizer.idf,
            ngram_range: vectorizer.ngram_range,
            sublinear_tf: vectorizer.sublinear_tf,
            norm: vectorizer.norm,
            spam,
            ham,
        })
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.spam.feature_log_prob.len()
    }

    /// Number of vocabulary terms
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Word n-grams of normalised text, shortest first
    pub fn terms(&self, text: &str) -> Vec<String> {
        let tokens: Vec<&str> = text
            .split(' ')
            .filter(|t| t.len() >= MIN_TOKEN_LEN)
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Sparse feature vector (column -> weight), ordered by column so sums are reproducible
    pub fn features(&self, text: &str) -> BTreeMap<usize, f64> {
        let mut features: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.terms(text) {
            if let Some(&column) = self.vocabulary.get(&term) {
                *features.entry(column).or_insert(0.0) += 1.0;
            }
        }

        for (&column, weight) in features.iter_mut() {
            if self.sublinear_tf {
                *weight = 1.0 + weight.ln();
            }
            if let Some(idf) = &self.idf {
                *weight *= idf[column];
            }
        }

        let norm = match self.norm {
            Some(Norm::L2) => features.values().map(|w| w * w).sum::<f64>().sqrt(),
            Some(Norm::L1) => features.values().map(|w| w.abs()).sum::<f64>(),
            None => 0.0,
        };
        if norm > 0.0 {
            features.values_mut().for_each(|w| *w /= norm);
        }

        features
    }
}

impl Classifier for NaiveBayesModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_proba(&self, text: &str) -> Result<ClassDistribution> {
        let features = self.features(text);
        let jll_spam = self.spam.joint_log_likelihood(&features);
        let jll_ham = self.ham.joint_log_likelihood(&features);

        if !jll_spam.is_finite() || !jll_ham.is_finite() {
            return Err(SpamError::Classification(format!(
                "non-finite joint log likelihood (spam={}, ham={})",
                jll_spam, jll_ham
            )));
        }

        let max = jll_spam.max(jll_ham);
        let e_spam = (jll_spam - max).exp();
        let e_ham = (jll_ham - max).exp();
        let total = e_spam + e_ham;

        debug!(
            "Scored {} active features: jll_spam={:.4} jll_ham={:.4}",
            features.len(),
            jll_spam,
            jll_ham
        );

        Ok(ClassDistribution::new(e_spam / total, e_ham / total))
    }
}
