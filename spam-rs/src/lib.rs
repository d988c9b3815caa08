//! spam-rs: Spam/ham email classification service
//!
//! Classifies free-text email content as spam or ham with a pre-trained
//! multinomial naive Bayes model over TF-IDF features.
//!
//! # Features
//!
//! - Deterministic text normalisation matching the training pipeline
//! - Confidence reported as the probability of the label actually returned
//! - Degraded mode: a missing or broken model never stops the process
//! - JSON API, health route and an interactive HTML form (axum)
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//! debug = false
//!
//! [model]
//! path = "models/nb_spam_ham.json"
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use spam_rs::Predictor;
//!
//! let predictor = Predictor::load("models/nb_spam_ham.json");
//! let result = predictor.predict("WIN MONEY NOW!!! Click http://x.biz");
//! println!("{} ({:.2})", result.label(), result.confidence());
//! ```

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod predictor;

pub use classifier::{ClassDistribution, Classifier, Label, NaiveBayesModel};
pub use config::ServiceConfig;
pub use error::{Result, SpamError};
pub use normalize::normalize;
pub use predictor::{FailureKind, Outcome, PredictionResult, Predictor};
