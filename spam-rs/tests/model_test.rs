//! Integration tests against the shipped demo model artifact

use spam_rs::{Classifier, Label, NaiveBayesModel, Outcome, Predictor};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/nb_spam_ham.json")
}

fn load_model() -> Arc<NaiveBayesModel> {
    Arc::new(NaiveBayesModel::load(model_path()).unwrap())
}

#[test]
fn test_shipped_model_loads() {
    let model = load_model();
    assert_eq!(model.name(), "nb_spam_ham");
    assert!(model.n_features() > 0);
    assert_eq!(model.n_features(), model.vocabulary_len());
}

#[test]
fn test_spam_scenario() {
    let model = load_model();
    let predictor = Predictor::new(model.clone());

    let result = predictor.predict("WIN MONEY NOW!!! Click http://x.biz");
    assert_eq!(result.normalized_text, "win money now click httpxbiz");
    assert_eq!(result.label(), "Spam");

    let dist = model.predict_proba(&result.normalized_text).unwrap();
    assert_eq!(result.confidence(), dist.p_spam);
    assert!(result.confidence() >= 0.5);
}

#[test]
fn test_ham_scenario() {
    let model = load_model();
    let predictor = Predictor::new(model.clone());

    let result = predictor.predict("Let's meet for lunch tomorrow at noon");
    assert_eq!(result.normalized_text, "lets meet for lunch tomorrow at noon");
    assert_eq!(result.label(), "Ham");

    let dist = model.predict_proba(&result.normalized_text).unwrap();
    assert_eq!(result.confidence(), dist.p_ham);
    assert!(result.confidence() >= 0.5);
}

#[test]
fn test_confidence_matches_predicted_label() {
    let model = load_model();
    let predictor = Predictor::new(model.clone());

    let messages = [
        "Free entry to win a cash prize, text WIN now",
        "Are we still on for dinner tonight?",
        "URGENT: claim your free bonus",
        "I'll call you when I get home",
        "qwerty asdf zxcv",
    ];

    for message in messages {
        let result = predictor.predict(message);
        let dist = model.predict_proba(&result.normalized_text).unwrap();
        let label = model.predict(&result.normalized_text).unwrap();

        match result.outcome {
            Outcome::Spam { confidence } => {
                assert_eq!(label, Label::Spam);
                assert_eq!(confidence, dist.p_spam);
            }
            Outcome::Ham { confidence } => {
                assert_eq!(label, Label::Ham);
                assert_eq!(confidence, dist.p_ham);
            }
            Outcome::Error(kind) => panic!("unexpected failure {:?} for {:?}", kind, message),
        }
        assert!(result.confidence() >= 0.5);
        assert!((dist.p_spam + dist.p_ham - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_predictor_load_from_path() {
    let predictor = Predictor::load(model_path());
    assert!(predictor.is_ready());
    assert_eq!(predictor.model_name(), Some("nb_spam_ham"));
}

#[test]
fn test_corrupt_artifact_starts_degraded() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{\"format_version\": 1, \"classes\": [\"ham\"]").unwrap();

    let predictor = Predictor::load(file.path());
    assert!(!predictor.is_ready());
    assert!(predictor.unavailable_reason().is_some());

    let result = predictor.predict("WIN MONEY NOW");
    assert!(result.is_error());
    assert_eq!(result.confidence(), 0.0);
    assert_eq!(result.normalized_text, "");
}

#[test]
fn test_concurrent_predictions_share_model() {
    let predictor = Arc::new(Predictor::new(load_model()));
    let expected = predictor.predict("win cash now");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let predictor = Arc::clone(&predictor);
            std::thread::spawn(move || predictor.predict("win cash now"))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
