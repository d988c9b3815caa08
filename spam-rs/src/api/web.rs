//! Interactive classification form

use askama_axum::Template;
use axum::{extract::State, response::IntoResponse, Form};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::predictor::{Outcome, PredictionResult};

const EMPTY_INPUT_WARNING: &str = "Please paste an email into the text box above.";
const CLASSIFICATION_ERROR: &str =
    "An error occurred during classification. Please check the logs.";

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    email_text: String,
    warning: String,
    error: String,
    result: Option<ResultCard>,
}

/// Rendered classification
struct ResultCard {
    is_spam: bool,
    confidence: String,
    cleaned_text: String,
}

impl ResultCard {
    fn from_result(result: &PredictionResult) -> Option<Self> {
        let is_spam = match result.outcome {
            Outcome::Spam { .. } => true,
            Outcome::Ham { .. } => false,
            Outcome::Error(_) => return None,
        };

        Some(Self {
            is_spam,
            confidence: format_confidence(result.confidence()),
            cleaned_text: result.normalized_text.clone(),
        })
    }
}

#[derive(Deserialize)]
pub struct ClassifyForm {
    #[serde(default)]
    email_text: String,
}

/// Confidence as a percentage with two decimals
fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

// Form page (GET)
pub async fn index() -> impl IntoResponse {
    IndexTemplate {
        email_text: String::new(),
        warning: String::new(),
        error: String::new(),
        result: None,
    }
}

// Form submission (POST)
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ClassifyForm>,
) -> impl IntoResponse {
    if form.email_text.is_empty() {
        return IndexTemplate {
            email_text: form.email_text,
            warning: EMPTY_INPUT_WARNING.to_string(),
            error: String::new(),
            result: None,
        };
    }

    let result = state.predictor.predict(&form.email_text);
    let card = ResultCard::from_result(&result);
    let error = if card.is_none() {
        CLASSIFICATION_ERROR.to_string()
    } else {
        String::new()
    };

    IndexTemplate {
        email_text: form.email_text,
        warning: String::new(),
        error,
        result: card,
    }
}
