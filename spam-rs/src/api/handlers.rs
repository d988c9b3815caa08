//! JSON API request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::predictor::{PredictionResult, Predictor};

/// Error body for a request without a usable `email_text`
pub const MISSING_EMAIL_TEXT: &str = "Invalid input. Missing email_text.";

/// Error body when the predictor returns `Error`
pub const PREDICTION_FAILED: &str = "An error occurred during prediction.";

/// Shared application state, built once at startup
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

/// Successful prediction body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: String,
    pub confidence: f64,
    pub cleaned_text: String,
}

impl From<&PredictionResult> for PredictResponse {
    fn from(result: &PredictionResult) -> Self {
        Self {
            prediction: result.label().to_string(),
            confidence: result.confidence(),
            cleaned_text: result.normalized_text.clone(),
        }
    }
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

/// Pull `email_text` out of a JSON body.
///
/// `None` when the body is not a JSON object or lacks the field. A present
/// field that is not a string counts as empty text.
fn email_text(payload: std::result::Result<Json<Value>, JsonRejection>) -> Option<String> {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            debug!("Rejected predict body: {}", rejection);
            return None;
        }
    };

    body.as_object()?
        .get("email_text")
        .map(|value| value.as_str().unwrap_or_default().to_string())
}

/// POST /predict - Classify an email
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(text) = email_text(payload) else {
        warn!("Predict request without email_text");
        return (StatusCode::BAD_REQUEST, Json(ApiError::new(MISSING_EMAIL_TEXT))).into_response();
    };

    let result = state.predictor.predict(&text);
    if result.is_error() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(PREDICTION_FAILED)),
        )
            .into_response();
    }

    (StatusCode::OK, Json(PredictResponse::from(&result))).into_response()
}

/// GET /health - Liveness check, answers even without a model
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let model = if state.predictor.is_ready() {
        "loaded"
    } else {
        "unavailable"
    };

    Json(serde_json::json!({
        "status": "healthy",
        "service": "spam-rs",
        "version": env!("CARGO_PKG_VERSION"),
        "model": model
    }))
}
