//! HTTP adapter
//!
//! Thin axum layer over [`crate::predictor::Predictor`]: the JSON API, a
//! health route, and the interactive form.

pub mod handlers;
pub mod server;
pub mod web;

pub use handlers::{ApiError, AppState, PredictResponse};
pub use server::ApiServer;
