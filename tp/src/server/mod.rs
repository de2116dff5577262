//! HTTP surface
//!
//! Thin routing layer over the planner: deserialize the request, call the
//! core, serialize the result. All policy lives in the planner.

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::planner::{GenerationError, TripPlanner, UpdateError};

mod routes;

pub use routes::UpdateResponse;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
}

/// Build the application router
pub fn router(planner: Arc<TripPlanner>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/api/create-plan", post(routes::create_plan))
        .route("/api/update-plan", post(routes::update_plan))
        .layer(CorsLayer::permissive())
        .with_state(AppState { planner })
}

/// Error payload returned to HTTP callers
///
/// Client errors and core failures carry the same `{"detail": ...}` body
/// shape but distinct status codes.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };

        (status, axum::Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<UpdateError> for ApiError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::MissingParams => ApiError::BadRequest(err.to_string()),
            UpdateError::Generation(inner) => inner.into(),
        }
    }
}
