//! Request handlers

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use serde_json::{Value, json};

use super::{ApiError, AppState};
use crate::planner::{TripRequest, UpdateRequest};
use crate::schema::PlanOutput;

/// Liveness probe
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Server is running" }))
}

/// POST /api/create-plan
pub async fn create_plan(
    State(state): State<AppState>,
    Json(req): Json<TripRequest>,
) -> Result<Json<PlanOutput>, ApiError> {
    let plan = state.planner.generate_trip_plan(&req, None, None).await?;
    Ok(Json(plan))
}

/// Response body for a plan update
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub plan: PlanOutput,

    /// Human-readable summary of the regenerated plan
    pub extra: String,
}

/// POST /api/update-plan
pub async fn update_plan(
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let updated = state.planner.update_trip_plan(&req).await?;
    Ok(Json(UpdateResponse {
        plan: updated.plan,
        extra: updated.summary,
    }))
}
