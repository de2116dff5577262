//! Planner error types

use thiserror::Error;

use crate::llm::LlmError;

/// Errors that end a generation request
///
/// Any variant here means no plan is returned; partial plans never escape.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid trip request: {0}")]
    InvalidRequest(String),

    #[error("prompt rendering failed: {0}")]
    Prompt(#[from] handlebars::RenderError),

    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("no JSON object or array found in model output")]
    NoJson,

    #[error("model output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model output does not match the plan schema: {0}")]
    InvalidStructure(String),
}

/// Errors from the update orchestrator
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The structured trip parameters are required to regenerate a plan
    #[error("plan_req is required to update a plan")]
    MissingParams,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
