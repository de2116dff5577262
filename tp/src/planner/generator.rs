//! TripPlanner - LLM-driven generation of trip plans
//!
//! Drives the whole pipeline for one request: compose the traveler request,
//! gather retrieval context, build the instruction, invoke the model, then
//! validate/repair the output and fill in the derived fields.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GenerationError, repair};
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts::PromptBuilder;
use crate::retrieval::RetrievalAugmentor;
use crate::schema::{ExtraInfo, PlanOutput};

/// Max tokens requested per plan generation
const PLAN_MAX_TOKENS: u32 = 8192;

/// The structured trip parameters for one plan request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub departure: String,
    pub destination: String,

    #[serde(default = "default_travelers")]
    pub travelers: u32,

    #[serde(default = "default_days")]
    pub days: u32,

    #[serde(default = "default_budget")]
    pub budget: u64,

    /// Free-text preference tags, used verbatim
    #[serde(default)]
    pub preferences: Vec<String>,

    /// ISO departure date, if the traveler has picked one
    #[serde(default)]
    pub start_date: Option<String>,
}

fn default_travelers() -> u32 {
    1
}

fn default_days() -> u32 {
    3
}

fn default_budget() -> u64 {
    1000
}

/// TripPlanner orchestrates plan generation
///
/// Holds the model and retrieval collaborators; construct one per process
/// and share it behind an Arc. Tests inject fakes for all collaborators.
pub struct TripPlanner {
    llm: Arc<dyn LlmClient>,
    augmentor: RetrievalAugmentor,
    prompts: PromptBuilder,
}

impl TripPlanner {
    /// Create a planner over the given collaborators
    pub fn new(llm: Arc<dyn LlmClient>, augmentor: RetrievalAugmentor, prompts: PromptBuilder) -> Self {
        Self {
            llm,
            augmentor,
            prompts,
        }
    }

    /// Generate a trip plan
    ///
    /// `edit_instruction` carries an update request (see the update
    /// orchestrator); `current_plan` is the prior plan an update is diffed
    /// against. Both are None for a fresh plan.
    pub async fn generate_trip_plan(
        &self,
        req: &TripRequest,
        edit_instruction: Option<&str>,
        current_plan: Option<&PlanOutput>,
    ) -> Result<PlanOutput, GenerationError> {
        check_request(req)?;

        info!(
            departure = %req.departure,
            destination = %req.destination,
            days = req.days,
            travelers = req.travelers,
            "generating trip plan"
        );

        let user_request = compose_user_request(req, edit_instruction);

        // Best-effort: retrieval failures degrade to empty context inside
        let support = self.augmentor.support_context(&req.destination).await;

        let instruction = self.prompts.build_instruction(&user_request, &support)?;

        let request = CompletionRequest {
            system_prompt: String::new(),
            messages: vec![Message::user(instruction)],
            max_tokens: PLAN_MAX_TOKENS,
        };

        let response = self.llm.complete(request).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "model call complete"
        );

        let raw = response.content.ok_or(GenerationError::EmptyResponse)?;

        let mut plan = repair::parse_plan_output(&raw)?;
        finalize_plan(&mut plan, current_plan);

        info!(
            days = plan.itinerary.len(),
            total = plan.estimate.total,
            "trip plan generated"
        );

        Ok(plan)
    }
}

/// Reject requests that violate the generation preconditions
fn check_request(req: &TripRequest) -> Result<(), GenerationError> {
    if req.days < 1 {
        return Err(GenerationError::InvalidRequest("days must be at least 1".to_string()));
    }
    if req.travelers < 1 {
        return Err(GenerationError::InvalidRequest(
            "travelers must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Compose the natural-language traveler request from structured parameters
fn compose_user_request(req: &TripRequest, edit_instruction: Option<&str>) -> String {
    let preferences = if req.preferences.is_empty() {
        "no particular preferences".to_string()
    } else {
        req.preferences.join(", ")
    };
    let start_date = req.start_date.as_deref().unwrap_or("undetermined");

    let mut text = format!(
        "Plan a {}-day trip for {} traveler(s) from {} to {}. \
         Budget: {}. Preferences: {}. Departure date: {}.\n\
         Include cost details for every activity, transport leg, and place to stay.",
        req.days, req.travelers, req.departure, req.destination, req.budget, preferences, start_date,
    );

    if let Some(edit) = edit_instruction {
        text.push_str("\n\n");
        text.push_str(edit);
    }

    text
}

/// Fill in the derived fields the model does not author
fn finalize_plan(plan: &mut PlanOutput, current_plan: Option<&PlanOutput>) {
    // A model-supplied nonzero total is preserved even when inconsistent
    if plan.estimate.total.is_none() || plan.estimate.total == Some(0) {
        plan.estimate.total = Some(plan.estimate.component_sum());
    }

    let mut extra = ExtraInfo::default();

    if let Some(old) = current_plan {
        let old_names = old.item_names();
        let new_names = plan.item_names();
        extra.changes = new_names.difference(&old_names).cloned().collect();
    }

    for day in &plan.itinerary {
        for item in &day.items {
            extra.best_time_to_visit.insert(item.name.clone(), item.time.clone());
            extra.tickets.insert(item.name.clone(), item.est_cost.activity);
        }
    }

    plan.extra_info = Some(extra);
}
