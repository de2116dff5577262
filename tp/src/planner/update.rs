//! Plan update orchestration
//!
//! Turns a free-text edit request plus the original trip parameters into a
//! fresh plan, and renders the human-readable change summary shown next to
//! it.

use serde::Deserialize;
use tracing::info;

use super::{TripPlanner, TripRequest, UpdateError};
use crate::schema::PlanOutput;

/// An update request: the edit instruction plus the original parameters
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    /// Free-text edit instruction
    pub prompt: String,

    /// The plan being edited, when the caller still has it
    #[serde(default)]
    pub current_plan: Option<PlanOutput>,

    /// The original structured trip parameters; required
    #[serde(default)]
    pub plan_req: Option<TripRequest>,
}

/// A regenerated plan plus its rendered summary
#[derive(Debug, Clone)]
pub struct UpdatedPlan {
    pub plan: PlanOutput,
    pub summary: String,
}

impl TripPlanner {
    /// Regenerate a plan per an edit instruction
    ///
    /// Without a previous plan the instruction is used verbatim and a plan
    /// is synthesized from the parameters alone. With one, the previous
    /// plan is serialized into the instruction and threaded through so the
    /// result's `changes` reflect the delta.
    pub async fn update_trip_plan(&self, req: &UpdateRequest) -> Result<UpdatedPlan, UpdateError> {
        let params = req.plan_req.as_ref().ok_or(UpdateError::MissingParams)?;

        info!(
            destination = %params.destination,
            has_current_plan = req.current_plan.is_some(),
            "updating trip plan"
        );

        let edit_instruction = match &req.current_plan {
            Some(plan) => {
                let plan_json = serde_json::to_string(plan)
                    .map_err(|e| UpdateError::Generation(e.into()))?;
                format!(
                    "Update the current plan according to the following instruction:\n{}\n\nCurrent plan:\n{}",
                    req.prompt, plan_json,
                )
            }
            None => req.prompt.clone(),
        };

        let plan = self
            .generate_trip_plan(params, Some(&edit_instruction), req.current_plan.as_ref())
            .await?;

        let summary = render_summary(&plan);

        Ok(UpdatedPlan { plan, summary })
    }
}

/// Render a deterministic textual summary of a plan
pub fn render_summary(plan: &PlanOutput) -> String {
    let total = plan.estimate.total.unwrap_or_else(|| plan.estimate.component_sum());

    let mut out = String::new();
    out.push_str(&format!(
        "Trip plan: {} day(s), estimated total {}, {} tip(s)\n",
        plan.itinerary.len(),
        total,
        plan.tips.len(),
    ));

    for day in &plan.itinerary {
        out.push_str(&format!("Day {} ({} item(s)):\n", day.day, day.items.len()));
        for item in &day.items {
            out.push_str(&format!("  - {} {} [{}]\n", item.time, item.name, item.kind));
        }
    }

    if !plan.tips.is_empty() {
        out.push_str("Tips:\n");
        for tip in &plan.tips {
            out.push_str(&format!("  - {}\n", tip));
        }
    }

    if let Some(extra) = &plan.extra_info {
        if !extra.changes.is_empty() {
            out.push_str("Changes:\n");
            for change in &extra.changes {
                out.push_str(&format!("  - {}\n", change));
            }
        }
        if !extra.best_time_to_visit.is_empty() {
            out.push_str("Best times:\n");
            for (name, time) in &extra.best_time_to_visit {
                out.push_str(&format!("  - {}: {}\n", name, time));
            }
        }
        if !extra.tickets.is_empty() {
            out.push_str("Tickets:\n");
            for (name, cost) in &extra.tickets {
                out.push_str(&format!("  - {}: {}\n", name, cost));
            }
        }
    }

    out
}
