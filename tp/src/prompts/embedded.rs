//! Embedded prompt templates
//!
//! The instruction template is a fixed contract string: its exact phrasing
//! controls downstream parse success rates, so it is compiled into the
//! binary rather than improvised per call.

/// Instruction template for plan generation
///
/// Rendered with `user_request`, `support`, and `output_schema`.
pub const PLAN_INSTRUCTION: &str = r#"You are TravelPlannerGPT, an expert travel planning assistant.

Your task: create a detailed plan for the trip, covering lodging, transport between sights, and activities.

Requirements:
- Respond with JSON that conforms exactly to the PlanOutput schema below. Do not wrap it in prose or code fences.
- Every item must carry `time`, `name`, `type`, `description`, and `est_cost`.
- `est_cost` is always an object with all three keys: accommodation, transportation, activity.
- Keep times and costs realistic and consistent with the stated budget.
- Prefer suggestions that match the traveler's preferences.

Traveler request:
{{user_request}}

Reference data (places, lodging, transport, guide excerpts):
{{support}}

Schema:
{{output_schema}}

Return only the JSON object, with no extra commentary."#;

/// Machine-readable description of the PlanOutput shape
///
/// The Rust analogue of the original parser's format instructions; kept as
/// one fixed string so every call describes the same contract.
pub const OUTPUT_SCHEMA: &str = r#"{
  "itinerary": [
    {
      "day": <integer, 1-based>,
      "date": <"YYYY-MM-DD" or null>,
      "items": [
        {
          "time": <"HH:MM" or free text>,
          "name": <string>,
          "type": <"activity" | "transport" | "lodging">,
          "description": <string>,
          "est_cost": {
            "accommodation": <non-negative integer>,
            "transportation": <non-negative integer>,
            "activity": <non-negative integer>
          }
        }
      ]
    }
  ],
  "tips": [<string>],
  "estimate": {
    "accommodation": <non-negative integer>,
    "transportation": <non-negative integer>,
    "activity": <non-negative integer>,
    "total": <non-negative integer or null>
  }
}"#;
