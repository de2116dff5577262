//! Prompt construction
//!
//! Assembles the single structured instruction handed to the model from the
//! traveler request, the retrieved support context, and the schema contract.

use handlebars::{Handlebars, RenderError, no_escape};
use serde::Serialize;
use tracing::debug;

mod embedded;

pub use embedded::{OUTPUT_SCHEMA, PLAN_INSTRUCTION};

/// Context for rendering the instruction template
#[derive(Debug, Serialize)]
struct InstructionContext<'a> {
    user_request: &'a str,
    support: &'a str,
    output_schema: &'a str,
}

/// Renders the plan-generation instruction
///
/// Stateless: same inputs, same instruction.
pub struct PromptBuilder {
    hbs: Handlebars<'static>,
}

impl PromptBuilder {
    /// Create a builder over the embedded templates
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        // Context values carry raw JSON; HTML escaping would corrupt them
        hbs.register_escape_fn(no_escape);
        Self { hbs }
    }

    /// Build the full instruction for one generation call
    pub fn build_instruction(&self, user_request: &str, support: &str) -> Result<String, RenderError> {
        debug!(
            request_len = user_request.len(),
            support_len = support.len(),
            "build_instruction: called"
        );
        let context = InstructionContext {
            user_request,
            support,
            output_schema: OUTPUT_SCHEMA,
        };
        self.hbs.render_template(PLAN_INSTRUCTION, &context)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
