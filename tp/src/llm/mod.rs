//! LLM client module
//!
//! Provides the completion trait the planner calls and the
//! OpenAI-compatible implementation used in production.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

mod error;
mod openai;
mod types;

pub use error::LlmError;
pub use openai::OpenAiClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, TokenUsage};

use crate::config::LlmConfig;

/// A generative language model the planner can invoke
///
/// The production implementation talks to a chat-completions endpoint;
/// tests substitute fakes so no network access is needed.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion request to completion and return the response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Create an LLM client from configuration
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(model = %config.model, "create_client: called");
    Ok(Arc::new(OpenAiClient::from_config(config)?))
}
