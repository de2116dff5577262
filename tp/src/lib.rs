//! Tripplanner - RAG-backed travel itinerary planning service
//!
//! Turns a structured travel request into a multi-day itinerary by
//! orchestrating a language-model call augmented with retrieved reference
//! documents and live points-of-interest data, then validating and
//! repairing the model's JSON output against a fixed schema.
//!
//! # Modules
//!
//! - [`schema`] - Shared data contracts (Item, Day, Estimate, PlanOutput)
//! - [`retrieval`] - Places lookup, vector index, and the support-context augmentor
//! - [`prompts`] - Instruction assembly from request + context + schema
//! - [`planner`] - Generation pipeline, repair pass, and update orchestration
//! - [`llm`] - LLM client trait and the chat-completions implementation
//! - [`server`] - HTTP routing layer
//! - [`config`] - Configuration types and loading

pub mod cli;
pub mod config;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod retrieval;
pub mod schema;
pub mod server;

// Re-export commonly used types
pub use config::{Config, IndexConfig, LlmConfig, PlacesConfig, ServerConfig};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAiClient, create_client};
pub use planner::{
    GenerationError, TripPlanner, TripRequest, UpdateError, UpdateRequest, UpdatedPlan, render_summary,
};
pub use prompts::PromptBuilder;
pub use retrieval::{
    DocumentIndex, NearbyPlace, PineconeIndex, PlacesProvider, RapidApiPlaces, RetrievalAugmentor, RetrievalError,
};
pub use schema::{Day, EstCost, Estimate, ExtraInfo, Item, PlanOutput};
pub use server::{AppState, router};
