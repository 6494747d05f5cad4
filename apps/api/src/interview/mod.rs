// Interview engine: question sourcing, answer scoring, session aggregation,
// and the session state machine that drives them.
// All LLM calls go through llm_client, no direct Anthropic calls here.

pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod report;
pub mod scoring;
pub mod session;
