//! LLM agents.
//!
//! This module provides prompt/response access to language models:
//! - **Ollama**: local server (`USE_AI`)
//! - **OpenAI**: Responses API (`OPEN_AI_API_KEY`)
//!
//! # Architecture
//!
//! - `LlmAgent` trait with async `prompt`
//! - `BoxedAgent` for runtime backend selection
//! - `create_agent` picks the backend from `AgentSettings`
//! - `LlmResponse` / `extract_json_array` clean up model output

mod factory;
mod ollama;
mod openai;
mod provider;
mod response;

pub use factory::create_agent;
pub use ollama::OllamaAgent;
pub use openai::OpenAiAgent;
pub use provider::{AgentInfo, BoxedAgent, LlmAgent, LlmAgentBoxed};
pub use response::{extract_json_array, LlmResponse, NO_RESPONSE};
