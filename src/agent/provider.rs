//! LLM agent trait.
//!
//! Defines the interface every LLM backend implements.
//! Uses async methods since all backends are HTTP-based.

use std::future::Future;
use std::pin::Pin;

use super::response::LlmResponse;
use crate::error::Result;

/// Backend metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInfo {
    pub name: String,
    pub model: String,
}

/// Trait for LLM agents.
///
/// Implemented by the Ollama and OpenAI agents.
pub trait LlmAgent: Send + Sync {
    /// Get agent metadata.
    fn info(&self) -> AgentInfo;

    /// Send a prompt and return the model's answer.
    fn prompt(&self, prompt: &str) -> impl Future<Output = Result<LlmResponse>> + Send;
}

/// Boxed agent for dynamic dispatch.
///
/// The trait's `impl Future` methods are not object-safe, so this wrapper
/// provides runtime polymorphism.
pub struct BoxedAgent {
    inner: Box<dyn LlmAgentBoxed + Send + Sync>,
}

/// Object-safe version of `LlmAgent` for boxing.
pub trait LlmAgentBoxed: Send + Sync {
    fn info(&self) -> AgentInfo;
    fn prompt_boxed(&self, prompt: &str) -> Pin<Box<dyn Future<Output = Result<LlmResponse>> + Send + '_>>;
}

impl BoxedAgent {
    /// Create a new boxed agent.
    pub fn new<A: LlmAgent + 'static>(agent: A) -> Self {
        Self {
            inner: Box::new(BoxedAgentWrapper(agent)),
        }
    }

    /// Get agent metadata.
    #[must_use]
    pub fn info(&self) -> AgentInfo {
        self.inner.info()
    }

    /// Send a prompt and return the model's answer.
    ///
    /// # Errors
    ///
    /// Returns `Error::Llm` if the backend request fails.
    pub async fn prompt(&self, prompt: &str) -> Result<LlmResponse> {
        self.inner.prompt_boxed(prompt).await
    }
}

impl std::fmt::Debug for BoxedAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let info = self.info();
        f.debug_struct("BoxedAgent")
            .field("name", &info.name)
            .field("model", &info.model)
            .finish()
    }
}

/// Wrapper to implement `LlmAgentBoxed` for any `LlmAgent`.
struct BoxedAgentWrapper<A: LlmAgent + 'static>(A);

impl<A: LlmAgent + 'static> LlmAgentBoxed for BoxedAgentWrapper<A> {
    fn info(&self) -> AgentInfo {
        self.0.info()
    }

    fn prompt_boxed(&self, prompt: &str) -> Pin<Box<dyn Future<Output = Result<LlmResponse>> + Send + '_>> {
        // Owned copy so the future does not borrow the caller's string.
        let prompt = prompt.to_string();
        Box::pin(async move { self.0.prompt(&prompt).await })
    }
}
