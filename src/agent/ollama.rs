//! Ollama agent.
//!
//! Uses a local Ollama server's non-streaming generate endpoint.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::{AgentInfo, LlmAgent};
use super::response::LlmResponse;
use crate::config::{DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL};
use crate::error::{Error, Result};

/// Ollama agent.
pub struct OllamaAgent {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaAgent {
    /// Create an agent with the default endpoint and model.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(None, None)
    }

    /// Create an agent with a custom endpoint and/or model.
    #[must_use]
    pub fn with_config(endpoint: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint
                .unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        }
    }
}

impl Default for OllamaAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// Ollama generate request.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Ollama generate response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl LlmAgent for OllamaAgent {
    fn info(&self) -> AgentInfo {
        AgentInfo {
            name: "ollama".to_string(),
            model: self.model.clone(),
        }
    }

    async fn prompt(&self, prompt: &str) -> Result<LlmResponse> {
        let url = format!("{}/api/generate", self.endpoint);
        debug!(model = %self.model, chars = prompt.len(), "Prompting Ollama");

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("Ollama request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("Ollama returned HTTP {status}: {body}")));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("Failed to parse Ollama response: {e}")))?;

        Ok(LlmResponse::new(data.response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_agent_defaults() {
        let info = OllamaAgent::new().info();
        assert_eq!(info.name, "ollama");
        assert_eq!(info.model, "gpt-oss:20b");
    }

    #[test]
    fn test_ollama_agent_custom_config() {
        let agent = OllamaAgent::with_config(
            Some("http://gpu-box:11434/".to_string()),
            Some("llama3".to_string()),
        );
        assert_eq!(agent.endpoint, "http://gpu-box:11434");
        assert_eq!(agent.info().model, "llama3");
    }

    #[test]
    fn test_generate_request_shape() {
        let body = serde_json::to_value(GenerateRequest {
            model: "m",
            prompt: "p",
            stream: false,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "model": "m", "prompt": "p", "stream": false }));
    }
}
