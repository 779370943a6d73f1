//! OpenAI agent (Responses API).

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::{AgentInfo, LlmAgent};
use super::response::LlmResponse;
use crate::config::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use crate::error::{Error, Result};

const MAX_OUTPUT_TOKENS: u32 = 512;
const TEMPERATURE: f32 = 0.7;

/// OpenAI agent.
pub struct OpenAiAgent {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl OpenAiAgent {
    /// Create an agent with the default base URL and model.
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        Self::with_config(api_key, None, None)
    }

    /// Create an agent with a custom base URL and/or model.
    #[must_use]
    pub fn with_config(api_key: SecretString, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            api_key,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

impl ResponsesResponse {
    /// Text of the first content part of the first output item.
    fn first_text(self) -> Option<String> {
        self.output
            .into_iter()
            .next()
            .and_then(|item| item.content.into_iter().next())
            .map(|part| part.text)
    }
}

impl LlmAgent for OpenAiAgent {
    fn info(&self) -> AgentInfo {
        AgentInfo {
            name: "openai".to_string(),
            model: self.model.clone(),
        }
    }

    async fn prompt(&self, prompt: &str) -> Result<LlmResponse> {
        let url = format!("{}/v1/responses", self.base_url);
        debug!(model = %self.model, chars = prompt.len(), "Prompting OpenAI");

        let request = ResponsesRequest {
            model: &self.model,
            input: prompt,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("OpenAI returned HTTP {status}: {body}")));
        }

        let data: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("Failed to parse OpenAI response: {e}")))?;

        data.first_text()
            .map(LlmResponse::new)
            .ok_or_else(|| Error::Llm("No output returned from OpenAI".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_agent_defaults() {
        let agent = OpenAiAgent::new(SecretString::from("sk-test"));
        assert_eq!(agent.base_url, "https://api.openai.com");
        assert_eq!(agent.info().model, "gpt-4.1");
    }

    #[test]
    fn test_first_text() {
        let data: ResponsesResponse = serde_json::from_str(
            r#"{"output":[{"type":"message","content":[{"type":"output_text","text":"hello"}]}]}"#,
        )
        .unwrap();
        assert_eq!(data.first_text().as_deref(), Some("hello"));

        let empty: ResponsesResponse = serde_json::from_str(r#"{"output":[]}"#).unwrap();
        assert!(empty.first_text().is_none());
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(ResponsesRequest {
            model: "gpt-4.1",
            input: "hi",
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: 0.5,
        })
        .unwrap();
        assert_eq!(body["max_output_tokens"], 512);
        assert_eq!(body["input"], "hi");
    }
}
