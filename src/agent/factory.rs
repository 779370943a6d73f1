//! Agent factory.

use tracing::debug;

use super::ollama::OllamaAgent;
use super::openai::OpenAiAgent;
use super::provider::BoxedAgent;
use crate::config::{AgentKind, AgentSettings};

/// Create the configured agent, or `None` when no agent is enabled.
///
/// Priority:
/// 1. OpenAI when an API key is set
/// 2. Ollama when `USE_AI` is set
#[must_use]
pub fn create_agent(settings: &AgentSettings) -> Option<BoxedAgent> {
    let agent = match settings.kind? {
        AgentKind::OpenAi => {
            let key = settings.openai_key.clone()?;
            BoxedAgent::new(OpenAiAgent::with_config(
                key,
                Some(settings.openai_base_url.clone()),
                Some(settings.openai_model.clone()),
            ))
        }
        AgentKind::Ollama => BoxedAgent::new(OllamaAgent::with_config(
            Some(settings.ollama_endpoint.clone()),
            Some(settings.ollama_model.clone()),
        )),
    };

    let info = agent.info();
    debug!(agent = %info.name, model = %info.model, "LLM agent enabled");
    Some(agent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> AgentSettings {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AgentSettings::from_lookup(|name| {
            pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn test_no_agent_by_default() {
        assert!(create_agent(&settings(&[])).is_none());
    }

    #[test]
    fn test_ollama_agent() {
        let agent = create_agent(&settings(&[("USE_AI", "yes"), ("OLLAMA_MODEL", "llama3")])).unwrap();
        assert_eq!(agent.info().name, "ollama");
        assert_eq!(agent.info().model, "llama3");
    }

    #[test]
    fn test_openai_preferred() {
        let agent = create_agent(&settings(&[("USE_AI", "1"), ("OPEN_AI_API_KEY", "sk")])).unwrap();
        assert_eq!(agent.info().name, "openai");
    }
}
