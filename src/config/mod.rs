//! Configuration management.
//!
//! All settings come from environment variables, resolved once at process
//! start and carried in [`crate::context::AppContext`]. Every resolver has a
//! `from_lookup` form taking a variable lookup closure so the parsing rules
//! can be tested without touching the process environment.
//!
//! Resolution order for each value: explicit flag (where one exists) >
//! environment variable > built-in default.

use secrecy::SecretString;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result};
use crate::jira::{
    Credentials, DiscoveryOptions, FieldProfile, DEFAULT_EPIC_LINK_FIELDS, DEFAULT_ESTIMATE_FIELDS,
    DEFAULT_EXPECTED_DATE_FIELD, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

/// Task list file name, used both in the working directory and in `$HOME`.
pub const TASK_FILE_NAME: &str = ".mytodo.json";

pub const DEFAULT_QUIP_BASE_URL: &str = "https://platform.quip.com/1";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "gpt-oss:20b";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Read a process environment variable, treating empty values as unset.
#[must_use]
pub fn env_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Split a comma-separated list, dropping blank entries.
#[must_use]
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_page_size(value: Option<&str>) -> usize {
    match value.map(str::parse::<usize>) {
        None => DEFAULT_PAGE_SIZE,
        Some(Ok(size)) => size.clamp(1, MAX_PAGE_SIZE),
        Some(Err(e)) => {
            warn!(value = ?value, error = %e, "Ignoring invalid JIRA_PAGE_SIZE");
            DEFAULT_PAGE_SIZE
        }
    }
}

fn defaults(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

// ── Jira ──────────────────────────────────────────────────────

/// Connection and discovery settings for the issue tracker.
#[derive(Debug, Clone)]
pub struct JiraSettings {
    pub base_url: String,
    /// Basic-auth user; when absent the token is sent as a bearer token.
    pub email: Option<String>,
    pub token: SecretString,
    pub project_key: Option<String>,
    pub discovery: DiscoveryOptions,
}

impl JiraSettings {
    /// Resolve from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the missing variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    /// Resolve using `lookup` for variable values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when `JIRA_URL` or `JIRA_TOKEN` is missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| non_empty(lookup(name));

        let base_url = get("JIRA_URL");
        let token = get("JIRA_TOKEN");
        let (Some(base_url), Some(token)) = (base_url, token) else {
            let missing: Vec<&str> = [("JIRA_URL", get("JIRA_URL")), ("JIRA_TOKEN", get("JIRA_TOKEN"))]
                .into_iter()
                .filter(|(_, v)| v.is_none())
                .map(|(name, _)| name)
                .collect();
            return Err(Error::Config(format!("missing {}", missing.join(", "))));
        };

        let epic_link_fields = get("JIRA_EPIC_LINK_FIELDS")
            .map(|v| parse_list(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| defaults(DEFAULT_EPIC_LINK_FIELDS));
        let estimate_fields = get("JIRA_ESTIMATE_FIELDS")
            .map(|v| parse_list(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| defaults(DEFAULT_ESTIMATE_FIELDS));
        let expected_date_field =
            get("JIRA_EXPECTED_DATE_FIELD").unwrap_or_else(|| DEFAULT_EXPECTED_DATE_FIELD.to_string());

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            email: get("JIRA_EMAIL"),
            token: SecretString::from(token),
            project_key: get("JIRA_PROJECT_KEY"),
            discovery: DiscoveryOptions {
                profile: FieldProfile {
                    estimate_fields,
                    expected_date_field,
                },
                epic_link_fields,
                page_size: parse_page_size(get("JIRA_PAGE_SIZE").as_deref()),
            },
        })
    }

    /// Credentials for the HTTP client.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        match &self.email {
            Some(email) => Credentials::Basic {
                email: email.clone(),
                token: self.token.clone(),
            },
            None => Credentials::Bearer(self.token.clone()),
        }
    }

    /// The configured project key.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when `JIRA_PROJECT_KEY` is not set.
    pub fn require_project_key(&self) -> Result<&str> {
        self.project_key
            .as_deref()
            .ok_or_else(|| Error::Config("missing JIRA_PROJECT_KEY".into()))
    }
}

// ── Quip ──────────────────────────────────────────────────────

/// Document-service settings.
#[derive(Debug, Clone)]
pub struct QuipSettings {
    pub token: SecretString,
    pub base_url: String,
}

impl QuipSettings {
    /// Resolve from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when `QUIP_TOKEN` is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    /// Resolve using `lookup` for variable values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when `QUIP_TOKEN` is missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = non_empty(lookup("QUIP_TOKEN"))
            .ok_or_else(|| Error::Config("missing QUIP_TOKEN".into()))?;
        let base_url = non_empty(lookup("QUIP_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_QUIP_BASE_URL.to_string());

        Ok(Self {
            token: SecretString::from(token),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

// ── LLM agent ─────────────────────────────────────────────────

/// Which LLM backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    OpenAi,
    Ollama,
}

/// LLM agent settings. `kind` is `None` when no agent is enabled.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub kind: Option<AgentKind>,
    pub ollama_endpoint: String,
    pub ollama_model: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_key: Option<SecretString>,
}

impl AgentSettings {
    /// Resolve from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(env_var)
    }

    /// Resolve using `lookup` for variable values.
    ///
    /// OpenAI wins when `OPEN_AI_API_KEY` is set; otherwise `USE_AI` enables Ollama.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| non_empty(lookup(name));

        let openai_key = get("OPEN_AI_API_KEY").map(SecretString::from);
        let kind = if openai_key.is_some() {
            Some(AgentKind::OpenAi)
        } else if get("USE_AI").is_some() {
            Some(AgentKind::Ollama)
        } else {
            None
        };

        Self {
            kind,
            ollama_endpoint: get("OLLAMA_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            ollama_model: get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_key,
        }
    }
}

// ── Task file ─────────────────────────────────────────────────

/// Resolve the task list path.
///
/// Priority:
/// 1. `explicit_path` (`--file` or `MYTODO_FILE`)
/// 2. `./.mytodo.json` if it exists
/// 3. `~/.mytodo.json`
///
/// # Errors
///
/// Returns `Error::Config` if the home directory cannot be determined.
pub fn resolve_task_file(explicit_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(path.to_path_buf());
    }

    let local = PathBuf::from(TASK_FILE_NAME);
    if local.exists() {
        return Ok(local);
    }

    directories::BaseDirs::new()
        .map(|b| b.home_dir().join(TASK_FILE_NAME))
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_jira_settings_defaults() {
        let settings = JiraSettings::from_lookup(lookup(&[
            ("JIRA_URL", "https://acme.atlassian.net/"),
            ("JIRA_EMAIL", "dev@acme.test"),
            ("JIRA_TOKEN", "tok"),
        ]))
        .unwrap();

        assert_eq!(settings.base_url, "https://acme.atlassian.net");
        assert_eq!(settings.token.expose_secret(), "tok");
        assert!(settings.project_key.is_none());
        assert_eq!(
            settings.discovery.epic_link_fields,
            vec!["\"Epic Link\"", "cf[10014]", "cf[10008]"]
        );
        assert_eq!(
            settings.discovery.profile.estimate_fields,
            vec!["customfield_10013", "customfield_10016"]
        );
        assert_eq!(settings.discovery.page_size, 100);
        assert!(matches!(settings.credentials(), Credentials::Basic { .. }));
    }

    #[test]
    fn test_jira_settings_overrides() {
        let settings = JiraSettings::from_lookup(lookup(&[
            ("JIRA_URL", "https://jira.internal"),
            ("JIRA_TOKEN", "pat"),
            ("JIRA_PROJECT_KEY", "OPS"),
            ("JIRA_EPIC_LINK_FIELDS", " cf[12345] , ,\"Epic Link\""),
            ("JIRA_ESTIMATE_FIELDS", "customfield_20000"),
            ("JIRA_EXPECTED_DATE_FIELD", "duedate"),
            ("JIRA_PAGE_SIZE", "500"),
        ]))
        .unwrap();

        assert_eq!(settings.discovery.epic_link_fields, vec!["cf[12345]", "\"Epic Link\""]);
        assert_eq!(settings.discovery.profile.estimate_fields, vec!["customfield_20000"]);
        assert_eq!(settings.discovery.profile.expected_date_field, "duedate");
        assert_eq!(settings.discovery.page_size, 100);
        assert_eq!(settings.require_project_key().unwrap(), "OPS");
        assert!(matches!(settings.credentials(), Credentials::Bearer(_)));
    }

    #[test]
    fn test_jira_settings_missing() {
        let err = JiraSettings::from_lookup(lookup(&[("JIRA_EMAIL", "x")])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("JIRA_URL"));
        assert!(message.contains("JIRA_TOKEN"));
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_page_size_parsing() {
        assert_eq!(parse_page_size(None), 100);
        assert_eq!(parse_page_size(Some("0")), 1);
        assert_eq!(parse_page_size(Some("25")), 25);
        assert_eq!(parse_page_size(Some("many")), 100);
    }

    #[test]
    fn test_quip_settings() {
        assert!(QuipSettings::from_lookup(lookup(&[])).is_err());
        let settings = QuipSettings::from_lookup(lookup(&[("QUIP_TOKEN", "q")])).unwrap();
        assert_eq!(settings.base_url, "https://platform.quip.com/1");
    }

    #[test]
    fn test_agent_selection() {
        assert_eq!(AgentSettings::from_lookup(lookup(&[])).kind, None);
        assert_eq!(
            AgentSettings::from_lookup(lookup(&[("USE_AI", "1")])).kind,
            Some(AgentKind::Ollama)
        );
        let both = AgentSettings::from_lookup(lookup(&[("USE_AI", "1"), ("OPEN_AI_API_KEY", "sk")]));
        assert_eq!(both.kind, Some(AgentKind::OpenAi));
        assert_eq!(both.openai_model, "gpt-4.1");
        assert_eq!(both.ollama_model, "gpt-oss:20b");
    }

    #[test]
    fn test_resolve_task_file_explicit() {
        let explicit = PathBuf::from("/tmp/custom-tasks.json");
        assert_eq!(resolve_task_file(Some(&explicit)).unwrap(), explicit);
    }
}
