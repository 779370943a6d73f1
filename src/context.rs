//! Per-process application context.
//!
//! Built once in `main` from flags and environment, then passed by
//! reference into every command handler.

use std::path::{Path, PathBuf};

use crate::agent::{create_agent, BoxedAgent};
use crate::config::{resolve_task_file, AgentSettings, JiraSettings, QuipSettings};
use crate::error::{Error, Result};

/// Everything a command handler needs besides its own arguments.
#[derive(Debug)]
pub struct AppContext {
    pub task_file: PathBuf,
    /// Emit machine-readable JSON instead of human output.
    pub json: bool,
    pub quiet: bool,
    /// LLM agent, when one is enabled.
    pub agent: Option<BoxedAgent>,
    /// Settings only Jira and Quip commands need; a resolution failure is
    /// kept as its message and reported when a command asks for them.
    jira: std::result::Result<JiraSettings, String>,
    quip: std::result::Result<QuipSettings, String>,
}

impl AppContext {
    /// Resolve all settings from the environment and construct the LLM agent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no task file location can be determined.
    pub fn from_env(explicit_file: Option<&Path>, json: bool, quiet: bool) -> Result<Self> {
        Ok(Self {
            task_file: resolve_task_file(explicit_file)?,
            json,
            quiet,
            agent: create_agent(&AgentSettings::from_env()),
            jira: JiraSettings::from_env().map_err(|e| config_message(&e)),
            quip: QuipSettings::from_env().map_err(|e| config_message(&e)),
        })
    }

    /// Build a context from already-resolved parts.
    #[must_use]
    pub fn new(
        task_file: PathBuf,
        agent: Option<BoxedAgent>,
        jira: Option<JiraSettings>,
        quip: Option<QuipSettings>,
    ) -> Self {
        Self {
            task_file,
            json: false,
            quiet: false,
            agent,
            jira: jira.ok_or_else(|| "missing JIRA_URL, JIRA_TOKEN".to_string()),
            quip: quip.ok_or_else(|| "missing QUIP_TOKEN".to_string()),
        }
    }

    /// # Errors
    ///
    /// Returns `Error::Config` naming the missing variables.
    pub fn jira_settings(&self) -> Result<&JiraSettings> {
        self.jira.as_ref().map_err(|msg| Error::Config(msg.clone()))
    }

    /// # Errors
    ///
    /// Returns `Error::Config` when `QUIP_TOKEN` is missing.
    pub fn quip_settings(&self) -> Result<&QuipSettings> {
        self.quip.as_ref().map_err(|msg| Error::Config(msg.clone()))
    }

    /// The LLM agent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when no agent is enabled.
    pub fn require_agent(&self) -> Result<&BoxedAgent> {
        self.agent
            .as_ref()
            .ok_or_else(|| Error::Config("no LLM agent configured".into()))
    }
}

fn config_message(err: &Error) -> String {
    match err {
        Error::Config(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_reported_on_use() {
        let ctx = AppContext::new(PathBuf::from("tasks.json"), None, None, None);

        let err = ctx.jira_settings().unwrap_err();
        assert!(err.to_string().contains("JIRA_URL"));
        assert!(ctx.quip_settings().unwrap_err().to_string().contains("QUIP_TOKEN"));

        let err = ctx.require_agent().unwrap_err();
        assert!(err.hint().unwrap().contains("USE_AI"));
    }
}
