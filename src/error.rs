//! Error types for the mytodo CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (3=not_found, 4=validation, 6=remote, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for `--json` consumers

use thiserror::Error;

use crate::jira::JiraError;

/// Result type alias for mytodo operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Not Found (exit 3)
    TaskNotFound,
    EmptyTaskList,
    RemoteNotFound,

    // Validation (exit 4)
    InvalidArgument,

    // Remote service (exit 6)
    RemoteTransport,
    RemoteService,
    RemoteDecode,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // LLM agent (exit 9)
    LlmError,

    // Document publishing (exit 10)
    PublishError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::EmptyTaskList => "EMPTY_TASK_LIST",
            Self::RemoteNotFound => "REMOTE_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::RemoteTransport => "REMOTE_TRANSPORT",
            Self::RemoteService => "REMOTE_SERVICE",
            Self::RemoteDecode => "REMOTE_DECODE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::LlmError => "LLM_ERROR",
            Self::PublishError => "PUBLISH_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::TaskNotFound | Self::EmptyTaskList | Self::RemoteNotFound => 3,
            Self::InvalidArgument => 4,
            Self::RemoteTransport | Self::RemoteService | Self::RemoteDecode => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
            Self::LlmError => 9,
            Self::PublishError => 10,
        }
    }

    /// Whether retrying the same command could succeed.
    ///
    /// True for validation errors and transient remote failures.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument | Self::TaskNotFound | Self::RemoteTransport
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in mytodo operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Task not found: #{index} (list has {count} tasks)")]
    TaskNotFound { index: usize, count: usize },

    #[error("The task list is empty")]
    EmptyTaskList,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Jira(#[from] JiraError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            Self::EmptyTaskList => ErrorCode::EmptyTaskList,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Jira(err) => match err {
                JiraError::NotFound { .. } => ErrorCode::RemoteNotFound,
                JiraError::Transport(_) => ErrorCode::RemoteTransport,
                JiraError::RemoteService { .. } => ErrorCode::RemoteService,
                JiraError::Decode(_) => ErrorCode::RemoteDecode,
                JiraError::InvalidQuery(_) => ErrorCode::InvalidArgument,
            },
            Self::Llm(_) => ErrorCode::LlmError,
            Self::Publish(_) => ErrorCode::PublishError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::TaskNotFound { count, .. } => Some(if *count == 0 {
                "The list is empty. Add one with `mytodo add \"task\"`.".to_string()
            } else {
                format!(
                    "Valid task numbers are 0..={}. Use `mytodo list` to see them.",
                    count - 1
                )
            }),

            Self::EmptyTaskList => Some("Add a task first: mytodo add \"task\"".to_string()),

            Self::Config(msg) => {
                if msg.contains("JIRA") {
                    Some(
                        "Set JIRA_URL, JIRA_EMAIL and JIRA_TOKEN (and JIRA_PROJECT_KEY for \
                         project-wide commands)"
                            .to_string(),
                    )
                } else if msg.contains("QUIP") {
                    Some("Set QUIP_TOKEN to publish to Quip documents".to_string())
                } else if msg.contains("agent") {
                    Some("Set USE_AI=1 (Ollama) or OPEN_AI_API_KEY (OpenAI)".to_string())
                } else {
                    None
                }
            }

            Self::Jira(JiraError::NotFound { key }) => Some(format!(
                "No issue '{key}' is visible with these credentials. Check the key and JIRA_URL."
            )),
            Self::Jira(JiraError::RemoteService { status, .. }) if *status == 401 || *status == 403 => {
                Some("Authentication was rejected. Check JIRA_EMAIL and JIRA_TOKEN.".to_string())
            }
            Self::Jira(JiraError::Transport(_)) => {
                Some("Could not reach the tracker. Check JIRA_URL and your network.".to_string())
            }

            Self::Jira(_)
            | Self::InvalidArgument(_)
            | Self::Llm(_)
            | Self::Publish(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
