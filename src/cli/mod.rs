//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::jira::ReportFormat;

pub mod commands;

/// mytodo - a task list with Jira Epic tracking
#[derive(Parser, Debug)]
#[command(name = "mytodo", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Task list path (default: ./.mytodo.json if present, else ~/.mytodo.json)
    #[arg(long, global = true, env = "MYTODO_FILE")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task (turned into a task list by the LLM agent when one is configured)
    Add {
        /// Task text; read from stdin when omitted
        text: Vec<String>,

        /// Add the text as a single task without asking the agent
        #[arg(long)]
        plain: bool,

        /// Accept the agent's first proposal without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// List all tasks
    List {
        /// Ask the LLM agent for a one-sentence summary
        #[arg(short, long)]
        summary: bool,
    },

    /// Remove a task
    Remove {
        /// Task number as shown by `list`
        index: usize,
    },

    /// Mark a task as completed
    Done {
        /// Task number as shown by `list`
        index: usize,
    },

    /// Mark a task as pending again
    Undone {
        /// Task number as shown by `list`
        index: usize,
    },

    /// Replace a task's text
    Edit {
        /// Task number as shown by `list`
        index: usize,

        /// New task text
        content: String,
    },

    /// Comment on a task
    #[command(alias = "comment")]
    Cm {
        /// Task number as shown by `list`
        index: usize,

        /// Comment text
        comment: String,
    },

    /// Build a weighted progress report for a Jira Epic
    JiraEpicTracker {
        /// Epic issue key (e.g. PROJ-123)
        epic: String,

        /// Report format
        #[arg(long, value_enum, default_value_t)]
        format: ReportFormat,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Publish the report to this Quip document URL
        #[arg(long)]
        quip: Option<String>,
    },

    /// Summarize every epic in JIRA_PROJECT_KEY
    JiraSummary {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Create an issue in JIRA_PROJECT_KEY
    JiraCreate {
        /// Issue summary
        #[arg(long)]
        summary: String,

        /// Issue description
        #[arg(short, long)]
        description: Option<String>,

        /// Labels (can specify multiple: -l bug -l backend)
        #[arg(short, long = "label")]
        labels: Vec<String>,

        /// Issue type name
        #[arg(long, default_value = "Task")]
        issue_type: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
