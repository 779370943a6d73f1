//! mytodo - a command-line task list with Jira Epic tracking
//!
//! This crate provides the core functionality for the `mytodo` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`context`] - Per-process context threaded through command handlers
//! - [`tasklist`] - Local JSON task list
//! - [`jira`] - Epic discovery and weighted progress reports
//! - [`quip`] - Publishing reports to Quip documents
//! - [`agent`] - LLM agents (Ollama, OpenAI)
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agent;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod jira;
pub mod quip;
pub mod tasklist;

pub use error::{Error, Result};

/// Escape a value for CSV output (wrap in quotes if it contains commas, quotes, or newlines).
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
