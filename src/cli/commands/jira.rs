//! Jira command implementations.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

use super::{block_on, confirm};
use crate::context::AppContext;
use crate::error::{Error, Result};
use crate::jira::{
    generate_tracker, summarize_project, EpicSummary, IssueSource, JiraClient, NewIssue,
    ReportFormat, TrackerReport,
};
use crate::quip::{extract_thread_id, QuipClient};

#[derive(Serialize)]
struct SummaryOutput<'a> {
    project: &'a str,
    epics: &'a [EpicSummary],
}

#[derive(Serialize)]
struct CreateOutput<'a> {
    key: &'a str,
}

/// Build, print, and optionally save or publish the tracker for `epic_key`.
///
/// # Errors
///
/// Returns `Error::Config` when Jira (or, with `quip_url`, Quip) is not
/// configured, a remote error when discovery fails as a whole, or an
/// I/O or publish error from the follow-up steps.
pub fn execute_tracker(
    ctx: &AppContext,
    epic_key: &str,
    format: ReportFormat,
    output: Option<&Path>,
    quip_url: Option<&str>,
) -> Result<()> {
    let settings = ctx.jira_settings()?;
    let epic_key = epic_key.trim();
    if epic_key.is_empty() {
        return Err(Error::InvalidArgument("epic key must not be empty".into()));
    }

    // Resolve the publish target before doing any remote work.
    let publish = match quip_url {
        Some(url) => Some((QuipClient::new(ctx.quip_settings()?), extract_thread_id(url)?)),
        None => None,
    };

    if !ctx.quiet && !ctx.json {
        eprintln!("Fetching epic {epic_key} and linked issues...");
    }

    block_on(async {
        let client = JiraClient::new(&settings.base_url, settings.credentials())?;
        let report = generate_tracker(&client, &settings.discovery, epic_key, format).await?;

        if ctx.json {
            println!("{}", serde_json::to_string(&report)?);
        } else if !ctx.quiet {
            print_discovery(&report);
        }

        if report.rows.is_empty() {
            if !ctx.json {
                println!("No issues related to this epic");
            }
            return Ok(());
        }

        if !ctx.json {
            print!("{}", report.text);
        }

        if let Some(path) = output {
            fs::write(path, &report.text)?;
            info!(path = %path.display(), "Wrote tracker report");
            if !ctx.quiet && !ctx.json {
                eprintln!("Report written to {}", path.display());
            }
        }

        if let Some((quip, thread_id)) = &publish {
            quip.publish_report(thread_id, &report.epic_key, &report.text).await?;
            if !ctx.quiet && !ctx.json {
                eprintln!("Published to Quip document {thread_id}");
            }
        }

        Ok(())
    })
}

/// Strategy outcomes and issue-type counts, on stderr so stdout stays the report.
fn print_discovery(report: &TrackerReport) {
    for outcome in &report.outcomes {
        match &outcome.error {
            Some(err) => eprintln!("  {} ({}): failed: {err}", outcome.strategy, outcome.query),
            None => eprintln!(
                "  {} ({}): {} found, {} new",
                outcome.strategy, outcome.query, outcome.found, outcome.added
            ),
        }
    }

    if report.rows.is_empty() {
        return;
    }

    let breakdown: Vec<String> = report
        .type_breakdown
        .iter()
        .map(|(issue_type, count)| format!("{count} {issue_type}"))
        .collect();
    let name = if report.epic_name.is_empty() {
        String::new()
    } else {
        format!(" ({})", report.epic_name)
    };
    eprintln!(
        "Found {} issues for {}{name}: {}\n",
        report.rows.len(),
        report.epic_key,
        breakdown.join(", ")
    );
}

/// Print progress for every epic in the configured project.
///
/// # Errors
///
/// Returns `Error::Config` when Jira or `JIRA_PROJECT_KEY` is not configured,
/// or a remote error from the epic listing or any epic's discovery.
pub fn execute_summary(ctx: &AppContext, yes: bool) -> Result<()> {
    let settings = ctx.jira_settings()?;
    let project = settings.require_project_key()?;

    if !yes && !confirm(&format!("Summarize Jira project {project}?"))? {
        return Ok(());
    }

    let summaries = block_on(async {
        let client = JiraClient::new(&settings.base_url, settings.credentials())?;
        Ok(summarize_project(&client, &settings.discovery, project).await?)
    })?;

    if ctx.json {
        let output = SummaryOutput {
            project,
            epics: &summaries,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    println!("Project {project} has {} epics", summaries.len());
    for epic in &summaries {
        println!("\nEpic {}: {}", epic.key, epic.name);
        println!(
            "  {} issues: {} done, {} pending",
            epic.issues, epic.done, epic.pending
        );
        println!("  Est. total: {:.1}", epic.total_estimate);
    }
    Ok(())
}

/// Create an issue in the configured project and print its key.
///
/// # Errors
///
/// Returns `InvalidArgument` for a blank summary, `Error::Config` when Jira
/// or `JIRA_PROJECT_KEY` is not configured, or the remote error.
pub fn execute_create(
    ctx: &AppContext,
    summary: &str,
    description: Option<&str>,
    labels: &[String],
    issue_type: &str,
    yes: bool,
) -> Result<()> {
    let summary = summary.trim();
    if summary.is_empty() {
        return Err(Error::InvalidArgument("issue summary must not be empty".into()));
    }
    let settings = ctx.jira_settings()?;
    let project = settings.require_project_key()?;

    let issue = NewIssue {
        project_key: project.to_string(),
        summary: summary.to_string(),
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ToString::to_string),
        issue_type: issue_type.trim().to_string(),
        labels: labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect(),
    };

    if !yes && !confirm(&format!("Create {} \"{summary}\" in {project}?", issue.issue_type))? {
        return Ok(());
    }

    let key = block_on(async {
        let client = JiraClient::new(&settings.base_url, settings.credentials())?;
        Ok(client.create_issue(&issue).await?)
    })?;
    info!(key = %key, "Created issue");

    if ctx.json {
        println!("{}", serde_json::to_string(&CreateOutput { key: &key })?);
    } else if ctx.quiet {
        println!("{key}");
    } else {
        println!("Created {key}");
    }
    Ok(())
}
