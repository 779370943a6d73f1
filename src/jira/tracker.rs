//! Epic tracker generation: discovery, row extraction, rollup, rendering.

use chrono::Local;
use serde::Serialize;
use std::collections::BTreeMap;

use super::discover::{DiscoveryOptions, LinkageDiscoverer, StrategyOutcome};
use super::error::JiraResult;
use super::report::{rollup, ReportFormat, RollupSummary};
use super::row::{extract_row, TrackerRow};
use super::source::IssueSource;

/// A rendered tracker plus the data behind it.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerReport {
    pub epic_key: String,
    /// Epic summary; empty when the epic record could not be fetched.
    pub epic_name: String,
    pub rows: Vec<TrackerRow>,
    pub summary: RollupSummary,
    pub outcomes: Vec<StrategyOutcome>,
    /// Issue count per lowercased issue type.
    pub type_breakdown: BTreeMap<String, usize>,
    pub text: String,
}

/// Build the tracker report for `epic_key`.
///
/// Writing the text to a file or publishing it is left to the caller.
///
/// # Errors
///
/// Returns an error only when discovery fails as a whole.
pub async fn generate_tracker<S: IssueSource>(
    source: &S,
    options: &DiscoveryOptions,
    epic_key: &str,
    format: ReportFormat,
) -> JiraResult<TrackerReport> {
    let epic_key = epic_key.trim();
    let discovery = LinkageDiscoverer::new(source, options).discover(epic_key).await?;

    let epic_name = discovery
        .epic
        .as_ref()
        .map(|e| e.summary.clone())
        .unwrap_or_default();

    let issues = discovery.issues.into_sorted_vec();

    let mut type_breakdown = BTreeMap::new();
    for issue in &issues {
        let issue_type = if issue.issue_type_name.is_empty() {
            "unknown".to_string()
        } else {
            issue.issue_type_name.to_lowercase()
        };
        *type_breakdown.entry(issue_type).or_insert(0) += 1;
    }

    let rolled = rollup(issues.iter().filter_map(extract_row).collect());
    let text = rolled.render(epic_key, &epic_name, format, Local::now().naive_local());

    Ok(TrackerReport {
        epic_key: epic_key.to_string(),
        epic_name,
        rows: rolled.rows,
        summary: rolled.summary,
        outcomes: discovery.outcomes,
        type_breakdown,
        text,
    })
}
