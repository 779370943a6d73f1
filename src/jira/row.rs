//! Tracker row extraction.

use serde::Serialize;

use super::types::NormalizedIssue;

/// One report line.
///
/// Immutable once extracted, apart from `percent_weight` which the
/// rollup fills in relative to the whole row set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerRow {
    /// Key plus lowercased issue type, e.g. `ABC-1 (story)`.
    pub ticket_label: String,
    pub description: String,
    pub owner: String,
    pub status: String,
    pub percent_completion: f64,
    pub estimate_days: f64,
    pub percent_weight: f64,
    pub expected_date: String,
    pub dependency_note: String,
}

/// Build a row, or `None` when the issue has no usable key.
#[must_use]
pub fn extract_row(issue: &NormalizedIssue) -> Option<TrackerRow> {
    let key = issue.key.trim();
    if key.is_empty() {
        return None;
    }

    let issue_type = if issue.issue_type_name.is_empty() {
        "unknown".to_string()
    } else {
        issue.issue_type_name.to_lowercase()
    };

    Some(TrackerRow {
        ticket_label: format!("{key} ({issue_type})"),
        description: issue.summary.clone(),
        owner: issue.assignee_name.clone().unwrap_or_default(),
        status: issue.status_name.clone(),
        percent_completion: completion_for_status(&issue.status_name),
        estimate_days: issue.estimate,
        percent_weight: 0.0,
        expected_date: issue.expected_date.clone().unwrap_or_default(),
        dependency_note: dependency_note(&issue.description),
    })
}

/// Completion percentage for a workflow status (case-insensitive, first match wins).
#[must_use]
pub fn completion_for_status(status: &str) -> f64 {
    let status = status.to_lowercase();
    let has = |needle: &str| status.contains(needle);

    if has("done") || has("closed") || has("complete") {
        100.0
    } else if has("review") || has("qa") {
        90.0
    } else if has("progress") {
        50.0
    } else if has("started") {
        10.0
    } else {
        0.0
    }
}

/// First description line mentioning a dependency, trimmed.
#[must_use]
pub fn dependency_note(description: &str) -> String {
    description
        .lines()
        .find(|line| line.to_lowercase().contains("depend"))
        .map(|line| line.trim().to_string())
        .unwrap_or_default()
}
