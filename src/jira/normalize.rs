//! Issue normalization.
//!
//! Converts a schema-variable `IssueRecord` into a `NormalizedIssue`.
//! Every logical field is extracted on its own: a missing or malformed
//! nested object empties that field only.

use serde_json::Value;

use super::types::{IssueRecord, NormalizedIssue};

/// Estimate field ids tried when none are configured, in priority order.
pub const DEFAULT_ESTIMATE_FIELDS: &[&str] = &["customfield_10013", "customfield_10016"];

/// Expected-date field id used when none is configured.
pub const DEFAULT_EXPECTED_DATE_FIELD: &str = "customfield_10020";

/// Deployment-specific field ids consulted during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProfile {
    /// Estimate candidates, tried in order; the first numeric value wins.
    pub estimate_fields: Vec<String>,
    pub expected_date_field: String,
}

impl Default for FieldProfile {
    fn default() -> Self {
        Self {
            estimate_fields: DEFAULT_ESTIMATE_FIELDS.iter().map(ToString::to_string).collect(),
            expected_date_field: DEFAULT_EXPECTED_DATE_FIELD.to_string(),
        }
    }
}

/// Project a raw record onto the canonical shape.
#[must_use]
pub fn normalize(record: &IssueRecord, profile: &FieldProfile) -> NormalizedIssue {
    NormalizedIssue {
        key: record.key().unwrap_or_default().trim().to_string(),
        summary: string_field(record, "summary").unwrap_or_default(),
        description: record.field("description").map(flatten_text).unwrap_or_default(),
        assignee_name: nested_string(record, "assignee", "displayName"),
        status_name: nested_string(record, "status", "name").unwrap_or_default(),
        issue_type_name: nested_string(record, "issuetype", "name").unwrap_or_default(),
        estimate: first_estimate(record, &profile.estimate_fields),
        expected_date: string_field(record, &profile.expected_date_field),
        subtask_keys: subtask_keys(record),
        linked_keys: linked_keys(record),
    }
}

fn string_field(record: &IssueRecord, name: &str) -> Option<String> {
    record
        .field(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn nested_string(record: &IssueRecord, object: &str, name: &str) -> Option<String> {
    record
        .field(object)
        .and_then(|o| o.get(name))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// First candidate holding a JSON number; 0 when none does.
fn first_estimate(record: &IssueRecord, candidates: &[String]) -> f64 {
    candidates
        .iter()
        .find_map(|id| record.field(id).and_then(Value::as_f64))
        .unwrap_or(0.0)
}

fn subtask_keys(record: &IssueRecord) -> Vec<String> {
    record
        .field("subtasks")
        .and_then(Value::as_array)
        .map(|subtasks| {
            subtasks
                .iter()
                .filter_map(|s| s.get("key").and_then(Value::as_str))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn linked_keys(record: &IssueRecord) -> Vec<String> {
    record
        .field("issuelinks")
        .and_then(Value::as_array)
        .map(|links| {
            links
                .iter()
                .filter_map(|link| {
                    link.get("outwardIssue")
                        .or_else(|| link.get("inwardIssue"))
                        .and_then(|issue| issue.get("key"))
                        .and_then(Value::as_str)
                })
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Flatten a plain string or a rich-text document to text.
///
/// Block nodes (paragraphs, headings, code blocks) end a line, as do hard breaks.
#[must_use]
pub fn flatten_text(value: &Value) -> String {
    if let Some(text) = value.as_str() {
        return text.to_string();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    walk_document(value, &mut lines, &mut current);
    flush_line(&mut lines, &mut current);
    lines.join("\n")
}

fn walk_document(node: &Value, lines: &mut Vec<String>, current: &mut String) {
    if let Some(text) = node.get("text").and_then(Value::as_str) {
        current.push_str(text);
    }

    let node_type = node.get("type").and_then(Value::as_str).unwrap_or_default();
    if node_type == "hardBreak" {
        flush_line(lines, current);
    }

    if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
            walk_document(child, lines, current);
        }
    }

    if matches!(node_type, "paragraph" | "heading" | "codeBlock") {
        flush_line(lines, current);
    }
}

fn flush_line(lines: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        lines.push(std::mem::take(current));
    }
}
