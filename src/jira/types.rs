//! Data types for epic aggregation.
//!
//! These types flow through discovery and reporting:
//! - `IssueRecord` - raw, schema-variable issue as returned by the service
//! - `NormalizedIssue` - canonical projection used by everything downstream
//! - `IssueSet` - key-unique accumulator built by the discoverer
//! - `PageResult` - one page of a paginated search

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Raw issue payload (`{"key": ..., "fields": {...}}`).
///
/// Field layout differs between tracker deployments, so the record is kept
/// as untyped JSON and only ever read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueRecord(serde_json::Value);

impl IssueRecord {
    /// Wrap a raw JSON value.
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The issue key, if present and a string.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.0.get("key").and_then(serde_json::Value::as_str)
    }

    /// A top-level entry of the `fields` object.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.get("fields").and_then(|f| f.get(name))
    }

    /// The underlying JSON.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Canonical projection of one issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedIssue {
    pub key: String,
    pub summary: String,
    /// Description flattened to plain text, one paragraph per line.
    pub description: String,
    pub assignee_name: Option<String>,
    pub status_name: String,
    pub issue_type_name: String,
    /// First numeric estimate candidate, 0 when none resolved.
    pub estimate: f64,
    pub expected_date: Option<String>,
    pub subtask_keys: Vec<String>,
    pub linked_keys: Vec<String>,
}

/// Issues keyed by issue key.
///
/// Entries can be replaced or skipped on collision but never removed.
#[derive(Debug, Clone, Default)]
pub struct IssueSet {
    issues: BTreeMap<String, NormalizedIssue>,
}

impl IssueSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing any issue with the same key. Returns true if the key was new.
    pub fn insert_or_replace(&mut self, issue: NormalizedIssue) -> bool {
        self.issues.insert(issue.key.clone(), issue).is_none()
    }

    /// Insert only when the key is not yet present. Returns true if inserted.
    pub fn insert_if_absent(&mut self, issue: NormalizedIssue) -> bool {
        if self.issues.contains_key(&issue.key) {
            return false;
        }
        self.issues.insert(issue.key.clone(), issue);
        true
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.issues.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&NormalizedIssue> {
        self.issues.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Keys in natural issue-key order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.issues.keys().map(String::as_str).collect();
        keys.sort_by(|a, b| compare_issue_keys(a, b));
        keys
    }

    /// Consume the set, yielding issues in natural issue-key order.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<NormalizedIssue> {
        let mut issues: Vec<NormalizedIssue> = self.issues.into_values().collect();
        issues.sort_by(|a, b| compare_issue_keys(&a.key, &b.key));
        issues
    }
}

/// One page of a search.
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub issues: Vec<IssueRecord>,
    pub start_offset: usize,
    /// Total matches reported by the service; `None` when it did not say.
    pub total_count: Option<usize>,
    /// Continuation for token-paged searches; pass it back to fetch the next page.
    pub next_page_token: Option<String>,
    /// Set when the service marks this page as the final one.
    pub is_last: bool,
}

/// Order issue keys by project prefix, then numeric suffix (`ABC-2` < `ABC-10`).
///
/// Keys without a numeric suffix fall back to plain string order.
#[must_use]
pub fn compare_issue_keys(a: &str, b: &str) -> Ordering {
    match (split_key(a), split_key(b)) {
        (Some((pa, na)), Some((pb, nb))) => pa.cmp(pb).then(na.cmp(&nb)).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

fn split_key(key: &str) -> Option<(&str, u64)> {
    let (prefix, number) = key.rsplit_once('-')?;
    number.parse().ok().map(|n| (prefix, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(key: &str, summary: &str) -> NormalizedIssue {
        NormalizedIssue {
            key: key.to_string(),
            summary: summary.to_string(),
            ..NormalizedIssue::default()
        }
    }

    #[test]
    fn test_insert_if_absent_keeps_first() {
        let mut set = IssueSet::new();
        assert!(set.insert_if_absent(issue("A-1", "first")));
        assert!(!set.insert_if_absent(issue("A-1", "second")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("A-1").unwrap().summary, "first");
    }

    #[test]
    fn test_insert_or_replace_overwrites() {
        let mut set = IssueSet::new();
        assert!(set.insert_or_replace(issue("A-1", "first")));
        assert!(!set.insert_or_replace(issue("A-1", "second")));
        assert_eq!(set.get("A-1").unwrap().summary, "second");
    }

    #[test]
    fn test_natural_key_order() {
        let mut set = IssueSet::new();
        for key in ["ABC-10", "ABC-2", "AB-7", "ABC-1"] {
            set.insert_or_replace(issue(key, ""));
        }
        assert_eq!(set.keys(), vec!["AB-7", "ABC-1", "ABC-2", "ABC-10"]);
    }

    #[test]
    fn test_record_accessors() {
        let record = IssueRecord::new(serde_json::json!({
            "key": "ABC-1",
            "fields": { "summary": "Hello" }
        }));
        assert_eq!(record.key(), Some("ABC-1"));
        assert_eq!(record.field("summary").and_then(|v| v.as_str()), Some("Hello"));
        assert!(record.field("status").is_none());
    }
}
