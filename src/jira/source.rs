//! Issue source trait.
//!
//! The boundary between aggregation logic and the remote tracker.
//! `JiraClient` implements it over HTTP; tests implement it in memory.

use super::error::JiraResult;
use super::types::{IssueRecord, PageResult};

/// Fields for a newly created issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub project_key: String,
    pub summary: String,
    pub description: Option<String>,
    pub issue_type: String,
    pub labels: Vec<String>,
}

/// Access to an issue-tracking service.
pub trait IssueSource: Send + Sync {
    /// Run one filtered search and return a single page.
    ///
    /// Pages are addressed by `start_offset`, or by `page_token` when the
    /// previous page handed one back.
    /// No retries: failures are returned to the caller, which decides
    /// whether they are fatal.
    fn search(
        &self,
        query: &str,
        start_offset: usize,
        page_token: Option<&str>,
        page_size: usize,
    ) -> impl std::future::Future<Output = JiraResult<PageResult>> + Send;

    /// Fetch a single issue with all fields expanded.
    fn get_issue(&self, key: &str) -> impl std::future::Future<Output = JiraResult<IssueRecord>> + Send;

    /// Create an issue and return its key.
    fn create_issue(&self, issue: &NewIssue) -> impl std::future::Future<Output = JiraResult<String>> + Send;
}
