//! In-memory issue source for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::error::{JiraError, JiraResult};
use super::source::{IssueSource, NewIssue};
use super::types::{IssueRecord, PageResult};

/// Serves canned search results and issues, recording every request.
#[derive(Default)]
pub struct MockSource {
    queries: HashMap<String, Vec<IssueRecord>>,
    issues: HashMap<String, IssueRecord>,
    failing: HashSet<String>,
    failing_pages: HashSet<(String, usize)>,
    page_cap: Option<usize>,
    omit_totals: bool,
    ignore_offsets: bool,
    token_paging: bool,
    searches: Mutex<Vec<(String, usize)>>,
    fetches: Mutex<Vec<String>>,
    created: Mutex<Vec<NewIssue>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every issue matching `query`, served page by page.
    pub fn with_query(mut self, query: &str, records: Vec<serde_json::Value>) -> Self {
        self.queries
            .insert(query.to_string(), records.into_iter().map(IssueRecord::new).collect());
        self
    }

    /// An issue available through `get_issue`.
    pub fn with_issue(mut self, record: serde_json::Value) -> Self {
        let record = IssueRecord::new(record);
        let key = record.key().unwrap_or_default().to_string();
        self.issues.insert(key, record);
        self
    }

    /// Make `query` fail the way an unknown field does.
    pub fn failing_query(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    /// Make the page of `query` starting at `offset` fail.
    pub fn failing_page(mut self, query: &str, offset: usize) -> Self {
        self.failing_pages.insert((query.to_string(), offset));
        self
    }

    /// Serve the first page for every request and echo offset 0 back.
    pub fn ignoring_offsets(mut self) -> Self {
        self.ignore_offsets = true;
        self
    }

    /// Page with continuation tokens and `isLast` instead of totals.
    pub fn with_token_paging(mut self) -> Self {
        self.token_paging = true;
        self
    }

    /// Return at most `cap` records per page regardless of the requested size.
    pub fn with_page_cap(mut self, cap: usize) -> Self {
        self.page_cap = Some(cap);
        self
    }

    /// Leave `total` out of search responses.
    pub fn without_totals(mut self) -> Self {
        self.omit_totals = true;
        self
    }

    pub fn search_count(&self, query: &str) -> usize {
        self.search_offsets(query).len()
    }

    pub fn search_offsets(&self, query: &str) -> Vec<usize> {
        self.searches
            .lock()
            .unwrap()
            .iter()
            .filter(|(q, _)| q == query)
            .map(|(_, start)| *start)
            .collect()
    }

    pub fn total_searches(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn issue_requests(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<NewIssue> {
        self.created.lock().unwrap().clone()
    }
}

impl IssueSource for MockSource {
    async fn search(
        &self,
        query: &str,
        start_offset: usize,
        page_token: Option<&str>,
        page_size: usize,
    ) -> JiraResult<PageResult> {
        let start_offset = match page_token {
            Some(token) => token
                .strip_prefix("next-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| JiraError::RemoteService {
                    status: 400,
                    body: format!("bad page token {token}"),
                })?,
            None if self.ignore_offsets => 0,
            None => start_offset,
        };
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), start_offset));

        if self.failing.contains(query) || self.failing_pages.contains(&(query.to_string(), start_offset)) {
            return Err(JiraError::RemoteService {
                status: 400,
                body: format!("Field in '{query}' does not exist"),
            });
        }

        let all = self.queries.get(query).map(Vec::as_slice).unwrap_or_default();
        let size = self.page_cap.map_or(page_size, |cap| page_size.min(cap));
        let start = start_offset.min(all.len());
        let end = (start + size).min(all.len());

        if self.token_paging {
            let is_last = end >= all.len();
            return Ok(PageResult {
                issues: all[start..end].to_vec(),
                start_offset: 0,
                total_count: None,
                next_page_token: (!is_last).then(|| format!("next-{end}")),
                is_last,
            });
        }

        Ok(PageResult {
            issues: all[start..end].to_vec(),
            start_offset,
            total_count: (!self.omit_totals).then_some(all.len()),
            next_page_token: None,
            is_last: false,
        })
    }

    async fn get_issue(&self, key: &str) -> JiraResult<IssueRecord> {
        self.fetches.lock().unwrap().push(key.to_string());
        self.issues
            .get(key)
            .cloned()
            .ok_or_else(|| JiraError::NotFound { key: key.to_string() })
    }

    async fn create_issue(&self, issue: &NewIssue) -> JiraResult<String> {
        let mut created = self.created.lock().unwrap();
        created.push(issue.clone());
        Ok(format!("{}-{}", issue.project_key, created.len()))
    }
}

/// A minimal issue with status, type and story-point estimate.
pub fn issue_json(key: &str, status: &str, issue_type: &str, estimate: f64) -> serde_json::Value {
    serde_json::json!({
        "key": key,
        "fields": {
            "summary": format!("Summary of {key}"),
            "status": { "name": status },
            "issuetype": { "name": issue_type },
            "customfield_10013": estimate
        }
    })
}
