//! HTTP issue source for Jira Cloud (REST API v3).
//!
//! Pure transport and decode: build request, send, decode into
//! `PageResult` / `IssueRecord`. No retries.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::error::{JiraError, JiraResult};
use super::source::{IssueSource, NewIssue};
use super::types::{IssueRecord, PageResult};

/// Largest page the search endpoint accepts.
pub const MAX_PAGE_SIZE: usize = 100;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// How requests are authenticated.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Account email plus API token (Jira Cloud).
    Basic { email: String, token: SecretString },
    /// Personal access token (Jira Data Center).
    Bearer(SecretString),
}

/// Jira REST client.
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

/// Search endpoint response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "startAt", default)]
    start_at: Option<usize>,
    total: Option<usize>,
    #[serde(rename = "nextPageToken", default)]
    next_page_token: Option<String>,
    #[serde(rename = "isLast", default)]
    is_last: Option<bool>,
    #[serde(default)]
    issues: Vec<IssueRecord>,
}

/// Issue creation response.
#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

impl JiraClient {
    /// Create a client for `base_url` (trailing `/` is trimmed).
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be built.
    pub fn new(base_url: &str, credentials: Credentials) -> JiraResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| JiraError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Credentials::Basic { email, token } => request.basic_auth(email, Some(token.expose_secret())),
            Credentials::Bearer(token) => request.bearer_auth(token.expose_secret()),
        }
    }

    /// Send a request and return its status and body.
    async fn send(&self, request: reqwest::RequestBuilder) -> JiraResult<(u16, String)> {
        let response = self
            .authorize(request)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| JiraError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| JiraError::Transport(format!("Failed to read response: {e}")))?;

        Ok((status, body))
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> JiraResult<T> {
    serde_json::from_str(body).map_err(|e| JiraError::Decode(e.to_string()))
}

const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}

impl IssueSource for JiraClient {
    async fn search(
        &self,
        query: &str,
        start_offset: usize,
        page_token: Option<&str>,
        page_size: usize,
    ) -> JiraResult<PageResult> {
        if query.trim().is_empty() {
            return Err(JiraError::InvalidQuery("query must not be empty".into()));
        }
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let url = format!("{}/rest/api/3/search/jql", self.base_url);
        debug!(query, start_offset, page_token = ?page_token, page_size, "Searching issues");

        let mut params = vec![
            ("jql", query.to_string()),
            ("maxResults", page_size.to_string()),
            ("fields", "*all".to_string()),
        ];
        match page_token {
            Some(token) => params.push(("nextPageToken", token.to_string())),
            None => params.push(("startAt", start_offset.to_string())),
        }

        let (status, body) = self.send(self.client.get(&url).query(&params)).await?;
        if !is_success(status) {
            return Err(JiraError::RemoteService { status, body });
        }

        let page: SearchResponse = decode(&body)?;
        Ok(PageResult {
            issues: page.issues,
            start_offset: page.start_at.unwrap_or(start_offset),
            total_count: page.total,
            next_page_token: page.next_page_token.filter(|t| !t.is_empty()),
            is_last: page.is_last.unwrap_or(false),
        })
    }

    async fn get_issue(&self, key: &str) -> JiraResult<IssueRecord> {
        let url = format!("{}/rest/api/3/issue/{key}", self.base_url);
        debug!(key, "Fetching issue");

        let request = self
            .client
            .get(&url)
            .query(&[("fields", "*all"), ("expand", "renderedFields,names")]);

        let (status, body) = self.send(request).await?;
        if status == 404 {
            return Err(JiraError::NotFound { key: key.to_string() });
        }
        if !is_success(status) {
            return Err(JiraError::RemoteService { status, body });
        }

        decode(&body)
    }

    async fn create_issue(&self, issue: &NewIssue) -> JiraResult<String> {
        let url = format!("{}/rest/api/3/issue", self.base_url);

        let mut fields = serde_json::json!({
            "project": { "key": issue.project_key },
            "summary": issue.summary,
            "issuetype": { "name": issue.issue_type },
        });
        if !issue.labels.is_empty() {
            fields["labels"] = serde_json::json!(issue.labels);
        }
        if let Some(description) = issue.description.as_deref().filter(|d| !d.trim().is_empty()) {
            fields["description"] = document_body(description);
        }

        let request = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "fields": fields }));

        let (status, body) = self.send(request).await?;
        if !is_success(status) {
            return Err(JiraError::RemoteService { status, body });
        }

        let created: CreatedIssue = decode(&body)?;
        debug!(key = %created.key, "Created issue");
        Ok(created.key)
    }
}

/// Wrap plain text as a one-paragraph rich-text document.
fn document_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "doc",
        "version": 1,
        "content": [{
            "type": "paragraph",
            "content": [{ "type": "text", "text": text }]
        }]
    })
}
