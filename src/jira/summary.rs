//! Project-wide epic summary.

use serde::Serialize;
use tracing::info;

use super::discover::{paginate, DiscoveryOptions, LinkageDiscoverer};
use super::error::{JiraError, JiraResult};
use super::normalize::normalize;
use super::row::completion_for_status;
use super::source::IssueSource;
use super::types::{compare_issue_keys, NormalizedIssue};

/// Progress of one epic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpicSummary {
    pub key: String,
    pub name: String,
    pub issues: usize,
    /// Issues whose status maps to 100% completion.
    pub done: usize,
    pub pending: usize,
    pub total_estimate: f64,
}

/// Every epic in `project_key`, in natural key order.
///
/// # Errors
///
/// Returns the search error if any page fails.
pub async fn list_epics<S: IssueSource>(
    source: &S,
    options: &DiscoveryOptions,
    project_key: &str,
) -> JiraResult<Vec<NormalizedIssue>> {
    let project_key = project_key.trim();
    if project_key.is_empty() {
        return Err(JiraError::InvalidQuery("project key must not be empty".into()));
    }

    let query = format!("project = {project_key} AND issuetype = Epic");
    let mut epics = Vec::new();
    paginate(source, &query, options.page_size, |record| {
        let epic = normalize(record, &options.profile);
        if !epic.key.is_empty() {
            epics.push(epic);
        }
    })
    .await?;

    epics.sort_by(|a, b| compare_issue_keys(&a.key, &b.key));
    epics.dedup_by(|a, b| a.key == b.key);
    info!(project = %project_key, epics = epics.len(), "Listed epics");
    Ok(epics)
}

/// Summarize every epic in `project_key` using full linkage discovery.
///
/// # Errors
///
/// Returns an error if the epic listing or any epic's discovery fails.
pub async fn summarize_project<S: IssueSource>(
    source: &S,
    options: &DiscoveryOptions,
    project_key: &str,
) -> JiraResult<Vec<EpicSummary>> {
    let epics = list_epics(source, options, project_key).await?;
    let discoverer = LinkageDiscoverer::new(source, options);

    let mut summaries = Vec::with_capacity(epics.len());
    for epic in epics {
        let discovery = discoverer.discover(&epic.key).await?;
        let issues = discovery.issues.into_sorted_vec();
        let done = issues
            .iter()
            .filter(|i| completion_for_status(&i.status_name) >= 100.0)
            .count();

        summaries.push(EpicSummary {
            name: epic.summary,
            key: epic.key,
            issues: issues.len(),
            done,
            pending: issues.len() - done,
            total_estimate: issues.iter().map(|i| i.estimate).sum(),
        });
    }

    Ok(summaries)
}
