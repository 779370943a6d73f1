//! Linkage discovery.
//!
//! Finds every issue related to an epic by running several redundant
//! strategies in a fixed order and merging their results by issue key:
//!
//! 1. Parent link: `parent = EPIC` (results overwrite)
//! 2. Legacy epic link: `<field> = EPIC` for each candidate field (results never overwrite)
//! 3. Subtasks: the epic's own subtask list, each fetched individually
//!
//! A failing strategy is logged, recorded in its `StrategyOutcome`, and skipped.
//! Discovery only fails when the epic cannot be fetched and nothing was found.

use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use super::error::{JiraError, JiraResult};
use super::normalize::{normalize, FieldProfile};
use super::source::IssueSource;
use super::types::{IssueRecord, IssueSet, NormalizedIssue};

/// Legacy "Epic Link" query expressions used when none are configured.
pub const DEFAULT_EPIC_LINK_FIELDS: &[&str] = &["\"Epic Link\"", "cf[10014]", "cf[10008]"];

/// Search page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A discovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    ParentLink,
    EpicLink,
    Subtasks,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentLink => write!(f, "parent link"),
            Self::EpicLink => write!(f, "epic link"),
            Self::Subtasks => write!(f, "subtasks"),
        }
    }
}

/// What one strategy (or one epic-link field variant) contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyOutcome {
    pub strategy: Strategy,
    /// Query expression, or the epic key for the subtask strategy.
    pub query: String,
    /// Issues returned by the strategy.
    pub found: usize,
    /// Issues that were new to the set.
    pub added: usize,
    /// Failure message when the strategy stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Tunables for a discovery run.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub profile: FieldProfile,
    /// Legacy epic-link query expressions, in priority order.
    pub epic_link_fields: Vec<String>,
    pub page_size: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            profile: FieldProfile::default(),
            epic_link_fields: DEFAULT_EPIC_LINK_FIELDS.iter().map(ToString::to_string).collect(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Result of a discovery run.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub issues: IssueSet,
    /// The epic itself, when its record could be fetched.
    pub epic: Option<NormalizedIssue>,
    pub outcomes: Vec<StrategyOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    Overwrite,
    KeepExisting,
}

/// Runs the discovery strategies against an issue source.
pub struct LinkageDiscoverer<'a, S> {
    source: &'a S,
    options: &'a DiscoveryOptions,
}

impl<'a, S: IssueSource> LinkageDiscoverer<'a, S> {
    #[must_use]
    pub const fn new(source: &'a S, options: &'a DiscoveryOptions) -> Self {
        Self { source, options }
    }

    /// Discover all issues related to `epic_key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` for a blank epic key, any non-skippable source
    /// error, or the epic fetch error when no strategy found anything.
    pub async fn discover(&self, epic_key: &str) -> JiraResult<Discovery> {
        let epic_key = epic_key.trim();
        if epic_key.is_empty() {
            return Err(JiraError::InvalidQuery("epic key must not be empty".into()));
        }

        let mut discovery = Discovery::default();

        let query = format!("parent = {epic_key}");
        let outcome = self
            .run_query(Strategy::ParentLink, &query, Merge::Overwrite, &mut discovery.issues)
            .await?;
        discovery.outcomes.push(outcome);

        for field in self.options.epic_link_fields.iter().filter(|f| !f.trim().is_empty()) {
            let query = format!("{} = {epic_key}", field.trim());
            let outcome = self
                .run_query(Strategy::EpicLink, &query, Merge::KeepExisting, &mut discovery.issues)
                .await?;
            discovery.outcomes.push(outcome);
        }

        let epic_error = self.collect_subtasks(epic_key, &mut discovery).await?;

        if let Some(err) = epic_error {
            if discovery.issues.is_empty() {
                return Err(err);
            }
        }

        info!(epic = %epic_key, total = discovery.issues.len(), "Discovery complete");
        Ok(discovery)
    }

    /// Run one query through every page, merging as pages arrive.
    ///
    /// Issues already merged are kept when a later page fails.
    async fn run_query(
        &self,
        strategy: Strategy,
        query: &str,
        merge: Merge,
        issues: &mut IssueSet,
    ) -> JiraResult<StrategyOutcome> {
        let mut outcome = StrategyOutcome {
            strategy,
            query: query.to_string(),
            found: 0,
            added: 0,
            error: None,
        };
        let profile = &self.options.profile;
        let result = paginate(self.source, query, self.options.page_size, |record| {
            let issue = normalize(record, profile);
            if issue.key.is_empty() {
                return;
            }
            outcome.found += 1;
            let added = match merge {
                Merge::Overwrite => issues.insert_or_replace(issue),
                Merge::KeepExisting => issues.insert_if_absent(issue),
            };
            if added {
                outcome.added += 1;
            }
        })
        .await;

        match result {
            Ok(()) => {}
            Err(err) if err.is_skippable() => {
                warn!(%strategy, query, error = %err, "Strategy failed, skipping");
                outcome.error = Some(err.to_string());
            }
            Err(err) => return Err(err),
        }

        info!(%strategy, query, found = outcome.found, added = outcome.added, "Strategy finished");
        Ok(outcome)
    }

    /// Fetch the epic and any of its subtasks not yet discovered.
    ///
    /// Returns the epic fetch error, if any, so the caller can decide whether it is fatal.
    async fn collect_subtasks(
        &self,
        epic_key: &str,
        discovery: &mut Discovery,
    ) -> JiraResult<Option<JiraError>> {
        let mut outcome = StrategyOutcome {
            strategy: Strategy::Subtasks,
            query: epic_key.to_string(),
            found: 0,
            added: 0,
            error: None,
        };

        let epic = match self.source.get_issue(epic_key).await {
            Ok(record) => normalize(&record, &self.options.profile),
            Err(err) if err.is_skippable() => {
                warn!(epic = %epic_key, error = %err, "Could not fetch epic");
                outcome.error = Some(err.to_string());
                discovery.outcomes.push(outcome);
                return Ok(Some(err));
            }
            Err(err) => return Err(err),
        };

        let mut failures = Vec::new();
        for key in &epic.subtask_keys {
            outcome.found += 1;
            if discovery.issues.contains(key) {
                continue;
            }
            match self.source.get_issue(key).await {
                Ok(record) => {
                    let mut issue = normalize(&record, &self.options.profile);
                    if issue.key.is_empty() {
                        issue.key.clone_from(key);
                    }
                    if discovery.issues.insert_if_absent(issue) {
                        outcome.added += 1;
                    }
                }
                Err(err) if err.is_skippable() => {
                    warn!(key = %key, error = %err, "Could not fetch subtask");
                    failures.push(key.clone());
                }
                Err(err) => return Err(err),
            }
        }

        if !failures.is_empty() {
            outcome.error = Some(format!("could not fetch {}", failures.join(", ")));
        }
        info!(epic = %epic_key, found = outcome.found, added = outcome.added, "Subtask strategy finished");

        discovery.outcomes.push(outcome);
        discovery.epic = Some(epic);
        Ok(None)
    }
}

/// Walk every page of `query`, handing each record to `on_record` as pages arrive.
///
/// The offset cursor is kept locally and advances by the number of records
/// actually returned. Token-paged responses are followed until the service
/// marks a page as last or stops handing out new tokens. Otherwise paging
/// stops on an empty page or once `total` is reached; a page without
/// `total` is the last one. Records from pages before a failure have
/// already been delivered.
///
/// # Errors
///
/// Returns the first search error.
pub async fn paginate<S, F>(source: &S, query: &str, page_size: usize, mut on_record: F) -> JiraResult<()>
where
    S: IssueSource,
    F: FnMut(&IssueRecord),
{
    let mut start = 0;
    let mut token: Option<String> = None;
    loop {
        let page = source.search(query, start, token.as_deref(), page_size).await?;
        let returned = page.issues.len();
        for record in &page.issues {
            on_record(record);
        }

        if returned == 0 || page.is_last {
            return Ok(());
        }
        start += returned;

        if let Some(next) = page.next_page_token {
            if token.as_deref() == Some(next.as_str()) {
                return Ok(());
            }
            token = Some(next);
            continue;
        }

        match page.total_count {
            Some(total) if start < total => {}
            _ => return Ok(()),
        }
    }
}
