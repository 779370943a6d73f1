//! Epic issue aggregation and weighted tracker reports.
//!
//! # Architecture
//!
//! - [`source`] - `IssueSource` trait: paginated search, single-issue fetch
//! - [`client`] - HTTP implementation for the Jira REST API
//! - [`normalize`] - schema-variable record → `NormalizedIssue`
//! - [`discover`] - multi-strategy linkage discovery with key-based merge
//! - [`row`] - tracker row extraction and status → completion mapping
//! - [`report`] - weighted rollup and Markdown/CSV rendering
//! - [`tracker`] - end-to-end tracker generation
//! - [`summary`] - per-epic progress across a project
//!
//! Data flows strictly leaf-first: epic key → discoverer (driving the source
//! across strategies) → normalized issues → rows → rollup → report text.

pub mod client;
pub mod discover;
pub mod error;
pub mod normalize;
pub mod report;
pub mod row;
pub mod source;
pub mod summary;
pub mod tracker;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{Credentials, JiraClient, MAX_PAGE_SIZE};
pub use discover::{
    Discovery, DiscoveryOptions, LinkageDiscoverer, Strategy, StrategyOutcome,
    DEFAULT_EPIC_LINK_FIELDS, DEFAULT_PAGE_SIZE,
};
pub use error::{JiraError, JiraResult};
pub use normalize::{normalize, FieldProfile, DEFAULT_ESTIMATE_FIELDS, DEFAULT_EXPECTED_DATE_FIELD};
pub use report::{rollup, ReportFormat, Rollup, RollupSummary};
pub use row::{completion_for_status, extract_row, TrackerRow};
pub use source::{IssueSource, NewIssue};
pub use summary::{list_epics, summarize_project, EpicSummary};
pub use tracker::{generate_tracker, TrackerReport};
pub use types::{IssueRecord, IssueSet, NormalizedIssue, PageResult};
