//! Weighted rollup and report rendering.
//!
//! Each row's weight is its share of the total estimate; overall completion
//! is the weight-adjusted sum of row completions. Rows without an estimate
//! carry zero weight and so never move the overall figure.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::row::TrackerRow;
use crate::csv_escape;

/// Report text encoding.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown table with a summary section
    #[default]
    #[value(alias = "md")]
    Markdown,
    /// Comma-separated values followed by summary metrics
    Csv,
}

const COLUMNS: [&str; 9] = [
    "Ticket",
    "Description",
    "Owner",
    "Expected QA Date",
    "% Completion",
    "% Weight",
    "Days to QA (Est)",
    "Status",
    "Ext Dependencies",
];

/// Aggregate statistics over a row set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RollupSummary {
    pub total: usize,
    /// Rows at 100% completion.
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    /// Rows with a zero estimate (excluded from the weighted figure).
    pub unestimated: usize,
    pub total_estimate: f64,
    pub overall_completion: f64,
}

/// Rows with weights filled in, plus their summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Rollup {
    pub rows: Vec<TrackerRow>,
    pub summary: RollupSummary,
}

/// Compute weights and summary statistics.
#[must_use]
pub fn rollup(mut rows: Vec<TrackerRow>) -> Rollup {
    let total_estimate: f64 = rows.iter().map(|r| r.estimate_days).sum();

    for row in &mut rows {
        row.percent_weight = if total_estimate == 0.0 {
            0.0
        } else {
            100.0 * row.estimate_days / total_estimate
        };
    }

    let overall_completion = rows
        .iter()
        .map(|r| r.percent_completion * r.percent_weight / 100.0)
        .sum();

    let summary = RollupSummary {
        total: rows.len(),
        completed: rows.iter().filter(|r| r.percent_completion >= 100.0).count(),
        in_progress: rows
            .iter()
            .filter(|r| r.percent_completion > 0.0 && r.percent_completion < 100.0)
            .count(),
        not_started: rows.iter().filter(|r| r.percent_completion <= 0.0).count(),
        unestimated: rows.iter().filter(|r| r.estimate_days == 0.0).count(),
        total_estimate,
        overall_completion,
    };

    Rollup { rows, summary }
}

impl Rollup {
    /// Render the report. Output depends only on the rows and `generated_at`.
    #[must_use]
    pub fn render(
        &self,
        epic_key: &str,
        epic_name: &str,
        format: ReportFormat,
        generated_at: NaiveDateTime,
    ) -> String {
        match format {
            ReportFormat::Markdown => self.render_markdown(epic_key, epic_name, generated_at),
            ReportFormat::Csv => self.render_csv(),
        }
    }

    fn render_markdown(&self, epic_key: &str, epic_name: &str, generated_at: NaiveDateTime) -> String {
        let mut out = String::new();
        let s = &self.summary;

        if epic_name.is_empty() {
            out.push_str(&format!("# Project Tracker: {epic_key}\n\n"));
        } else {
            out.push_str(&format!("# Project Tracker: {epic_key} - {}\n\n", markdown_cell(epic_name)));
        }
        out.push_str(&format!("Generated: {}\n\n", generated_at.format("%Y-%m-%d %H:%M:%S")));

        out.push_str(&format!("| {} |\n", COLUMNS.join(" | ")));
        let separator: Vec<String> = COLUMNS.iter().map(|c| "-".repeat(c.len())).collect();
        out.push_str(&format!("|{}|\n", separator.iter().map(|d| format!("-{d}-")).collect::<Vec<_>>().join("|")));

        for row in &self.rows {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {:.2}% | {:.2}% | {:.1} | {} | {} |\n",
                markdown_cell(&row.ticket_label),
                markdown_cell(&row.description),
                markdown_cell(&row.owner),
                markdown_cell(&row.expected_date),
                row.percent_completion,
                row.percent_weight,
                row.estimate_days,
                markdown_cell(&row.status),
                markdown_cell(&row.dependency_note),
            ));
        }

        out.push_str("\n## Summary\n");
        out.push_str(&format!("- Total tickets: {}\n", s.total));
        out.push_str(&format!("- Completed: {}\n", s.completed));
        out.push_str(&format!("- In Progress: {}\n", s.in_progress));
        out.push_str(&format!("- Not Started: {}\n", s.not_started));
        out.push_str(&format!("- Unestimated: {}\n", s.unestimated));
        out.push_str(&format!("- Total Estimated Days: {:.1}\n", s.total_estimate));
        out.push_str(&format!("- Overall Completion: {:.2}%\n", s.overall_completion));
        out
    }

    fn render_csv(&self) -> String {
        let mut out = String::new();
        let s = &self.summary;

        out.push_str(&format!("{}\n", COLUMNS.join(",")));
        for row in &self.rows {
            out.push_str(&format!(
                "{},{},{},{},{:.2},{:.2},{:.1},{},{}\n",
                csv_escape(&row.ticket_label),
                csv_escape(&row.description),
                csv_escape(&row.owner),
                csv_escape(&row.expected_date),
                row.percent_completion,
                row.percent_weight,
                row.estimate_days,
                csv_escape(&row.status),
                csv_escape(&row.dependency_note),
            ));
        }

        out.push_str("\nMetric,Value\n");
        out.push_str(&format!("Total tickets,{}\n", s.total));
        out.push_str(&format!("Completed,{}\n", s.completed));
        out.push_str(&format!("In Progress,{}\n", s.in_progress));
        out.push_str(&format!("Not Started,{}\n", s.not_started));
        out.push_str(&format!("Unestimated,{}\n", s.unestimated));
        out.push_str(&format!("Total Estimated Days,{:.1}\n", s.total_estimate));
        out.push_str(&format!("Overall Completion,{:.2}\n", s.overall_completion));
        out
    }
}

/// Keep a value on one table line and out of the column structure.
fn markdown_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}
