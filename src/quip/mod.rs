//! Quip document publishing.
//!
//! Tracker reports are appended to an existing Quip document, as an HTML
//! table when the document accepts it and as Markdown otherwise.

mod client;

pub use client::{last_section_id, Location, QuipClient, Thread, ThreadInfo};

use crate::error::{Error, Result};

/// Extract the thread id from a document URL.
///
/// `https://acme.quip.com/ePhzA3UgR8Wd/My-project` → `ePhzA3UgR8Wd`
///
/// # Errors
///
/// Returns `InvalidArgument` if the URL has no path segment after a `quip.com` host.
pub fn extract_thread_id(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let invalid = || Error::InvalidArgument(format!("not a Quip document URL: {url}"));

    let mut segments = trimmed.split('/');
    segments
        .by_ref()
        .find(|segment| segment.contains("quip.com"))
        .ok_or_else(invalid)?;

    segments
        .next()
        .map(|id| id.split(['?', '#']).next().unwrap_or_default())
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .ok_or_else(invalid)
}

/// Render Markdown (CommonMark with GFM tables) to HTML.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = comrak::Options::default();
    options.extension.table = true;
    comrak::markdown_to_html(markdown, &options)
}

/// Heading placed before each published report.
#[must_use]
pub fn update_separator(epic_key: &str) -> String {
    format!("\n\n---\n**Updated: {epic_key}**\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_thread_id() {
        assert_eq!(
            extract_thread_id("https://acme.quip.com/ePhzA3UgR8Wd/My-test-project").unwrap(),
            "ePhzA3UgR8Wd"
        );
        assert_eq!(extract_thread_id("https://quip.com/ePhz/").unwrap(), "ePhz");
        assert_eq!(extract_thread_id("https://quip.com/ePhz?x=1").unwrap(), "ePhz");
    }

    #[test]
    fn test_extract_thread_id_rejects_other_urls() {
        assert!(matches!(
            extract_thread_id("https://example.com/ePhz"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(extract_thread_id("https://acme.quip.com/").is_err());
    }

    #[test]
    fn test_markdown_table_to_html() {
        let html = markdown_to_html("| A | B |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_update_separator() {
        assert_eq!(update_separator("E-1"), "\n\n---\n**Updated: E-1**\n\n");
    }
}
