//! Quip REST client.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::config::QuipSettings;
use crate::error::{Error, Result};

/// `location` values for `threads/edit-document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Location {
    Append = 0,
    AfterSection = 2,
}

/// Element ids in Quip document HTML (`id='...'` or `id="..."`).
static SECTION_ID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[\s<])id\s*=\s*(?:'([^']+)'|"([^"]+)")"#).ok()
});

/// Thread metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
}

/// A thread and its document HTML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thread {
    #[serde(default)]
    pub thread: ThreadInfo,
    #[serde(default)]
    pub html: String,
}

/// Client for the Quip document API.
pub struct QuipClient {
    client: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl QuipClient {
    #[must_use]
    pub fn new(settings: &QuipSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.clone(),
            token: settings.token.clone(),
        }
    }

    /// Fetch a thread with its HTML.
    ///
    /// # Errors
    ///
    /// Returns `Error::Publish` on request failure or a non-success status.
    pub async fn get_thread(&self, thread_id: &str) -> Result<Thread> {
        let url = format!("{}/threads/{thread_id}", self.base_url);
        debug!(thread = %thread_id, "Fetching Quip thread");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| Error::Publish(format!("Quip request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Publish(format!("Quip returned HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Publish(format!("Failed to parse Quip thread: {e}")))
    }

    /// Edit a document via `threads/edit-document`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Publish` on request failure or a non-success status.
    pub async fn edit_document(
        &self,
        thread_id: &str,
        content: &str,
        format: &str,
        location: Location,
        section_id: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}/threads/edit-document", self.base_url);
        let location = (location as u8).to_string();

        let mut form = vec![
            ("thread_id", thread_id),
            ("content", content),
            ("format", format),
            ("location", location.as_str()),
        ];
        if let Some(section) = section_id {
            form.push(("section_id", section));
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Publish(format!("Quip request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Publish(format!("Quip edit returned HTTP {status}: {body}")));
        }

        debug!(thread = %thread_id, format, "Edited Quip document");
        Ok(())
    }

    /// Insert HTML after the document's last section (or at the end when it has none).
    ///
    /// Content without a `<table` is wrapped in one.
    ///
    /// # Errors
    ///
    /// Returns `Error::Publish` if fetching or editing the thread fails.
    pub async fn append_html_table(&self, thread_id: &str, html: &str) -> Result<()> {
        let thread = self.get_thread(thread_id).await?;
        let section = last_section_id(&thread.html);

        let content = if html.contains("<table") {
            html.to_string()
        } else {
            format!("<table>{html}</table>")
        };

        match section {
            Some(section) => {
                debug!(thread = %thread_id, section = %section, "Appending after section");
                self.edit_document(thread_id, &content, "html", Location::AfterSection, Some(&section))
                    .await
            }
            None => {
                self.edit_document(thread_id, &content, "html", Location::Append, None)
                    .await
            }
        }
    }

    /// Append Markdown at the end of the document.
    ///
    /// # Errors
    ///
    /// Returns `Error::Publish` if the edit fails.
    pub async fn append_markdown(&self, thread_id: &str, markdown: &str) -> Result<()> {
        let content = format!("\n{markdown}");
        self.edit_document(thread_id, &content, "markdown", Location::Append, None)
            .await
    }

    /// Append a tracker report under an "Updated" separator.
    ///
    /// Tries HTML first and falls back to Markdown.
    ///
    /// # Errors
    ///
    /// Returns `Error::Publish` when both attempts fail.
    pub async fn publish_report(&self, thread_id: &str, epic_key: &str, text: &str) -> Result<()> {
        let content = format!("{}{text}", super::update_separator(epic_key));

        match self
            .append_html_table(thread_id, &super::markdown_to_html(&content))
            .await
        {
            Ok(()) => {
                info!(thread = %thread_id, "Published report as HTML");
                Ok(())
            }
            Err(html_err) => {
                warn!(thread = %thread_id, error = %html_err, "HTML append failed, trying markdown");
                self.append_markdown(thread_id, &content).await.map_err(|md_err| {
                    Error::Publish(format!(
                        "could not append to thread {thread_id} (html: {html_err}; markdown: {md_err})"
                    ))
                })?;
                info!(thread = %thread_id, "Published report as markdown");
                Ok(())
            }
        }
    }
}

/// Id of the last element carrying an `id` attribute.
#[must_use]
pub fn last_section_id(html: &str) -> Option<String> {
    let re = SECTION_ID.as_ref()?;
    re.captures_iter(html)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_string())
        .last()
}
