//! LLM response cleanup.

/// Placeholder returned for an empty answer.
pub const NO_RESPONSE: &str = "No response";

/// Raw text produced by a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    raw: String,
}

impl LlmResponse {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The answer as returned by the backend.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The answer without surrounding whitespace or code fences.
    ///
    /// An empty answer reads as `"No response"`.
    #[must_use]
    pub fn text(&self) -> String {
        let text = self.raw.trim().trim_matches('`').trim();
        if text.is_empty() {
            NO_RESPONSE.to_string()
        } else {
            text.to_string()
        }
    }
}

/// Slice from the first `[` to the last `]`, dropping any prose around a JSON array.
///
/// Returns `text` unchanged when it holds no bracketed span.
#[must_use]
pub fn extract_json_array(text: &str) -> &str {
    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_strips_fences() {
        let response = LlmResponse::new("  ```json\n[1]\n```  ");
        assert_eq!(response.text(), "json\n[1]");
        assert_eq!(LlmResponse::new("  plain  ").text(), "plain");
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(LlmResponse::new("").text(), NO_RESPONSE);
        assert_eq!(LlmResponse::new(" `` ").text(), NO_RESPONSE);
    }

    #[test]
    fn test_extract_json_array() {
        assert_eq!(
            extract_json_array("Here you go:\n[{\"content\":\"a\"}]\nEnjoy"),
            "[{\"content\":\"a\"}]"
        );
        assert_eq!(extract_json_array("no array"), "no array");
        assert_eq!(extract_json_array("] backwards ["), "] backwards [");
    }
}
