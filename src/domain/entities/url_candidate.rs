//! URL candidates extracted from free-text messages.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Permissive matcher for URLs embedded in chat text.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

/// Errors raised when a candidate cannot be treated as a URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// A validated http(s) URL taken from an inbound message or request.
///
/// The original spelling is preserved; normalization happens later in the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCandidate(String);

impl UrlCandidate {
    /// Validates `raw` as an absolute http(s) URL with a host.
    ///
    /// # Errors
    ///
    /// Returns [`UrlValidationError`] describing why the input was rejected.
    pub fn parse(raw: &str) -> Result<Self, UrlValidationError> {
        let trimmed = raw.trim();
        let url =
            Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            _ => return Err(UrlValidationError::UnsupportedProtocol),
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(UrlValidationError::MissingHost);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UrlCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns every `http(s)://...` run in `text`, in order of appearance.
///
/// Matches are not validated; see [`UrlCandidate::parse`].
pub fn extract_candidates(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text.trim())
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_url() {
        let urls = extract_candidates("look at https://example.com/video");
        assert_eq!(urls, vec!["https://example.com/video"]);
    }

    #[test]
    fn test_extract_multiple_urls_in_order() {
        let urls = extract_candidates("http://a.com/1 and https://b.com/2\nhttps://c.com");
        assert_eq!(urls, vec!["http://a.com/1", "https://b.com/2", "https://c.com"]);
    }

    #[test]
    fn test_extract_stops_at_whitespace() {
        let urls = extract_candidates("https://x.com/user/status/1?s=20 nice");
        assert_eq!(urls, vec!["https://x.com/user/status/1?s=20"]);
    }

    #[test]
    fn test_extract_none() {
        assert!(extract_candidates("no links here, just ftp://files").is_empty());
        assert!(extract_candidates("").is_empty());
    }

    #[test]
    fn test_parse_valid() {
        let candidate = UrlCandidate::parse("https://example.com/a").unwrap();
        assert_eq!(candidate.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_parse_keeps_original_spelling() {
        let candidate = UrlCandidate::parse("https://WWW.Example.COM/Path").unwrap();
        assert_eq!(candidate.to_string(), "https://WWW.Example.COM/Path");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            UrlCandidate::parse("not a url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert_eq!(
            UrlCandidate::parse("ftp://example.com/file"),
            Err(UrlValidationError::UnsupportedProtocol)
        );
        assert_eq!(
            UrlCandidate::parse("javascript:alert(1)"),
            Err(UrlValidationError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_parse_rejects_empty_host() {
        assert!(UrlCandidate::parse("https://").is_err());
    }
}
