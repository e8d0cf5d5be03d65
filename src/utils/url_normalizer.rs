//! URL normalization helpers.
//!
//! Strips tracking query strings from resolved URLs and extracts the
//! comparable host used by the download allow-list.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL has no scheme")]
    MissingScheme,

    #[error("URL has no host")]
    MissingHost,
}

/// Removes the query component from a URL.
///
/// # Normalization Rules
///
/// 1. **Query**: Removed entirely, along with the `?`
/// 2. **Fragment**: Preserved
/// 3. **Path**: Preserved with case sensitivity
/// 4. **Scheme and host**: Must be present and non-empty
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for unparseable input and
/// [`UrlNormalizationError::MissingScheme`] / [`UrlNormalizationError::MissingHost`]
/// when the URL cannot be used downstream.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     strip_query("https://x.com/u/status/1?s=20&t=abc").unwrap(),
///     "https://x.com/u/status/1"
/// );
/// ```
pub fn strip_query(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if url.scheme().is_empty() {
        return Err(UrlNormalizationError::MissingScheme);
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    url.set_query(None);

    Ok(url.to_string())
}

/// Returns the host of `input` lowercased and without a leading `www.`.
///
/// Returns `None` if the URL cannot be parsed or has no host.
pub fn normalized_host(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    if host.is_empty() { None } else { Some(host) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query_removes_tracking() {
        let result = strip_query("https://x.com/user/status/1?s=20&t=abc");
        assert_eq!(result.unwrap(), "https://x.com/user/status/1");
    }

    #[test]
    fn test_strip_query_without_query() {
        let result = strip_query("https://example.com/path/to/page");
        assert_eq!(result.unwrap(), "https://example.com/path/to/page");
    }

    #[test]
    fn test_strip_query_keeps_fragment() {
        let result = strip_query("https://example.com/page?key=value#section");
        assert_eq!(result.unwrap(), "https://example.com/page#section");
    }

    #[test]
    fn test_strip_query_preserves_path_case() {
        let result = strip_query("https://example.com/Path/ABC?q=1");
        assert_eq!(result.unwrap(), "https://example.com/Path/ABC");
    }

    #[test]
    fn test_strip_query_invalid_url() {
        assert!(matches!(
            strip_query("not a valid url"),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_strip_query_no_host() {
        assert!(matches!(
            strip_query("mailto:test@example.com"),
            Err(UrlNormalizationError::MissingHost)
        ));
    }

    #[test]
    fn test_strip_query_empty_string() {
        assert!(strip_query("").is_err());
    }

    #[test]
    fn test_normalized_host_strips_www_and_case() {
        assert_eq!(
            normalized_host("https://WWW.Example.COM/x").as_deref(),
            Some("example.com")
        );
        assert_eq!(
            normalized_host("https://example.com/x").as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn test_normalized_host_keeps_other_subdomains() {
        assert_eq!(
            normalized_host("https://m.vk.com/video").as_deref(),
            Some("m.vk.com")
        );
    }

    #[test]
    fn test_normalized_host_only_strips_leading_www() {
        assert_eq!(
            normalized_host("https://api.www.example.com").as_deref(),
            Some("api.www.example.com")
        );
    }

    #[test]
    fn test_normalized_host_ignores_port() {
        assert_eq!(
            normalized_host("http://localhost:3000/test").as_deref(),
            Some("localhost")
        );
    }

    #[test]
    fn test_normalized_host_invalid() {
        assert!(normalized_host("not a url").is_none());
        assert!(normalized_host("data:text/plain,Hello").is_none());
    }
}
