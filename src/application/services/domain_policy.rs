//! Download allow-list evaluation.

use std::collections::BTreeSet;

use crate::domain::entities::DomainDecision;
use crate::utils::url_normalizer::normalized_host;

/// Decides whether media may be downloaded from a URL's host.
///
/// A host is allowed if it equals an allow-list entry or is a subdomain of
/// one (`m.vk.com` matches `vk.com`, `notvk.com` does not). Hosts are
/// compared lowercased and without a leading `www.`. An empty allow-list
/// means downloads are disabled and nothing is allowed.
#[derive(Debug, Clone, Default)]
pub struct DomainPolicy {
    allow_list: BTreeSet<String>,
}

impl DomainPolicy {
    /// Creates a policy from raw allow-list entries.
    ///
    /// Entries are trimmed, lowercased and stripped of `www.` and surrounding
    /// dots; blank entries are ignored.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allow_list = entries
            .into_iter()
            .filter_map(|entry| normalize_entry(entry.as_ref()))
            .collect();

        Self { allow_list }
    }

    /// Parses a comma-separated allow-list such as `DOWNLOAD_ALLOWED_DOMAINS`.
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.allow_list.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.allow_list.iter().map(String::as_str)
    }

    /// Evaluates `url` against the allow-list.
    pub fn evaluate(&self, url: &str) -> DomainDecision {
        let Some(host) = normalized_host(url) else {
            return DomainDecision::disallowed("");
        };

        if self.allow_list.iter().any(|entry| host_matches(&host, entry)) {
            DomainDecision::allowed(host)
        } else {
            DomainDecision::disallowed(host)
        }
    }

    /// Returns true if media may be downloaded from `url`.
    pub fn is_allowed(&self, url: &str) -> bool {
        self.evaluate(url).allowed
    }
}

fn normalize_entry(entry: &str) -> Option<String> {
    let entry = entry.trim().trim_matches('.').to_ascii_lowercase();
    let entry = entry.strip_prefix("www.").unwrap_or(&entry);

    if entry.is_empty() {
        None
    } else {
        Some(entry.to_string())
    }
}

fn host_matches(host: &str, entry: &str) -> bool {
    host == entry
        || host
            .strip_suffix(entry)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let policy = DomainPolicy::new(["example.com"]);
        assert!(policy.is_allowed("https://example.com/x"));
    }

    #[test]
    fn test_www_and_case_are_normalized() {
        let policy = DomainPolicy::new(["example.com"]);
        assert_eq!(
            policy.evaluate("https://WWW.Example.COM/x"),
            policy.evaluate("https://example.com/x")
        );
        assert!(policy.is_allowed("https://WWW.Example.COM/x"));
    }

    #[test]
    fn test_entries_are_normalized() {
        let policy = DomainPolicy::new(["  WWW.VK.com ", ".tiktok.com."]);
        assert!(policy.is_allowed("https://vk.com/video1"));
        assert!(policy.is_allowed("https://www.tiktok.com/@user/video/1"));
    }

    #[test]
    fn test_subdomain_match() {
        let policy = DomainPolicy::new(["vk.com"]);
        assert!(policy.is_allowed("https://m.vk.com/video1"));
    }

    #[test]
    fn test_suffix_must_be_dot_bounded() {
        let policy = DomainPolicy::new(["vk.com"]);
        assert!(!policy.is_allowed("https://notvk.com/video1"));
    }

    #[test]
    fn test_empty_allow_list_is_fail_closed() {
        let policy = DomainPolicy::from_csv("");
        assert!(policy.is_empty());
        assert!(!policy.is_allowed("https://example.com"));
    }

    #[test]
    fn test_from_csv_skips_blank_entries() {
        let policy = DomainPolicy::from_csv("vk.com, ,tiktok.com,");
        assert_eq!(policy.entries().collect::<Vec<_>>(), vec!["tiktok.com", "vk.com"]);
    }

    #[test]
    fn test_unparseable_url_is_disallowed() {
        let policy = DomainPolicy::new(["example.com"]);
        let decision = policy.evaluate("not a url");
        assert!(!decision.allowed);
        assert_eq!(decision.host, "");
    }

    #[test]
    fn test_decision_reports_normalized_host() {
        let policy = DomainPolicy::new(["vk.com"]);
        let decision = policy.evaluate("https://www.reddit.com/r/rust");
        assert_eq!(decision, DomainDecision::disallowed("reddit.com"));
    }
}
