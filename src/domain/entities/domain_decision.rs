//! Allow-list verdict for a single URL.

/// Result of evaluating a URL's host against the download allow-list.
///
/// `host` is the normalized host (lowercase, no leading `www.`) or empty when
/// the URL had no parseable host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainDecision {
    pub host: String,
    pub allowed: bool,
}

impl DomainDecision {
    pub fn allowed(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            allowed: true,
        }
    }

    pub fn disallowed(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            allowed: false,
        }
    }
}
