//! Canonical URL produced by redirect resolution.

/// How a [`ResolvedUrl`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Redirects were followed and the query was stripped.
    Followed,
    /// Resolution timed out; the input URL is carried forward unchanged.
    TimedOut,
    /// The redirect target was malformed; the input URL is carried forward.
    Malformed,
}

/// A URL after redirect following and query stripping.
///
/// Always holds a URL with a scheme and host: when resolution cannot produce
/// one, the original input is kept and [`Resolution`] records why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub url: String,
    pub resolution: Resolution,
}

impl ResolvedUrl {
    pub fn followed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            resolution: Resolution::Followed,
        }
    }

    pub fn fallback(original: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            url: original.into(),
            resolution,
        }
    }

    /// Returns true if the original URL was kept because resolution failed.
    pub fn is_fallback(&self) -> bool {
        self.resolution != Resolution::Followed
    }
}
