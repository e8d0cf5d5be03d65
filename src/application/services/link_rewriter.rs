//! Embed-friendly link rewriting.
//!
//! Two independent rule tables:
//!
//! - **YouTube**: three anchored patterns (music, www, short links), each
//!   mapped to its own alternate host with the video id kept.
//! - **Rewrite map**: ordered platform prefixes (Spotify, Instagram posts and
//!   reels, Reddit, TikTok, Twitter/X) replaced by embed-friendly hosts.
//!
//! Both tables are plain data; adding a platform means adding a row.

use regex::Regex;
use std::sync::LazyLock;

/// A single substitution rule.
///
/// `pattern` must be anchored at the start of the URL. Only the matched span
/// is replaced; the rest of the URL is carried over unchanged.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    /// Compiles a rule. `replacement` may reference capture groups as `${1}`.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error for an invalid pattern.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    fn apply(&self, url: &str) -> Option<String> {
        if !self.pattern.is_match(url) {
            return None;
        }

        Some(
            self.pattern
                .replace(url, self.replacement.as_str())
                .into_owned(),
        )
    }
}

const YOUTUBE_RULES: &[(&str, &str)] = &[
    (
        r"^https://music\.youtube\.com/watch\?v=([a-zA-Z0-9_-]+)",
        "https://music.yfxtube.com/watch?v=${1}",
    ),
    (
        r"^https://www\.youtube\.com/watch\?v=([a-zA-Z0-9_-]+)",
        "https://www.yfxtube.com/watch?v=${1}",
    ),
    (r"^https://youtu\.be/([a-zA-Z0-9_-]+)", "https://fxyoutu.be/${1}"),
];

const REWRITE_MAP: &[(&str, &str)] = &[
    (r"^https://(open\.)?spotify\.com", "https://fxspotify.com"),
    (
        r"^https://(www\.)?instagram\.com/p/",
        "https://www.ddinstagram.com/p/",
    ),
    (
        r"^https://(www\.)?instagram\.com/reel/",
        "https://www.ddinstagram.com/reel/",
    ),
    (r"^https://(www\.)?reddit\.com", "https://rxddit.com"),
    (r"^https://(www\.)?tiktok\.com", "https://tfxktok.com"),
    (r"^https://(www\.)?twitter\.com", "https://www.fxtwitter.com"),
    (r"^https://(www\.)?x\.com", "https://www.fxtwitter.com"),
];

static DEFAULT_YOUTUBE_RULES: LazyLock<Vec<RewriteRule>> =
    LazyLock::new(|| compile_table(YOUTUBE_RULES));

static DEFAULT_REWRITE_MAP: LazyLock<Vec<RewriteRule>> =
    LazyLock::new(|| compile_table(REWRITE_MAP));

fn compile_table(table: &[(&str, &str)]) -> Vec<RewriteRule> {
    table
        .iter()
        .map(|(pattern, replacement)| RewriteRule::new(pattern, *replacement).unwrap())
        .collect()
}

/// Maps platform URLs to embed-friendly alternates.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    youtube_rules: Vec<RewriteRule>,
    rewrite_map: Vec<RewriteRule>,
}

impl Default for LinkRewriter {
    fn default() -> Self {
        Self::with_rules(DEFAULT_YOUTUBE_RULES.clone(), DEFAULT_REWRITE_MAP.clone())
    }
}

impl LinkRewriter {
    /// Creates a rewriter with the built-in rule tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rewriter with custom rule tables, evaluated in order.
    pub fn with_rules(youtube_rules: Vec<RewriteRule>, rewrite_map: Vec<RewriteRule>) -> Self {
        Self {
            youtube_rules,
            rewrite_map,
        }
    }

    /// Applies the first matching rewrite-map rule.
    ///
    /// Returns `url` unchanged if no rule matches.
    pub fn rewrite(&self, url: &str) -> String {
        first_match(&self.rewrite_map, url).unwrap_or_else(|| url.to_string())
    }

    /// Returns the YouTube alternate for `url`, or `None` if it is not a
    /// recognised YouTube video link.
    pub fn youtube_alternative(&self, url: &str) -> Option<String> {
        first_match(&self.youtube_rules, url)
    }
}

fn first_match(rules: &[RewriteRule], url: &str) -> Option<String> {
    rules.iter().find_map(|rule| rule.apply(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> LinkRewriter {
        LinkRewriter::new()
    }

    #[test]
    fn test_x_collapses_to_twitter_replacement() {
        assert_eq!(
            rewriter().rewrite("https://x.com/user/status/1"),
            "https://www.fxtwitter.com/user/status/1"
        );
    }

    #[test]
    fn test_twitter_with_www() {
        assert_eq!(
            rewriter().rewrite("https://www.twitter.com/user/status/1"),
            "https://www.fxtwitter.com/user/status/1"
        );
    }

    #[test]
    fn test_spotify_open_subdomain() {
        assert_eq!(
            rewriter().rewrite("https://open.spotify.com/track/42"),
            "https://fxspotify.com/track/42"
        );
    }

    #[test]
    fn test_instagram_post_and_reel() {
        assert_eq!(
            rewriter().rewrite("https://www.instagram.com/p/Cabc/"),
            "https://www.ddinstagram.com/p/Cabc/"
        );
        assert_eq!(
            rewriter().rewrite("https://instagram.com/reel/Cxyz/"),
            "https://www.ddinstagram.com/reel/Cxyz/"
        );
    }

    #[test]
    fn test_instagram_profile_is_not_rewritten() {
        let url = "https://www.instagram.com/someone/";
        assert_eq!(rewriter().rewrite(url), url);
    }

    #[test]
    fn test_reddit_and_tiktok() {
        assert_eq!(
            rewriter().rewrite("https://www.reddit.com/r/rust/comments/1"),
            "https://rxddit.com/r/rust/comments/1"
        );
        assert_eq!(
            rewriter().rewrite("https://www.tiktok.com/@user/video/1"),
            "https://tfxktok.com/@user/video/1"
        );
    }

    #[test]
    fn test_only_prefix_is_replaced() {
        assert_eq!(
            rewriter().rewrite("https://x.com/x.com/status/1?ref=x.com"),
            "https://www.fxtwitter.com/x.com/status/1?ref=x.com"
        );
    }

    #[test]
    fn test_match_is_anchored() {
        let url = "https://example.com/?next=https://x.com/a";
        assert_eq!(rewriter().rewrite(url), url);
    }

    #[test]
    fn test_lookalike_host_is_not_rewritten() {
        let url = "https://xx.com/user";
        assert_eq!(rewriter().rewrite(url), url);
    }

    #[test]
    fn test_no_match_is_identity() {
        let url = "https://example.com/video.mp4";
        assert_eq!(rewriter().rewrite(url), url);
    }

    #[test]
    fn test_youtube_short_link() {
        assert_eq!(
            rewriter().youtube_alternative("https://youtu.be/abc123").as_deref(),
            Some("https://fxyoutu.be/abc123")
        );
    }

    #[test]
    fn test_youtube_watch_links() {
        assert_eq!(
            rewriter()
                .youtube_alternative("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
                .as_deref(),
            Some("https://www.yfxtube.com/watch?v=dQw4w9WgXcQ")
        );
        assert_eq!(
            rewriter()
                .youtube_alternative("https://music.youtube.com/watch?v=a_b-C")
                .as_deref(),
            Some("https://music.yfxtube.com/watch?v=a_b-C")
        );
    }

    #[test]
    fn test_youtube_keeps_trailing_parameters() {
        assert_eq!(
            rewriter()
                .youtube_alternative("https://www.youtube.com/watch?v=abc&t=42")
                .as_deref(),
            Some("https://www.yfxtube.com/watch?v=abc&t=42")
        );
    }

    #[test]
    fn test_youtube_no_match() {
        assert!(rewriter().youtube_alternative("https://x.com/a").is_none());
        assert!(
            rewriter()
                .youtube_alternative("https://www.youtube.com/@channel")
                .is_none()
        );
    }

    #[test]
    fn test_youtube_is_not_in_rewrite_map() {
        let url = "https://youtu.be/abc123";
        assert_eq!(rewriter().rewrite(url), url);
    }

    #[test]
    fn test_custom_rules_are_data_driven() {
        let rewriter = LinkRewriter::with_rules(
            vec![],
            vec![
                RewriteRule::new(r"^https://(www\.)?bsky\.app", "https://bskx.app").unwrap(),
                RewriteRule::new(r"^https://bsky\.app", "https://never.example").unwrap(),
            ],
        );
        assert_eq!(
            rewriter.rewrite("https://bsky.app/profile/a/post/1"),
            "https://bskx.app/profile/a/post/1"
        );
        assert!(rewriter.youtube_alternative("https://youtu.be/abc").is_none());
    }

    #[test]
    fn test_invalid_rule_pattern() {
        assert!(RewriteRule::new("(", "x").is_err());
    }
}
