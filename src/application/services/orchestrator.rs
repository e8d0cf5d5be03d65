//! End-to-end URL processing pipeline.

use futures::FutureExt;
use futures::future::join_all;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::application::services::{DomainPolicy, LinkRewriter, MediaFetcher};
use crate::domain::entities::{ProcessingOutcome, Resolution, UrlCandidate};
use crate::domain::gateways::RedirectResolver;

/// Tunables for [`RequestOrchestrator`].
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Host (no scheme) serving the content store, used in download links.
    pub base_url: String,
    /// Timeout for a single redirect resolution.
    pub redirect_timeout: Duration,
    /// Upper bound on one media fetch, including time spent waiting on a
    /// coalesced download.
    pub download_timeout: Duration,
}

/// Runs the relay pipeline for individual URLs.
///
/// # Pipeline
///
/// 1. Resolve redirects
/// 2. Check the resolved host against the allow-list; disallowed hosts get
///    a rewritten link, a plain refusal, or silence in groups
/// 3. YouTube links are never downloaded; their alternate link is returned
/// 4. Fetch the media and link to the hosted copy
/// 5. On fetch failure fall back to the rewritten link, or silence in groups
///    when there is nothing better to offer
///
/// Failures never escape [`RequestOrchestrator::process`]: resolver errors,
/// fetch errors, timeouts and panics all end in the step 5 fallback.
pub struct RequestOrchestrator {
    resolver: Arc<dyn RedirectResolver>,
    policy: DomainPolicy,
    rewriter: LinkRewriter,
    fetcher: MediaFetcher,
    settings: OrchestratorSettings,
}

impl RequestOrchestrator {
    pub fn new(
        resolver: Arc<dyn RedirectResolver>,
        policy: DomainPolicy,
        rewriter: LinkRewriter,
        fetcher: MediaFetcher,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            resolver,
            policy,
            rewriter,
            fetcher,
            settings,
        }
    }

    pub fn policy(&self) -> &DomainPolicy {
        &self.policy
    }

    pub fn rewriter(&self) -> &LinkRewriter {
        &self.rewriter
    }

    /// Processes one URL and returns the outcome to show the user.
    ///
    /// `is_group` selects the group-chat behaviour where "nothing useful to
    /// say" results in [`ProcessingOutcome::Silent`].
    pub async fn process(&self, url: &str, is_group: bool) -> ProcessingOutcome {
        match AssertUnwindSafe(self.run(url, is_group)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Unknown error processing URL: {}", url);
                self.fallback(url, is_group)
            }
        }
    }

    /// Validates and processes several raw URLs concurrently.
    ///
    /// Outcomes are returned in input order. An invalid URL yields
    /// [`ProcessingOutcome::Error`] without affecting its siblings.
    pub async fn process_all(&self, urls: &[String], is_group: bool) -> Vec<ProcessingOutcome> {
        join_all(urls.iter().map(|raw| self.process_raw(raw, is_group))).await
    }

    async fn process_raw(&self, raw: &str, is_group: bool) -> ProcessingOutcome {
        match UrlCandidate::parse(raw) {
            Ok(candidate) => self.process(candidate.as_str(), is_group).await,
            Err(e) => {
                warn!("Validation error for URL: {} - {}", raw, e);
                ProcessingOutcome::Error(format!("Invalid URL provided: {raw}"))
            }
        }
    }

    async fn run(&self, url: &str, is_group: bool) -> ProcessingOutcome {
        let resolved = match self
            .resolver
            .resolve(url, self.settings.redirect_timeout)
            .await
        {
            Ok(resolved) => {
                match resolved.resolution {
                    Resolution::Followed => {}
                    Resolution::TimedOut => warn!(
                        "Timeout for URL: {} after {:?}",
                        url, self.settings.redirect_timeout
                    ),
                    Resolution::Malformed => warn!("Invalid redirect URL for: {}", url),
                }
                resolved.url
            }
            Err(e) => {
                error!("Failed to resolve {}: {}", url, e);
                return self.fallback(url, is_group);
            }
        };

        let decision = self.policy.evaluate(&resolved);
        if !decision.allowed {
            debug!(host = %decision.host, "Domain not allowed for download");
            let rewritten = self.rewriter.rewrite(&resolved);

            if rewritten == resolved {
                return if is_group {
                    ProcessingOutcome::Silent
                } else {
                    ProcessingOutcome::Disallowed {
                        original: resolved,
                        rewritten: None,
                    }
                };
            }

            return ProcessingOutcome::Disallowed {
                original: resolved,
                rewritten: Some(rewritten),
            };
        }

        // Resolution strips the query, which carries the video id of
        // `watch?v=` links, so the raw input gets a second look.
        let youtube = self
            .rewriter
            .youtube_alternative(&resolved)
            .or_else(|| self.rewriter.youtube_alternative(url));
        if let Some(rewritten) = youtube {
            return ProcessingOutcome::Unsupported {
                rewritten,
                original: resolved,
            };
        }

        match tokio::time::timeout(self.settings.download_timeout, self.fetcher.fetch(&resolved))
            .await
        {
            Ok(Ok(path)) => ProcessingOutcome::Downloaded {
                link: self.hosted_link(&resolved, &path),
                original: resolved,
            },
            Ok(Err(e)) => {
                debug!("Fetch failed for {}: {}", resolved, e);
                self.fallback(&resolved, is_group)
            }
            Err(_) => {
                warn!(
                    "Download for {} exceeded {:?}",
                    resolved, self.settings.download_timeout
                );
                self.fallback(&resolved, is_group)
            }
        }
    }

    fn fallback(&self, url: &str, is_group: bool) -> ProcessingOutcome {
        let rewritten = self.rewriter.rewrite(url);

        if rewritten == url && is_group {
            info!("No alternative for {} in group chat, staying silent", url);
            return ProcessingOutcome::Silent;
        }

        ProcessingOutcome::Rewritten {
            rewritten,
            original: url.to_string(),
        }
    }

    fn hosted_link(&self, url: &str, path: &Path) -> String {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.fetcher.file_name(url));

        format!(
            "https://{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            file_name
        )
    }
}
