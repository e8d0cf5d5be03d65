//! Tagged result of processing one URL.

/// What the relay decided to do with a single URL.
///
/// Produced once per URL by
/// [`crate::application::services::RequestOrchestrator`] and rendered by the
/// transport with [`ProcessingOutcome::text`]. `original` always refers to the
/// resolved URL the decision was made on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// Media was fetched and is reachable at `link`.
    Downloaded { link: String, original: String },
    /// Download was not possible; an alternate link is offered instead.
    Rewritten { rewritten: String, original: String },
    /// The host is not on the allow-list.
    Disallowed {
        original: String,
        rewritten: Option<String>,
    },
    /// The platform is never downloadable (YouTube); an alternate link is offered.
    Unsupported { rewritten: String, original: String },
    /// Nothing worth saying; transports must not reply.
    Silent,
    /// A user-facing error such as an invalid URL.
    Error(String),
}

impl ProcessingOutcome {
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Silent)
    }

    /// Short lowercase label, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Downloaded { .. } => "downloaded",
            Self::Rewritten { .. } => "rewritten",
            Self::Disallowed { .. } => "disallowed",
            Self::Unsupported { .. } => "unsupported",
            Self::Silent => "silent",
            Self::Error(_) => "error",
        }
    }

    /// Renders the Markdown reply for this outcome, or `None` for [`Self::Silent`].
    pub fn text(&self) -> Option<String> {
        let text = match self {
            Self::Downloaded { link, original } => {
                format!("[⏯️ Watch or ⏬ Download]({link})\n\n[📎]({original})")
            }
            Self::Rewritten {
                rewritten,
                original,
            } => format!(
                "Here is an alternative link, which Telegram may parse better: \
                 \n\n[📎 Modified URL]({rewritten})\n\n[📎]({original})"
            ),
            Self::Disallowed {
                original,
                rewritten: None,
            } => format!("This domain is not allowed for downloading. \n\n[📎 Original]({original})"),
            Self::Disallowed {
                original,
                rewritten: Some(rewritten),
            } => format!(
                "This domain is not allowed for downloading, but here's an alternative link:\
                 \n\n[📎 Modified URL]({rewritten})\n\n[📎 Original]({original})"
            ),
            Self::Unsupported {
                rewritten,
                original,
            } => format!(
                "YouTube video cannot be downloaded, but here’s an alternative link:\
                 \n\n[📎 Modified URL]({rewritten})\n\n[📎 Original]({original})"
            ),
            Self::Silent => return None,
            Self::Error(message) => message.clone(),
        };

        Some(text)
    }
}
