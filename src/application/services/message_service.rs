//! Chat message handling on top of the orchestrator.

use std::sync::Arc;

use crate::application::services::RequestOrchestrator;
use crate::domain::entities::{ChatMessage, extract_candidates};

/// Reply to `/start`.
pub const GREETING: &str = "Hello! Send me a URL to process!";

/// Reply to a direct message without any URL in it.
pub const NO_URL_HINT: &str = "Please send a valid URL to process!";

/// Reply to group members answering one of the bot's own messages.
pub const APOLOGY: &str = "Please do not be mad at me 🥺. I am not very clever bot 👉👈\
\n\nI am very sorry if I did not help you 😢\
\n\nSometimes I use external tools to help you, but they can be offline or could not \
parse media too. Especially if we are talking about 🤬🤬🤬🤬ing Facebook \
\n\nPlease donate to [Centre T](https://translyaciya.com/help_eng) 🫶";

/// Turns inbound chat messages into reply texts.
///
/// Every URL in a message is processed concurrently; each non-silent outcome
/// becomes one reply, in the order the URLs appear.
pub struct MessageService {
    orchestrator: Arc<RequestOrchestrator>,
    bot_user_id: Option<i64>,
}

impl MessageService {
    /// Creates a message service.
    ///
    /// `bot_user_id` identifies the bot's own messages so replies to them in
    /// groups can be recognised.
    pub fn new(orchestrator: Arc<RequestOrchestrator>, bot_user_id: Option<i64>) -> Self {
        Self {
            orchestrator,
            bot_user_id,
        }
    }

    /// Returns the replies to send for `message`, possibly none.
    pub async fn handle(&self, message: &ChatMessage) -> Vec<String> {
        let is_group = message.kind.is_group();

        if is_start_command(&message.text) {
            return vec![GREETING.to_string()];
        }

        if is_group
            && message.reply_to_user_id.is_some()
            && message.reply_to_user_id == self.bot_user_id
        {
            return vec![APOLOGY.to_string()];
        }

        let urls = extract_candidates(&message.text);
        if urls.is_empty() {
            return if is_group {
                Vec::new()
            } else {
                vec![NO_URL_HINT.to_string()]
            };
        }

        self.orchestrator
            .process_all(&urls, is_group)
            .await
            .iter()
            .filter_map(|outcome| outcome.text())
            .collect()
    }
}

fn is_start_command(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .is_some_and(|word| word == "/start" || word.starts_with("/start@"))
}
