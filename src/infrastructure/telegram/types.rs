//! Bot API payloads, reduced to the fields the relay reads.

use crate::domain::entities::{ChatKind, ChatMessage};
use serde::Deserialize;

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseParameters {
    pub retry_after: Option<u64>,
}

/// The bot's own account, as returned by `getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
    pub reply_to_message: Option<RepliedMessage>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct RepliedMessage {
    pub from: Option<User>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
}

impl Update {
    /// Converts a text message update into a [`ChatMessage`].
    ///
    /// Returns `None` for updates without a text message (edits, photos,
    /// membership changes, ...).
    pub fn into_chat_message(self) -> Option<ChatMessage> {
        let message = self.message?;
        let text = message.text?;

        Some(ChatMessage {
            chat_id: message.chat.id,
            message_id: message.message_id,
            kind: ChatKind::from_telegram(&message.chat.kind),
            text,
            reply_to_user_id: message
                .reply_to_message
                .and_then(|replied| replied.from)
                .map(|user| user.id),
        })
    }
}
