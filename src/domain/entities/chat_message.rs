//! Transport-neutral view of an inbound chat message.

/// Kind of conversation a message arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// One-to-one conversation with the bot.
    Direct,
    /// Group, supergroup or any other multi-party chat.
    Group,
}

impl ChatKind {
    /// Maps a Telegram `chat.type` value onto a [`ChatKind`].
    pub fn from_telegram(chat_type: &str) -> Self {
        match chat_type {
            "group" | "supergroup" => Self::Group,
            _ => Self::Direct,
        }
    }

    pub fn is_group(self) -> bool {
        self == Self::Group
    }
}

/// A text message received from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub chat_id: i64,
    pub message_id: i64,
    pub kind: ChatKind,
    pub text: String,
    /// Sender of the message this one replies to, if any.
    pub reply_to_user_id: Option<i64>,
}
