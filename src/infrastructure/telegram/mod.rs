//! Telegram Bot API transport.
//!
//! Talks to the Bot API directly with `reqwest`: `getMe` to learn the bot's
//! identity, `getUpdates` long polling for inbound messages and
//! `sendMessage` for replies.
//!
//! - [`TelegramClient`] - Typed Bot API calls
//! - [`run_polling`] - Long-polling loop feeding a [`crate::application::services::MessageService`]

mod client;
mod polling;
mod types;

pub use client::{TelegramClient, TelegramError};
pub use polling::run_polling;
pub use types::{BotIdentity, Update};
