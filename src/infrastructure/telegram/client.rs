//! Typed Bot API client.

use super::types::{ApiResponse, BotIdentity, Update};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

const API_BASE: &str = "https://api.telegram.org";

/// Server-side wait for `getUpdates`, in seconds.
pub(crate) const LONG_POLL_TIMEOUT: u64 = 30;

/// Timeout for calls other than `getUpdates`.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default wait when a 429 response carries no `retry_after`.
const DEFAULT_RETRY_AFTER: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Http(reqwest::Error),

    #[error("Telegram rate limit hit, retry after {0}s")]
    RateLimited(u64),

    #[error("another client is already polling updates for this bot")]
    Conflict,

    #[error("Telegram API error ({status}): {description}")]
    Api { status: u16, description: String },
}

// Request URLs carry the bot token; errors are kept without them.
impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

/// Minimal Bot API client.
///
/// The bot token is embedded in every request path and never logged.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self::with_api_base(API_BASE, token)
    }

    /// Creates a client against a custom Bot API server.
    pub fn with_api_base(api_base: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
        }
    }

    /// Validates the token and returns the bot's own account.
    pub async fn get_me(&self) -> Result<BotIdentity, TelegramError> {
        self.call("getMe", json!({}), REQUEST_TIMEOUT).await
    }

    /// Long-polls for updates starting at `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let mut params = json!({
            "timeout": LONG_POLL_TIMEOUT,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            params["offset"] = json!(offset);
        }

        // Slightly longer than the server-side wait.
        let timeout = Duration::from_secs(LONG_POLL_TIMEOUT + 10);
        self.call("getUpdates", params, timeout).await
    }

    /// Sends a Markdown message, as a reply to `reply_to` when given.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<(), TelegramError> {
        let mut params = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });
        if let Some(message_id) = reply_to {
            params["reply_parameters"] = json!({
                "message_id": message_id,
                "allow_sending_without_reply": true,
            });
        }

        let _: serde_json::Value = self.call("sendMessage", params, REQUEST_TIMEOUT).await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
        timeout: Duration,
    ) -> Result<T, TelegramError> {
        let response = self
            .client
            .post(format!("{}/{}", self.endpoint, method))
            .json(&params)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body: ApiResponse<T> = response.json().await?;

        if body.ok
            && let Some(result) = body.result
        {
            return Ok(result);
        }

        Err(match status {
            429 => TelegramError::RateLimited(
                body.parameters
                    .and_then(|p| p.retry_after)
                    .unwrap_or(DEFAULT_RETRY_AFTER),
            ),
            409 => TelegramError::Conflict,
            _ => TelegramError::Api {
                status,
                description: body
                    .description
                    .unwrap_or_else(|| format!("{method} returned no result")),
            },
        })
    }
}
