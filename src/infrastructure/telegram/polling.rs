//! Long-polling loop.

use super::client::{TelegramClient, TelegramError};
use crate::application::services::MessageService;
use crate::domain::entities::ChatMessage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Polls Telegram for messages until `shutdown` flips to `true`.
///
/// Each text message is handled on its own task so a slow download never
/// blocks the next poll. Network failures back off exponentially from 1s to
/// 60s; rate limits wait for the server-provided delay. A 409 conflict means
/// another process owns the token, and stops the loop.
pub async fn run_polling(
    client: TelegramClient,
    service: Arc<MessageService>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut offset: Option<i64> = None;
    let mut backoff = INITIAL_BACKOFF;

    info!("Telegram polling started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        let result = tokio::select! {
            res = client.get_updates(offset) => res,
            _ = shutdown.changed() => break,
        };

        let updates = match result {
            Ok(updates) => updates,
            Err(TelegramError::Conflict) => {
                error!("Telegram 409 conflict: another instance is polling this bot, stopping");
                break;
            }
            Err(TelegramError::RateLimited(retry_after)) => {
                warn!("Telegram rate limited, retrying after {}s", retry_after);
                if wait_or_shutdown(&mut shutdown, Duration::from_secs(retry_after)).await {
                    break;
                }
                continue;
            }
            Err(e) => {
                warn!("Telegram getUpdates failed: {}, retrying in {:?}", e, backoff);
                if wait_or_shutdown(&mut shutdown, backoff).await {
                    break;
                }
                backoff = next_backoff(backoff);
                continue;
            }
        };

        backoff = INITIAL_BACKOFF;

        for update in updates {
            offset = Some(update.update_id + 1);

            let Some(message) = update.into_chat_message() else {
                continue;
            };

            debug!(
                "Telegram message {} in chat {}",
                message.message_id, message.chat_id
            );

            tokio::spawn(reply(client.clone(), service.clone(), message));
        }
    }

    info!("Telegram polling stopped");
}

async fn reply(client: TelegramClient, service: Arc<MessageService>, message: ChatMessage) {
    for text in service.handle(&message).await {
        if let Err(e) = client
            .send_message(message.chat_id, &text, Some(message.message_id))
            .await
        {
            warn!(
                "Failed to reply to message {} in chat {}: {}",
                message.message_id, message.chat_id, e
            );
        }
    }
}

/// Sleeps for `delay`; returns true if shutdown was requested meanwhile.
async fn wait_or_shutdown(shutdown: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => false,
        _ = shutdown.changed() => true,
    }
}

fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}
