use std::time::Duration;

use teloxide::payloads::GetUpdatesSetters;
use teloxide::prelude::*;
use teloxide::types::{AllowedUpdate, UpdateKind};
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::config::Config;

/// Run the long-poll loop for the lifetime of the process.
///
/// Telegram long polling has exclusive-lease semantics: exactly one poller
/// may run per bot token, system-wide, or updates get consumed interleaved
/// across consumers. Deploy as a single worker process.
pub async fn run(bot: Bot, config: Config) {
    if let Some(chat_id) = config.log_chat_id {
        // Best effort only; a missing notification must not stop the bot.
        match bot
            .send_message(ChatId(chat_id), "✅ flipbot started (long-polling mode)")
            .await
        {
            Ok(_) => info!("Startup notification sent to chat {}", chat_id),
            Err(e) => warn!("Failed to send startup notification: {}", e),
        }
    }

    info!("Telegram poller started");

    // Offset watermark. Owned by this task alone, never visible elsewhere.
    let mut offset: Option<i32> = None;

    loop {
        let mut request = bot
            .get_updates()
            .timeout(config.poll_timeout_sec)
            .allowed_updates([AllowedUpdate::Message]);
        if let Some(offset) = offset {
            request = request.offset(offset);
        }

        let updates = match request.await {
            Ok(updates) => updates,
            Err(e) => {
                error!("getUpdates failed: {}", e);
                tokio::time::sleep(Duration::from_secs(config.poll_sleep_sec)).await;
                continue;
            }
        };

        for update in updates {
            // Advance first: an update is consumed exactly once, whatever
            // its processing outcome.
            let update_id = update.id.0;
            offset = next_offset(offset, update_id);

            let message = match update.kind {
                UpdateKind::Message(message) => message,
                // Includes unparseable payloads (UpdateKind::Error); skip
                // the update, never the batch.
                _ => {
                    debug!("Skipping non-message update {}", update_id);
                    continue;
                }
            };

            let Some(text) = message.text() else {
                continue;
            };
            let chat_id = message.chat.id;

            // ThreadRng is not Send, so keep it out of the await below.
            let reply = {
                let mut rng = rand::thread_rng();
                commands::dispatch(text, &mut rng)
            };
            let Some(reply) = reply else {
                continue;
            };

            debug!("Command in chat {}: {}", chat_id.0, text);
            if let Err(e) = bot.send_message(chat_id, reply).await {
                error!("Failed to send reply to chat {}: {}", chat_id.0, e);
            }
        }
    }
}

/// Watermark for the next `getUpdates` call: one past the highest update id
/// seen so far, so a processed offset is never requested again.
fn next_offset(current: Option<i32>, update_id: u32) -> Option<i32> {
    let past_this = update_id as i32 + 1;
    Some(match current {
        Some(current) => current.max(past_this),
        None => past_this,
    })
}

#[cfg(test)]
mod tests {
    use super::next_offset;

    #[test]
    fn test_offset_advances_past_every_processed_update() {
        let mut offset = None;
        for id in [5, 6, 7] {
            offset = next_offset(offset, id);
        }
        assert_eq!(offset, Some(8));
    }

    #[test]
    fn test_offset_starts_one_past_first_update() {
        assert_eq!(next_offset(None, 41), Some(42));
    }

    #[test]
    fn test_offset_never_moves_backwards() {
        // Out-of-order delivery must not rewind the watermark.
        let offset = next_offset(Some(8), 5);
        assert_eq!(offset, Some(8));
    }
}
