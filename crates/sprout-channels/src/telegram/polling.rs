//! Long-polling update loop and Channel trait implementation.

use super::types::{TgCallbackQuery, TgFile, TgMessage, TgResponse, TgUpdate, TgUser};
use super::TelegramChannel;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sprout_core::{
    error::SproutError,
    message::{IncomingEvent, OutgoingMessage, Payload, SentMessage, Sender},
    traits::Channel,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingEvent>, SproutError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let bot_token = self.config.bot_token.clone();
        let allowed_users = self.config.allowed_users.clone();
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut url = format!("{base_url}/getUpdates?timeout=30");
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let resp = match client
                    .get(&url)
                    .timeout(std::time::Duration::from_secs(35))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                // Successful poll -- reset backoff.
                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    let event = if let Some(query) = update.callback_query {
                        callback_event(query)
                    } else if let Some(msg) = update.message {
                        match msg.photo.as_ref().and_then(|p| p.last()) {
                            // Telegram sends multiple sizes; the last is the largest.
                            Some(largest) if msg.text.is_none() => {
                                match download_telegram_file(
                                    &client,
                                    &base_url,
                                    &bot_token,
                                    &largest.file_id,
                                )
                                .await
                                {
                                    Ok(bytes) => {
                                        info!(
                                            "downloaded photo ({}x{})",
                                            largest.width, largest.height
                                        );
                                        let caption = msg.caption.clone();
                                        message_event(
                                            msg,
                                            Payload::Photo {
                                                data: bytes,
                                                caption,
                                            },
                                        )
                                    }
                                    Err(e) => {
                                        warn!("photo download failed: {e}");
                                        continue;
                                    }
                                }
                            }
                            _ => match msg.text.clone() {
                                Some(text) => message_event(msg, Payload::Text(text)),
                                None => continue,
                            },
                        }
                    } else {
                        continue;
                    };

                    let Some(event) = event else { continue };

                    // Auth check.
                    if !is_allowed(&allowed_users, event.sender.telegram_id) {
                        warn!(
                            "ignoring event from unauthorized user {}",
                            event.sender.telegram_id
                        );
                        continue;
                    }

                    if tx.send(event).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<SentMessage, SproutError> {
        match message.photo.as_deref() {
            Some(photo) if !photo.is_empty() => {
                self.send_photo_bytes(
                    message.chat_id,
                    photo,
                    &message.text,
                    message.keyboard.as_ref(),
                )
                .await
            }
            _ => {
                self.send_text(message.chat_id, &message.text, message.keyboard.as_ref())
                    .await
            }
        }
    }

    async fn edit(&self, message_id: i64, message: OutgoingMessage) -> Result<(), SproutError> {
        if message.photo.is_some() {
            return Err(SproutError::Channel(
                "telegram cannot turn a message into a photo by editing".into(),
            ));
        }
        self.edit_text(
            message.chat_id,
            message_id,
            &message.text,
            message.keyboard.as_ref(),
        )
        .await
    }

    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), SproutError> {
        self.delete_message(chat_id, message_id).await
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), SproutError> {
        self.answer_callback_query(callback_id).await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), SproutError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}

/// An empty allow-list admits everyone.
pub(crate) fn is_allowed(allowed_users: &[i64], telegram_id: i64) -> bool {
    allowed_users.is_empty() || allowed_users.contains(&telegram_id)
}

pub(crate) fn sender_of(user: &TgUser) -> Sender {
    Sender {
        telegram_id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_bot: user.is_bot,
    }
}

/// Build an event from a private-chat message. Group chats are dropped.
pub(crate) fn message_event(msg: TgMessage, payload: Payload) -> Option<IncomingEvent> {
    let user = msg.from.as_ref()?;

    if msg.chat.chat_type != "private" && !msg.chat.chat_type.is_empty() {
        debug!("telegram: ignoring non-private message from chat {}", msg.chat.id);
        return None;
    }

    Some(IncomingEvent {
        id: Uuid::new_v4(),
        channel: "telegram".to_string(),
        sender: sender_of(user),
        chat_id: msg.chat.id,
        payload,
        timestamp: DateTime::from_timestamp(msg.date, 0).unwrap_or_else(Utc::now),
    })
}

/// Build an event from an inline-button press.
pub(crate) fn callback_event(query: TgCallbackQuery) -> Option<IncomingEvent> {
    let data = query.data?;
    // Without the keyboard message the chat is the user's private chat.
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat.id)
        .unwrap_or(query.from.id);

    Some(IncomingEvent {
        id: Uuid::new_v4(),
        channel: "telegram".to_string(),
        sender: sender_of(&query.from),
        chat_id,
        payload: Payload::Callback {
            id: query.id,
            data,
            message_id: query.message.as_ref().map(|m| m.message_id),
        },
        timestamp: Utc::now(),
    })
}

/// Download a file from Telegram servers by file_id.
async fn download_telegram_file(
    client: &reqwest::Client,
    base_url: &str,
    bot_token: &str,
    file_id: &str,
) -> Result<Vec<u8>, SproutError> {
    // Step 1: getFile to obtain file_path.
    let url = format!("{base_url}/getFile?file_id={file_id}");
    let resp: TgResponse<TgFile> = client
        .get(&url)
        .send()
        .await
        .map_err(|e| SproutError::Channel(format!("telegram getFile failed: {e}")))?
        .json()
        .await
        .map_err(|e| SproutError::Channel(format!("telegram getFile parse failed: {e}")))?;

    let file_path = resp
        .result
        .and_then(|f| f.file_path)
        .ok_or_else(|| SproutError::Channel("telegram getFile returned no file_path".into()))?;

    // Step 2: Download the actual file bytes.
    let download_url = format!("https://api.telegram.org/file/bot{bot_token}/{file_path}");
    let bytes = client
        .get(&download_url)
        .send()
        .await
        .map_err(|e| SproutError::Channel(format!("telegram file download failed: {e}")))?
        .bytes()
        .await
        .map_err(|e| SproutError::Channel(format!("telegram file read failed: {e}")))?;

    Ok(bytes.to_vec())
}
