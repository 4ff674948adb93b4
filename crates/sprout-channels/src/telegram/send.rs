//! Outbound Bot API calls: send, edit, delete, and callback acknowledgement.

use super::types::{TgInlineKeyboardMarkup, TgResponse, TgSentMessage};
use super::TelegramChannel;
use chrono::{DateTime, Utc};
use sprout_core::{
    error::SproutError,
    message::{InlineKeyboard, SentMessage},
};
use tracing::{info, warn};

/// Telegram rejects text messages longer than this.
pub(crate) const MAX_MESSAGE_LEN: usize = 4096;

/// Photo captions have a tighter limit than text.
pub(crate) const MAX_CAPTION_LEN: usize = 1024;

impl TelegramChannel {
    /// Send a text message, splitting it when it exceeds the Telegram limit.
    /// The keyboard is attached to the last chunk, whose identity is returned.
    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, SproutError> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let last = chunks.len().saturating_sub(1);
        let mut sent = None;

        for (i, chunk) in chunks.iter().enumerate() {
            let mut body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });
            if i == last {
                if let Some(kb) = keyboard {
                    body["reply_markup"] = reply_markup(kb);
                }
            }

            let resp: TgResponse<TgSentMessage> = self
                .client
                .post(format!("{}/sendMessage", self.base_url))
                .json(&body)
                .send()
                .await
                .map_err(|e| SproutError::Channel(format!("telegram send failed: {e}")))?
                .json()
                .await
                .map_err(|e| SproutError::Channel(format!("telegram send parse failed: {e}")))?;

            sent = Some(into_result(resp, "sendMessage")?);
        }

        let msg = sent.ok_or_else(|| SproutError::Channel("telegram send: empty text".into()))?;
        Ok(to_sent(msg, text))
    }

    /// Send a photo with a caption and optional keyboard.
    pub(crate) async fn send_photo_bytes(
        &self,
        chat_id: i64,
        image: &[u8],
        caption: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, SproutError> {
        let part = reqwest::multipart::Part::bytes(image.to_vec())
            .file_name("photo.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| SproutError::Channel(format!("mime error: {e}")))?;

        let caption = truncate_chars(caption, MAX_CAPTION_LEN);
        let mut form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.clone())
            .part("photo", part);
        if let Some(kb) = keyboard {
            form = form.text("reply_markup", reply_markup(kb).to_string());
        }

        let resp: TgResponse<TgSentMessage> = self
            .client
            .post(format!("{}/sendPhoto", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| SproutError::Channel(format!("telegram sendPhoto failed: {e}")))?
            .json()
            .await
            .map_err(|e| SproutError::Channel(format!("telegram sendPhoto parse failed: {e}")))?;

        let msg = into_result(resp, "sendPhoto")?;
        Ok(to_sent(msg, &caption))
    }

    /// Replace the text and keyboard of an earlier text message.
    pub(crate) async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), SproutError> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": truncate_chars(text, MAX_MESSAGE_LEN),
        });
        if let Some(kb) = keyboard {
            body["reply_markup"] = reply_markup(kb);
        }

        let resp: TgResponse<serde_json::Value> = self
            .client
            .post(format!("{}/editMessageText", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SproutError::Channel(format!("telegram edit failed: {e}")))?
            .json()
            .await
            .map_err(|e| SproutError::Channel(format!("telegram edit parse failed: {e}")))?;

        into_result(resp, "editMessageText").map(|_| ())
    }

    pub(crate) async fn delete_message(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<(), SproutError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });

        let resp: TgResponse<serde_json::Value> = self
            .client
            .post(format!("{}/deleteMessage", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SproutError::Channel(format!("telegram delete failed: {e}")))?
            .json()
            .await
            .map_err(|e| SproutError::Channel(format!("telegram delete parse failed: {e}")))?;

        into_result(resp, "deleteMessage").map(|_| ())
    }

    /// Stop the loading spinner on a pressed button. Best-effort.
    pub(crate) async fn answer_callback_query(&self, callback_id: &str) {
        let body = serde_json::json!({ "callback_query_id": callback_id });
        let url = format!("{}/answerCallbackQuery", self.base_url);
        if let Err(e) = self.client.post(&url).json(&body).send().await {
            warn!("telegram answerCallbackQuery failed: {e}");
        }
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = serde_json::json!({
            "commands": [
                { "command": "start", "description": "Начать работу с ботом" },
                { "command": "menu", "description": "Главное меню" },
                { "command": "groups", "description": "Сценарии полива" },
                { "command": "plants", "description": "Мои растения" },
                { "command": "cancel", "description": "Отменить текущее действие" },
                { "command": "help", "description": "Справка" },
            ]
        });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }
}

/// Render an inline keyboard as a `reply_markup` JSON value.
pub(crate) fn reply_markup(keyboard: &InlineKeyboard) -> serde_json::Value {
    serde_json::to_value(TgInlineKeyboardMarkup::from(keyboard))
        .unwrap_or_else(|_| serde_json::json!({ "inline_keyboard": [] }))
}

fn into_result<T>(resp: TgResponse<T>, method: &str) -> Result<T, SproutError> {
    if !resp.ok {
        return Err(SproutError::Channel(format!(
            "telegram {method} error: {}",
            resp.description.unwrap_or_default()
        )));
    }
    resp.result
        .ok_or_else(|| SproutError::Channel(format!("telegram {method} returned no result")))
}

fn to_sent(msg: TgSentMessage, text: &str) -> SentMessage {
    SentMessage {
        id: msg.message_id,
        text: text.to_string(),
        time: DateTime::from_timestamp(msg.date, 0).unwrap_or_else(Utc::now),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Split a long message into chunks that respect the limit, preferring
/// newline boundaries.
pub(crate) fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        let mut boundary = max_len;
        while !remaining.is_char_boundary(boundary) {
            boundary -= 1;
        }
        let split_at = remaining[..boundary]
            .rfind('\n')
            .filter(|&i| i > 0)
            .unwrap_or(boundary);

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start_matches('\n');
    }

    chunks
}
