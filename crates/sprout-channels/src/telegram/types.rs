//! Telegram Bot API (de)serialization types.

use serde::{Deserialize, Serialize};
use sprout_core::message::InlineKeyboard;

#[derive(Debug, Deserialize)]
pub(crate) struct TgResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUpdate {
    pub update_id: i64,
    pub message: Option<TgMessage>,
    pub callback_query: Option<TgCallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgMessage {
    pub message_id: i64,
    pub from: Option<TgUser>,
    pub chat: TgChat,
    /// Unix time the message was sent.
    #[serde(default)]
    pub date: i64,
    pub text: Option<String>,
    pub photo: Option<Vec<TgPhotoSize>>,
    pub caption: Option<String>,
}

/// The part of a sent `Message` the bot keeps.
#[derive(Debug, Deserialize)]
pub(crate) struct TgSentMessage {
    pub message_id: i64,
    #[serde(default)]
    pub date: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgCallbackQuery {
    pub id: String,
    pub from: TgUser,
    /// Message with the pressed keyboard; absent when too old.
    pub message: Option<TgMessage>,
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgFile {
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct TgPhotoSize {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
    pub file_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgChat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(default, rename = "type")]
    pub chat_type: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TgInlineButton<'a> {
    pub text: &'a str,
    pub callback_data: &'a str,
}

/// `reply_markup` for an inline keyboard.
#[derive(Debug, Serialize)]
pub(crate) struct TgInlineKeyboardMarkup<'a> {
    pub inline_keyboard: Vec<Vec<TgInlineButton<'a>>>,
}

impl<'a> From<&'a InlineKeyboard> for TgInlineKeyboardMarkup<'a> {
    fn from(keyboard: &'a InlineKeyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|b| TgInlineButton {
                            text: &b.text,
                            callback_data: &b.data,
                        })
                        .collect()
                })
                .collect(),
        }
    }
}
