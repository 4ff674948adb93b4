use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who sent an incoming event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sender {
    /// Platform user ID.
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
}

/// What the user did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Payload {
    /// A free-text message (commands included).
    Text(String),
    /// A photo attachment (largest size available).
    Photo {
        data: Vec<u8>,
        caption: Option<String>,
    },
    /// An inline-button press.
    Callback {
        /// Platform callback ID, used to acknowledge the press.
        id: String,
        data: String,
        /// The message carrying the pressed keyboard, if still available.
        message_id: Option<i64>,
    },
}

/// An incoming event from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingEvent {
    pub id: Uuid,
    /// Channel name (e.g. "telegram").
    pub channel: String,
    pub sender: Sender,
    /// Chat to reply into.
    pub chat_id: i64,
    pub payload: Payload,
    pub timestamp: DateTime<Utc>,
}

/// A single inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    /// Callback payload delivered back when pressed.
    pub data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }
}

/// An inline keyboard attached to a message, as rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }

    /// Every button, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}

/// An outgoing message to send through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    /// Message text, or the caption when `photo` is set.
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
    /// Image bytes; sends a photo message instead of plain text.
    #[serde(default)]
    pub photo: Option<Vec<u8>>,
}

impl OutgoingMessage {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_keyboard(mut self, keyboard: Option<InlineKeyboard>) -> Self {
        self.keyboard = keyboard;
        self
    }
}

/// A message the channel accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: i64,
    pub text: String,
    pub time: DateTime<Utc>,
}
