//! Shared fixtures for binary-crate tests.

use async_trait::async_trait;
use chrono::Utc;
use sprout_core::{
    config::DatabaseConfig,
    entities::User,
    error::SproutError,
    message::{IncomingEvent, OutgoingMessage, SentMessage},
    traits::Channel,
};
use sprout_store::Store;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

use crate::usecases::UseCases;

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create a temporary on-disk store for testing (unique per call).
pub async fn test_store() -> Store {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir =
        std::env::temp_dir().join(format!("__sprout_test_{}_{}__", std::process::id(), id));
    let _ = std::fs::create_dir_all(&dir);
    let db_path = dir.join("test.db").to_string_lossy().to_string();
    let _ = std::fs::remove_file(&db_path);
    let config = DatabaseConfig {
        db_path,
        max_connections: 1,
        ..Default::default()
    };
    Store::new(&config).await.unwrap()
}

pub async fn test_usecases() -> UseCases {
    UseCases::new(test_store().await)
}

/// Register a user with the given Telegram id; returns the internal id.
pub async fn register(usecases: &UseCases, telegram_id: i64) -> i64 {
    let user = User {
        telegram_id,
        firstname: "Анна".into(),
        username: Some(format!("user{telegram_id}")),
        ..Default::default()
    };
    usecases.save_user(&user).await.unwrap()
}

/// A channel that records everything instead of talking to a platform.
pub struct RecordingChannel {
    next_id: AtomicI64,
    failing_chat: Option<i64>,
    fail_edits: bool,
    panic_on_callback: bool,
    pub sent: Mutex<Vec<(i64, OutgoingMessage)>>,
    pub edited: Mutex<Vec<(i64, OutgoingMessage)>>,
    pub deleted: Mutex<Vec<(i64, i64)>>,
    pub answered: Mutex<Vec<String>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1000),
            failing_chat: None,
            fail_edits: false,
            panic_on_callback: false,
            sent: Mutex::new(Vec::new()),
            edited: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            answered: Mutex::new(Vec::new()),
        }
    }

    /// Sends to `chat_id` fail.
    pub fn failing_for(chat_id: i64) -> Self {
        Self {
            failing_chat: Some(chat_id),
            ..Self::new()
        }
    }

    /// Every edit fails, as for messages that can no longer be edited.
    pub fn without_edits() -> Self {
        Self {
            fail_edits: true,
            ..Self::new()
        }
    }

    /// Answering a button press panics.
    pub fn panicking_on_callbacks() -> Self {
        Self {
            panic_on_callback: true,
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<(i64, OutgoingMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn edited(&self) -> Vec<(i64, OutgoingMessage)> {
        self.edited.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<(i64, i64)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingEvent>, SproutError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<SentMessage, SproutError> {
        if self.failing_chat == Some(message.chat_id) {
            return Err(SproutError::Channel(format!(
                "chat {} unreachable",
                message.chat_id
            )));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let text = message.text.clone();
        self.sent.lock().unwrap().push((id, message));
        Ok(SentMessage {
            id,
            text,
            time: Utc::now(),
        })
    }

    async fn edit(&self, message_id: i64, message: OutgoingMessage) -> Result<(), SproutError> {
        if self.fail_edits {
            return Err(SproutError::Channel("message can't be edited".into()));
        }
        self.edited.lock().unwrap().push((message_id, message));
        Ok(())
    }

    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), SproutError> {
        self.deleted.lock().unwrap().push((chat_id, message_id));
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), SproutError> {
        if self.panic_on_callback {
            panic!("answer_callback({callback_id}) blew up");
        }
        self.answered.lock().unwrap().push(callback_id.to_string());
        Ok(())
    }

    async fn stop(&self) -> Result<(), SproutError> {
        Ok(())
    }
}
