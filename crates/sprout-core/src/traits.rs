use crate::{
    error::SproutError,
    message::{IncomingEvent, OutgoingMessage, SentMessage},
};
use async_trait::async_trait;

/// Messaging Channel trait: the chat transport.
///
/// A messaging platform implements this trait to deliver user events and to
/// send, edit, and delete bot messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming events.
    /// Returns a receiver that yields text, photo, and button events.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingEvent>, SproutError>;

    /// Send a message (text or photo, optionally with an inline keyboard).
    async fn send(&self, message: OutgoingMessage) -> Result<SentMessage, SproutError>;

    /// Replace the text and keyboard of a message sent earlier.
    async fn edit(&self, message_id: i64, message: OutgoingMessage) -> Result<(), SproutError>;

    /// Delete a message sent earlier.
    async fn delete(&self, _chat_id: i64, _message_id: i64) -> Result<(), SproutError> {
        Ok(())
    }

    /// Acknowledge an inline-button press so the client stops its spinner.
    async fn answer_callback(&self, _callback_id: &str) -> Result<(), SproutError> {
        Ok(())
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), SproutError>;
}
