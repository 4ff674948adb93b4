//! Gateway: the main event loop connecting the chat channel, the wizard,
//! and the notification scheduler.
//!
//! Events from one sender are processed strictly in order (later ones are
//! buffered); different senders run in parallel.

mod scheduler;


pub use scheduler::{Notifier, TickReport};

use crate::i18n::t;
use crate::usecases::UseCases;
use crate::wizard::{Event, Transition, Wizard};
use sprout_core::{
    config::SchedulerConfig,
    entities::User,
    error::SproutError,
    message::{IncomingEvent, OutgoingMessage, Payload},
    traits::Channel,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// The central gateway that routes events between the channel and the wizard.
pub struct Gateway {
    pub(super) channel: Arc<dyn Channel>,
    pub(super) usecases: UseCases,
    pub(super) wizard: Wizard,
    pub(super) scheduler_config: SchedulerConfig,
    /// Senders with an event in progress. New events are buffered here.
    pub(super) active_senders: Mutex<HashMap<i64, Vec<IncomingEvent>>>,
}

impl Gateway {
    pub fn new(
        channel: Arc<dyn Channel>,
        usecases: UseCases,
        scheduler_config: SchedulerConfig,
    ) -> Self {
        Self {
            channel,
            wizard: Wizard::new(usecases.clone()),
            usecases,
            scheduler_config,
            active_senders: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Sprout gateway running | channel: {} | scheduler: {}",
            self.channel.name(),
            if self.scheduler_config.enabled {
                "enabled"
            } else {
                "disabled"
            },
        );

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name()))?;
        info!("Channel started: {}", self.channel.name());

        // Spawn scheduler loop.
        let sched_handle = if self.scheduler_config.enabled {
            let notifier = Arc::new(Notifier::new(
                self.usecases.clone(),
                self.channel.clone(),
                self.scheduler_config.clone(),
            ));
            Some(tokio::spawn(notifier.run()))
        } else {
            None
        };

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                incoming = rx.recv() => {
                    let Some(incoming) = incoming else {
                        warn!("channel {} closed its event stream", self.channel.name());
                        break;
                    };
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.dispatch_event(incoming).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(&sched_handle).await;
        Ok(())
    }

    /// Dispatch an event: buffer if the sender is busy, otherwise process.
    pub(super) async fn dispatch_event(self: Arc<Self>, incoming: IncomingEvent) {
        let sender = incoming.sender.telegram_id;

        {
            let mut active = self.active_senders.lock().await;
            if let Some(buffer) = active.get_mut(&sender) {
                buffer.push(incoming);
                info!(sender, "buffered event (previous one in progress)");
                return;
            }
            active.insert(sender, Vec::new());
        }

        self.handle_isolated(incoming).await;

        // Drain any buffered events for this sender.
        loop {
            let next = {
                let mut active = self.active_senders.lock().await;
                match active.get_mut(&sender) {
                    Some(buf) if !buf.is_empty() => Some(buf.remove(0)),
                    _ => {
                        active.remove(&sender);
                        None
                    }
                }
            };

            match next {
                Some(buffered) => self.handle_isolated(buffered).await,
                None => break,
            }
        }
    }

    /// Run `handle_event` on its own task so a panic in the handler is
    /// reported like any other failure and the sender is still released.
    async fn handle_isolated(self: &Arc<Self>, incoming: IncomingEvent) {
        let chat_id = incoming.chat_id;
        let sender = incoming.sender.telegram_id;
        let gw = self.clone();
        if let Err(e) = tokio::spawn(async move { gw.handle_event(incoming).await }).await {
            error!(sender, "event handler aborted: {e}");
            self.apologize(chat_id, sender).await;
        }
    }

    /// Process one event end to end. Failures are logged and reported to
    /// the user with a generic apology.
    pub(super) async fn handle_event(&self, incoming: IncomingEvent) {
        let chat_id = incoming.chat_id;
        let sender = incoming.sender.telegram_id;
        info!(
            "[{}] {} sent {}",
            incoming.channel,
            sender,
            payload_kind(&incoming.payload)
        );

        if let Payload::Callback { id, .. } = &incoming.payload {
            if let Err(e) = self.channel.answer_callback(id).await {
                warn!(sender, "failed to answer callback: {e}");
            }
        }

        if let Err(e) = self.process(incoming).await {
            error!(sender, "failed to handle event: {e}");
            self.apologize(chat_id, sender).await;
        }
    }

    async fn apologize(&self, chat_id: i64, sender: i64) {
        let apology = OutgoingMessage::text(chat_id, t("something_wrong"));
        if let Err(e) = self.channel.send(apology).await {
            error!(sender, "failed to send message: {e}");
        }
    }

    async fn process(&self, incoming: IncomingEvent) -> Result<(), SproutError> {
        let user_id = self
            .usecases
            .save_user(&User::from(&incoming.sender))
            .await?;
        let transition = match self
            .wizard
            .handle(user_id, Event::from(incoming.payload))
            .await
        {
            Err(e @ SproutError::Decode(_)) => {
                warn!(user_id, "unreadable scratchpad, resetting: {e}");
                self.usecases.reset_temporary(user_id).await?;
                return Err(e);
            }
            other => other?,
        };
        self.deliver(user_id, incoming.chat_id, transition).await
    }

    /// Show a transition to the user.
    ///
    /// An edit that the platform refuses falls back to a fresh message; the
    /// message id of a tracked prompt is stored on the scratchpad.
    pub(super) async fn deliver(
        &self,
        user_id: i64,
        chat_id: i64,
        transition: Transition,
    ) -> Result<(), SproutError> {
        for &message_id in &transition.delete_messages {
            if let Err(e) = self.channel.delete(chat_id, message_id).await {
                warn!(chat_id, message_id, "failed to delete message: {e}");
            }
        }

        let Some(reply) = transition.reply else {
            return Ok(());
        };
        let track = reply.track;
        let message = OutgoingMessage {
            chat_id,
            text: reply.text,
            keyboard: reply.keyboard,
            photo: reply.photo,
        };

        if let Some(message_id) = transition.edit_message {
            match self.channel.edit(message_id, message.clone()).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(chat_id, message_id, "edit failed, sending a new message: {e}");
                    if let Err(e) = self.channel.delete(chat_id, message_id).await {
                        warn!(chat_id, message_id, "failed to delete message: {e}");
                    }
                }
            }
        }

        let sent = self.channel.send(message).await?;
        if track {
            self.usecases
                .set_temporary_message(user_id, Some(sent.id))
                .await?;
        }
        Ok(())
    }

    /// Graceful shutdown: stop the scheduler, then the channel.
    async fn shutdown(&self, sched_handle: &Option<tokio::task::JoinHandle<()>>) {
        info!("Shutting down...");

        if let Some(h) = sched_handle {
            h.abort();
        }

        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }

        info!("Shutdown complete.");
    }
}

fn payload_kind(payload: &Payload) -> &'static str {
    match payload {
        Payload::Text(text) if text.starts_with('/') => "a command",
        Payload::Text(_) => "text",
        Payload::Photo { .. } => "a photo",
        Payload::Callback { .. } => "a button press",
    }
}
