//! Use-case layer: business rules over the store.
//!
//! Split into focused submodules:
//! - `groups`: watering scenarios and the next-watering-date rule
//! - `plants`: plants and their ownership checks
//!
//! Users, the wizard scratchpad and notifications live here. Every storage
//! failure is logged with the operation and the ids involved before it is
//! returned unchanged.

mod groups;
mod plants;

pub(crate) use groups::reschedule;


use chrono::{DateTime, Utc};
use sprout_core::{
    entities::{Notification, Temporary, User},
    error::SproutError,
};
use sprout_store::Store;
use tracing::{error, info};

/// Business operations shared by the wizard, gateway, and scheduler.
#[derive(Clone)]
pub struct UseCases {
    store: Store,
}

impl UseCases {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Register a user on first contact. Idempotent on `telegram_id`.
    ///
    /// A new user gets a fresh wizard scratchpad in the same transaction.
    pub async fn save_user(&self, user: &User) -> Result<i64, SproutError> {
        match self.store.get_user_by_telegram_id(user.telegram_id).await {
            Ok(existing) => return Ok(existing.id),
            Err(SproutError::NotFound(_)) => {}
            Err(e) => {
                error!(telegram_id = user.telegram_id, "save_user lookup failed: {e}");
                return Err(e);
            }
        }

        match self.store.create_user_with_temporary(user).await {
            Ok(id) => {
                info!(user_id = id, telegram_id = user.telegram_id, "registered new user");
                Ok(id)
            }
            Err(e) => {
                // A concurrent event may have registered the same user first.
                if let Ok(existing) = self.store.get_user_by_telegram_id(user.telegram_id).await {
                    return Ok(existing.id);
                }
                error!(telegram_id = user.telegram_id, "save_user failed: {e}");
                Err(e)
            }
        }
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<User, SproutError> {
        self.store
            .get_user_by_id(id)
            .await
            .inspect_err(|e| error!(user_id = id, "get_user_by_id failed: {e}"))
    }

    pub async fn get_temporary(&self, user_id: i64) -> Result<Temporary, SproutError> {
        self.store
            .get_temporary_by_user_id(user_id)
            .await
            .inspect_err(|e| error!(user_id, "get_temporary failed: {e}"))
    }

    pub async fn update_temporary(&self, temporary: &Temporary) -> Result<(), SproutError> {
        self.store.update_temporary(temporary).await.inspect_err(|e| {
            error!(
                user_id = temporary.user_id,
                step = %temporary.step,
                "update_temporary failed: {e}"
            )
        })
    }

    /// Clear the scratchpad back to the start step.
    pub async fn reset_temporary(&self, user_id: i64) -> Result<(), SproutError> {
        let mut temporary = self.get_temporary(user_id).await?;
        temporary.reset();
        self.update_temporary(&temporary).await
    }

    /// Remember (or forget) the message carrying the current prompt.
    pub async fn set_temporary_message(
        &self,
        user_id: i64,
        message_id: Option<i64>,
    ) -> Result<(), SproutError> {
        let mut temporary = self.get_temporary(user_id).await?;
        if temporary.message_id == message_id {
            return Ok(());
        }
        temporary.message_id = message_id;
        self.update_temporary(&temporary).await
    }

    /// Record a sent reminder; returns it with its new id.
    pub async fn save_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, SproutError> {
        let id = self
            .store
            .save_notification(&notification)
            .await
            .inspect_err(|e| {
                error!(
                    group_id = notification.group_id,
                    "save_notification failed: {e}"
                )
            })?;
        Ok(Notification { id, ..notification })
    }

    /// Whether a reminder for `group_id` went out at or after `since`.
    pub async fn notified_since(
        &self,
        group_id: i64,
        since: DateTime<Utc>,
    ) -> Result<bool, SproutError> {
        let sent = self
            .store
            .get_group_notifications(group_id, since)
            .await
            .inspect_err(|e| error!(group_id, "get_group_notifications failed: {e}"))?;
        Ok(!sent.is_empty())
    }
}
