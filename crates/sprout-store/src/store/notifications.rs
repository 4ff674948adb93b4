//! Append-only audit of sent watering notifications.

use super::Store;
use chrono::{DateTime, Utc};
use sprout_core::entities::Notification;
use sprout_core::error::SproutError;

impl Store {
    /// Record a sent notification. Fails on the foreign key if the scenario
    /// no longer exists.
    pub async fn save_notification(&self, notification: &Notification) -> Result<i64, SproutError> {
        let result = sqlx::query(
            "INSERT INTO notifications (group_id, message_id, text, sent_at) VALUES (?, ?, ?, ?)",
        )
        .bind(notification.group_id)
        .bind(notification.message_id)
        .bind(&notification.text)
        .bind(notification.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| SproutError::Storage(format!("save notification failed: {e}")))?;

        Ok(result.last_insert_rowid())
    }

    /// Notifications sent for a scenario at or after `since`, oldest first.
    pub async fn get_group_notifications(
        &self,
        group_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<Notification>, SproutError> {
        sqlx::query_as::<_, Notification>(
            "SELECT id, group_id, message_id, text, sent_at FROM notifications \
             WHERE group_id = ? AND sent_at >= ? ORDER BY id ASC",
        )
        .bind(group_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SproutError::Storage(format!("get group notifications failed: {e}")))
    }
}
