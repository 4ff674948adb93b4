//! The per-user wizard scratchpad.

use super::Store;
use chrono::Utc;
use sprout_core::entities::Temporary;
use sprout_core::error::SproutError;
use sqlx::SqliteConnection;

impl Store {
    /// Create a scratchpad. A second one for the same user violates the
    /// unique index on `user_id`.
    pub async fn create_temporary(&self, temporary: &Temporary) -> Result<i64, SproutError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| SproutError::Storage(format!("acquire connection failed: {e}")))?;
        insert_temporary(&mut conn, temporary).await
    }

    /// Update step, tracked message and draft of the scratchpad with `temporary.id`.
    pub async fn update_temporary(&self, temporary: &Temporary) -> Result<(), SproutError> {
        sqlx::query(
            "UPDATE temporary SET step = ?, message_id = ?, data = ?, updated_at = ? WHERE id = ?",
        )
        .bind(temporary.step.as_str())
        .bind(temporary.message_id)
        .bind(&temporary.data)
        .bind(Utc::now())
        .bind(temporary.id)
        .execute(&self.pool)
        .await
        .map_err(|e| SproutError::Storage(format!("update temporary failed: {e}")))?;
        Ok(())
    }

    pub async fn get_temporary_by_user_id(&self, user_id: i64) -> Result<Temporary, SproutError> {
        sqlx::query_as::<_, Temporary>(
            "SELECT id, user_id, step, message_id, data FROM temporary WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SproutError::Storage(format!("get temporary failed: {e}")))?
        .ok_or_else(|| SproutError::NotFound(format!("temporary for user {user_id}")))
    }
}

pub(super) async fn insert_temporary(
    conn: &mut SqliteConnection,
    temporary: &Temporary,
) -> Result<i64, SproutError> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO temporary (user_id, step, message_id, data, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(temporary.user_id)
    .bind(temporary.step.as_str())
    .bind(temporary.message_id)
    .bind(&temporary.data)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| SproutError::Storage(format!("create temporary failed: {e}")))?;

    Ok(result.last_insert_rowid())
}
