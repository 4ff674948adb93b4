//! Users and their atomic creation together with a wizard scratchpad.

use super::temporary::insert_temporary;
use super::Store;
use sprout_core::entities::{Temporary, User};
use sprout_core::error::SproutError;
use sqlx::SqliteConnection;

const USER_COLUMNS: &str =
    "id, telegram_id, username, firstname, lastname, is_bot, created_at, updated_at";

impl Store {
    /// Insert a user. Returns the new internal id.
    pub async fn save_user(&self, user: &User) -> Result<i64, SproutError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| SproutError::Storage(format!("acquire connection failed: {e}")))?;
        insert_user(&mut conn, user).await
    }

    /// Insert a user and its initial scratchpad in one transaction.
    ///
    /// Either both rows exist afterwards or neither does.
    pub async fn create_user_with_temporary(&self, user: &User) -> Result<i64, SproutError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SproutError::Storage(format!("begin transaction failed: {e}")))?;

        let id = insert_user(&mut tx, user).await?;
        insert_temporary(&mut tx, &Temporary::new(id)).await?;

        tx.commit()
            .await
            .map_err(|e| SproutError::Storage(format!("commit user failed: {e}")))?;
        Ok(id)
    }

    pub async fn get_user_by_telegram_id(&self, telegram_id: i64) -> Result<User, SproutError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE telegram_id = ?"
        ))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SproutError::Storage(format!("get user by telegram id failed: {e}")))?
        .ok_or_else(|| SproutError::NotFound(format!("user with telegram id {telegram_id}")))
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<User, SproutError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SproutError::Storage(format!("get user failed: {e}")))?
            .ok_or_else(|| SproutError::NotFound(format!("user {id}")))
    }
}

async fn insert_user(conn: &mut SqliteConnection, user: &User) -> Result<i64, SproutError> {
    let result = sqlx::query(
        "INSERT INTO users (telegram_id, username, firstname, lastname, is_bot, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user.telegram_id)
    .bind(&user.username)
    .bind(&user.firstname)
    .bind(&user.lastname)
    .bind(user.is_bot)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| SproutError::Storage(format!("save user failed: {e}")))?;

    Ok(result.last_insert_rowid())
}
