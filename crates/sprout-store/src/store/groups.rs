//! Watering scenario CRUD and the due-for-notify query.

use super::{is_unique_violation, Store};
use chrono::{NaiveDateTime, Utc};
use sprout_core::entities::Group;
use sprout_core::error::SproutError;

const GROUP_COLUMNS: &str = "id, user_id, title, description, last_watering_date, \
     next_watering_date, watering_interval, created_at, updated_at";

impl Store {
    /// Insert a scenario. A duplicate `(user_id, title)` is `GroupAlreadyExists`.
    pub async fn create_group(&self, group: &Group) -> Result<i64, SproutError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO groups \
             (user_id, title, description, last_watering_date, next_watering_date, \
              watering_interval, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(group.user_id)
        .bind(&group.title)
        .bind(&group.description)
        .bind(group.last_watering_date)
        .bind(group.next_watering_date)
        .bind(group.watering_interval)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                SproutError::GroupAlreadyExists
            } else {
                SproutError::Storage(format!("create group failed: {e}"))
            }
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Update the mutable fields of a scenario. A missing row is not an error.
    pub async fn update_group(&self, group: &Group) -> Result<(), SproutError> {
        sqlx::query(
            "UPDATE groups SET title = ?, description = ?, last_watering_date = ?, \
             next_watering_date = ?, watering_interval = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&group.title)
        .bind(&group.description)
        .bind(group.last_watering_date)
        .bind(group.next_watering_date)
        .bind(group.watering_interval)
        .bind(Utc::now())
        .bind(group.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                SproutError::GroupAlreadyExists
            } else {
                SproutError::Storage(format!("update group failed: {e}"))
            }
        })?;
        Ok(())
    }

    /// Whether `user_id` already owns a scenario titled `title`.
    pub async fn group_exists(&self, user_id: i64, title: &str) -> Result<bool, SproutError> {
        let (exists,): (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM groups WHERE user_id = ? AND title = ?)")
                .bind(user_id)
                .bind(title)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| SproutError::Storage(format!("group exists check failed: {e}")))?;
        Ok(exists != 0)
    }

    /// Delete a scenario; its plants and notifications cascade.
    pub async fn delete_group(&self, id: i64) -> Result<(), SproutError> {
        sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| SproutError::Storage(format!("delete group failed: {e}")))?;
        Ok(())
    }

    pub async fn get_group(&self, id: i64) -> Result<Group, SproutError> {
        sqlx::query_as::<_, Group>(&format!("SELECT {GROUP_COLUMNS} FROM groups WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SproutError::Storage(format!("get group failed: {e}")))?
            .ok_or_else(|| SproutError::NotFound(format!("group {id}")))
    }

    /// All scenarios of a user, oldest first.
    pub async fn get_user_groups(&self, user_id: i64) -> Result<Vec<Group>, SproutError> {
        sqlx::query_as::<_, Group>(&format!(
            "SELECT {GROUP_COLUMNS} FROM groups WHERE user_id = ? ORDER BY id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SproutError::Storage(format!("get user groups failed: {e}")))
    }

    pub async fn count_user_groups(&self, user_id: i64) -> Result<i64, SproutError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SproutError::Storage(format!("count user groups failed: {e}")))?;
        Ok(count)
    }

    /// Scenarios whose next watering instant is before `now`, paginated by id.
    pub async fn get_groups_for_notify(
        &self,
        now: NaiveDateTime,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Group>, SproutError> {
        sqlx::query_as::<_, Group>(&format!(
            "SELECT {GROUP_COLUMNS} FROM groups \
             WHERE next_watering_date < ? \
             ORDER BY id ASC LIMIT ? OFFSET ?"
        ))
        .bind(now)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SproutError::Storage(format!("get groups for notify failed: {e}")))
    }
}
