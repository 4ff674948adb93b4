//! Plant CRUD and counters.

use super::{is_unique_violation, Store};
use chrono::Utc;
use sprout_core::entities::Plant;
use sprout_core::error::SproutError;

const PLANT_COLUMNS: &str =
    "id, group_id, user_id, title, description, photo, created_at, updated_at";

impl Store {
    /// Insert a plant. A duplicate `(group_id, title)` is `PlantAlreadyExists`.
    pub async fn create_plant(&self, plant: &Plant) -> Result<i64, SproutError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO plants \
             (group_id, user_id, title, description, photo, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(plant.group_id)
        .bind(plant.user_id)
        .bind(&plant.title)
        .bind(&plant.description)
        .bind(&plant.photo)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                SproutError::PlantAlreadyExists
            } else {
                SproutError::Storage(format!("create plant failed: {e}"))
            }
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Update the mutable fields of a plant. A missing row is not an error.
    pub async fn update_plant(&self, plant: &Plant) -> Result<(), SproutError> {
        sqlx::query(
            "UPDATE plants SET group_id = ?, title = ?, description = ?, photo = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(plant.group_id)
        .bind(&plant.title)
        .bind(&plant.description)
        .bind(&plant.photo)
        .bind(Utc::now())
        .bind(plant.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                SproutError::PlantAlreadyExists
            } else {
                SproutError::Storage(format!("update plant failed: {e}"))
            }
        })?;
        Ok(())
    }

    /// Whether scenario `group_id` already holds a plant titled `title`.
    pub async fn plant_exists(&self, group_id: i64, title: &str) -> Result<bool, SproutError> {
        let (exists,): (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM plants WHERE group_id = ? AND title = ?)")
                .bind(group_id)
                .bind(title)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| SproutError::Storage(format!("plant exists check failed: {e}")))?;
        Ok(exists != 0)
    }

    pub async fn delete_plant(&self, id: i64) -> Result<(), SproutError> {
        sqlx::query("DELETE FROM plants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| SproutError::Storage(format!("delete plant failed: {e}")))?;
        Ok(())
    }

    pub async fn get_plant(&self, id: i64) -> Result<Plant, SproutError> {
        sqlx::query_as::<_, Plant>(&format!("SELECT {PLANT_COLUMNS} FROM plants WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SproutError::Storage(format!("get plant failed: {e}")))?
            .ok_or_else(|| SproutError::NotFound(format!("plant {id}")))
    }

    /// Plants of a scenario, oldest first.
    pub async fn get_group_plants(&self, group_id: i64) -> Result<Vec<Plant>, SproutError> {
        sqlx::query_as::<_, Plant>(&format!(
            "SELECT {PLANT_COLUMNS} FROM plants WHERE group_id = ? ORDER BY id ASC"
        ))
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SproutError::Storage(format!("get group plants failed: {e}")))
    }

    /// Plants of a user across all scenarios, oldest first.
    pub async fn get_user_plants(&self, user_id: i64) -> Result<Vec<Plant>, SproutError> {
        sqlx::query_as::<_, Plant>(&format!(
            "SELECT {PLANT_COLUMNS} FROM plants WHERE user_id = ? ORDER BY id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SproutError::Storage(format!("get user plants failed: {e}")))
    }

    pub async fn count_group_plants(&self, group_id: i64) -> Result<i64, SproutError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plants WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SproutError::Storage(format!("count group plants failed: {e}")))?;
        Ok(count)
    }

    pub async fn count_user_plants(&self, user_id: i64) -> Result<i64, SproutError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plants WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SproutError::Storage(format!("count user plants failed: {e}")))?;
        Ok(count)
    }
}
