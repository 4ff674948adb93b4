//! Plants.

use super::UseCases;
use sprout_core::{entities::Plant, error::SproutError};
use tracing::{error, info};

impl UseCases {
    /// Persist a plant built by the wizard. The plant must belong to the
    /// owner of its scenario. Returns it with its id.
    pub async fn create_plant(&self, plant: Plant) -> Result<Plant, SproutError> {
        if plant.title.trim().is_empty() {
            return Err(SproutError::InvalidInput("empty plant title".into()));
        }
        let group = self.get_group(plant.group_id).await?;
        if group.user_id != plant.user_id {
            return Err(SproutError::InvalidInput(format!(
                "group {} does not belong to user {}",
                group.id, plant.user_id
            )));
        }

        let id = self.store.create_plant(&plant).await.inspect_err(|e| {
            if !e.is_conflict() {
                error!(
                    user_id = plant.user_id,
                    group_id = plant.group_id,
                    "create_plant failed: {e}"
                );
            }
        })?;
        info!(user_id = plant.user_id, plant_id = id, "created plant");
        Ok(Plant { id, ..plant })
    }

    pub async fn plant_exists(&self, group_id: i64, title: &str) -> Result<bool, SproutError> {
        self.store
            .plant_exists(group_id, title)
            .await
            .inspect_err(|e| error!(group_id, "plant_exists failed: {e}"))
    }

    pub async fn get_plant(&self, id: i64) -> Result<Plant, SproutError> {
        self.store
            .get_plant(id)
            .await
            .inspect_err(|e| error!(plant_id = id, "get_plant failed: {e}"))
    }

    /// A plant owned by `user_id`. Someone else's plant is `NotFound`.
    pub async fn get_user_plant(&self, user_id: i64, id: i64) -> Result<Plant, SproutError> {
        let plant = self.get_plant(id).await?;
        if plant.user_id != user_id {
            return Err(SproutError::NotFound(format!(
                "plant {id} of user {user_id}"
            )));
        }
        Ok(plant)
    }

    pub async fn list_plants(&self, user_id: i64) -> Result<Vec<Plant>, SproutError> {
        self.store
            .get_user_plants(user_id)
            .await
            .inspect_err(|e| error!(user_id, "list_plants failed: {e}"))
    }

    pub async fn group_plants(&self, group_id: i64) -> Result<Vec<Plant>, SproutError> {
        self.store
            .get_group_plants(group_id)
            .await
            .inspect_err(|e| error!(group_id, "group_plants failed: {e}"))
    }

    pub async fn count_group_plants(&self, group_id: i64) -> Result<i64, SproutError> {
        self.store
            .count_group_plants(group_id)
            .await
            .inspect_err(|e| error!(group_id, "count_group_plants failed: {e}"))
    }

    async fn save_plant(&self, op: &str, plant: &Plant) -> Result<(), SproutError> {
        self.store.update_plant(plant).await.inspect_err(|e| {
            if !e.is_conflict() {
                error!(plant_id = plant.id, "{op} failed: {e}");
            }
        })
    }

    /// Rename a plant. The new title must be free in its scenario.
    pub async fn update_plant_title(&self, id: i64, title: &str) -> Result<Plant, SproutError> {
        let mut plant = self.get_plant(id).await?;
        plant.title = title.to_string();
        if self.plant_exists(plant.group_id, &plant.title).await? {
            return Err(SproutError::PlantAlreadyExists);
        }
        self.save_plant("update_plant_title", &plant).await?;
        Ok(plant)
    }

    pub async fn update_plant_description(
        &self,
        id: i64,
        description: &str,
    ) -> Result<Plant, SproutError> {
        let mut plant = self.get_plant(id).await?;
        plant.description = description.to_string();
        self.save_plant("update_plant_description", &plant).await?;
        Ok(plant)
    }

    /// Move a plant to another scenario of the same owner. The title must be
    /// free there. Moving to the current scenario changes nothing.
    pub async fn update_plant_group(&self, id: i64, group_id: i64) -> Result<Plant, SproutError> {
        let mut plant = self.get_plant(id).await?;
        if plant.group_id == group_id {
            return Ok(plant);
        }
        let group = self.get_user_group(plant.user_id, group_id).await?;
        if self.plant_exists(group.id, &plant.title).await? {
            return Err(SproutError::PlantAlreadyExists);
        }
        plant.group_id = group.id;
        self.save_plant("update_plant_group", &plant).await?;
        Ok(plant)
    }

    pub async fn update_plant_photo(&self, id: i64, photo: Vec<u8>) -> Result<Plant, SproutError> {
        let mut plant = self.get_plant(id).await?;
        plant.photo = photo;
        self.save_plant("update_plant_photo", &plant).await?;
        Ok(plant)
    }

    /// Delete a plant owned by `user_id`.
    pub async fn delete_plant(&self, user_id: i64, id: i64) -> Result<Plant, SproutError> {
        let plant = self.get_user_plant(user_id, id).await?;
        self.store
            .delete_plant(id)
            .await
            .inspect_err(|e| error!(user_id, plant_id = id, "delete_plant failed: {e}"))?;
        info!(user_id, plant_id = id, "deleted plant");
        Ok(plant)
    }
}
