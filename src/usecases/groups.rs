//! Watering scenarios.

use super::UseCases;
use chrono::{NaiveDate, NaiveDateTime};
use sprout_core::{
    entities::Group,
    error::SproutError,
    watering::{
        is_valid_interval, next_watering_date, start_of_day, today, MAX_WATERING_INTERVAL,
    },
};
use tracing::{error, info};

/// Recompute `next_watering_date` from the last watering and the interval.
pub(crate) fn reschedule(group: &mut Group, today: NaiveDate) -> Result<(), SproutError> {
    group.next_watering_date =
        next_watering_date(group.last_watering_date, group.watering_interval, today)?;
    Ok(())
}

fn validate_interval(interval: i64) -> Result<(), SproutError> {
    if !is_valid_interval(interval) {
        return Err(SproutError::InvalidInput(format!(
            "watering interval must be between 1 and {MAX_WATERING_INTERVAL} days, got {interval}"
        )));
    }
    Ok(())
}

impl UseCases {
    /// Persist a scenario built by the wizard. Returns it with its id.
    pub async fn create_group(&self, mut group: Group) -> Result<Group, SproutError> {
        if group.title.trim().is_empty() {
            return Err(SproutError::InvalidInput("empty group title".into()));
        }
        validate_interval(group.watering_interval)?;
        reschedule(&mut group, today())?;

        let id = self.store.create_group(&group).await.inspect_err(|e| {
            if !e.is_conflict() {
                error!(user_id = group.user_id, "create_group failed: {e}");
            }
        })?;
        info!(user_id = group.user_id, group_id = id, "created group");
        Ok(Group { id, ..group })
    }

    pub async fn group_exists(&self, user_id: i64, title: &str) -> Result<bool, SproutError> {
        self.store
            .group_exists(user_id, title)
            .await
            .inspect_err(|e| error!(user_id, "group_exists failed: {e}"))
    }

    pub async fn get_group(&self, id: i64) -> Result<Group, SproutError> {
        self.store
            .get_group(id)
            .await
            .inspect_err(|e| error!(group_id = id, "get_group failed: {e}"))
    }

    /// A scenario owned by `user_id`. Someone else's scenario is `NotFound`.
    pub async fn get_user_group(&self, user_id: i64, id: i64) -> Result<Group, SproutError> {
        let group = self.get_group(id).await?;
        if group.user_id != user_id {
            return Err(SproutError::NotFound(format!(
                "group {id} of user {user_id}"
            )));
        }
        Ok(group)
    }

    pub async fn list_groups(&self, user_id: i64) -> Result<Vec<Group>, SproutError> {
        self.store
            .get_user_groups(user_id)
            .await
            .inspect_err(|e| error!(user_id, "list_groups failed: {e}"))
    }

    pub async fn count_groups(&self, user_id: i64) -> Result<i64, SproutError> {
        self.store
            .count_user_groups(user_id)
            .await
            .inspect_err(|e| error!(user_id, "count_groups failed: {e}"))
    }

    async fn save_group(&self, op: &str, group: &Group) -> Result<(), SproutError> {
        self.store.update_group(group).await.inspect_err(|e| {
            if !e.is_conflict() {
                error!(group_id = group.id, "{op} failed: {e}");
            }
        })
    }

    /// Rename a scenario. The new title must be free for the owner.
    pub async fn update_group_title(&self, id: i64, title: &str) -> Result<Group, SproutError> {
        let mut group = self.get_group(id).await?;
        group.title = title.to_string();
        if self.group_exists(group.user_id, &group.title).await? {
            return Err(SproutError::GroupAlreadyExists);
        }
        self.save_group("update_group_title", &group).await?;
        Ok(group)
    }

    pub async fn update_group_description(
        &self,
        id: i64,
        description: &str,
    ) -> Result<Group, SproutError> {
        let mut group = self.get_group(id).await?;
        group.description = description.to_string();
        self.save_group("update_group_description", &group).await?;
        Ok(group)
    }

    /// Move the last watering to `date` and reschedule.
    pub async fn update_group_last_watering_date(
        &self,
        id: i64,
        date: NaiveDate,
    ) -> Result<Group, SproutError> {
        let mut group = self.get_group(id).await?;
        group.last_watering_date = start_of_day(date);
        reschedule(&mut group, today())?;
        self.save_group("update_group_last_watering_date", &group)
            .await?;
        Ok(group)
    }

    /// Change the cadence and reschedule.
    pub async fn update_group_watering_interval(
        &self,
        id: i64,
        interval: i64,
    ) -> Result<Group, SproutError> {
        validate_interval(interval)?;
        let mut group = self.get_group(id).await?;
        group.watering_interval = interval;
        reschedule(&mut group, today())?;
        self.save_group("update_group_watering_interval", &group)
            .await?;
        Ok(group)
    }

    /// The "group watered" button: the scenario was watered today.
    pub async fn acknowledge_watering(
        &self,
        user_id: i64,
        group_id: i64,
    ) -> Result<Group, SproutError> {
        let group = self.get_user_group(user_id, group_id).await?;
        let group = self
            .update_group_last_watering_date(group.id, today())
            .await?;
        info!(user_id, group_id, "watering acknowledged");
        Ok(group)
    }

    /// Delete a scenario owned by `user_id`; its plants go with it.
    pub async fn delete_group(&self, user_id: i64, id: i64) -> Result<Group, SproutError> {
        let group = self.get_user_group(user_id, id).await?;
        self.store
            .delete_group(id)
            .await
            .inspect_err(|e| error!(user_id, group_id = id, "delete_group failed: {e}"))?;
        info!(user_id, group_id = id, "deleted group");
        Ok(group)
    }

    /// One page of scenarios due before `now`.
    pub async fn groups_for_notify(
        &self,
        now: NaiveDateTime,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Group>, SproutError> {
        self.store
            .get_groups_for_notify(now, limit, offset)
            .await
            .inspect_err(|e| error!(limit, offset, "groups_for_notify failed: {e}"))
    }
}
