//! Watering scenario flows.

use super::{title_problem, Reply, Wizard};
use crate::callback::{Callback, GroupAction};
use crate::i18n::{self, t};
use crate::keyboards;
use crate::usecases::reschedule;
use sprout_core::{
    entities::{Group, Temporary},
    error::SproutError,
    step::Step,
    watering::{is_valid_interval, start_of_day, today},
};

impl Wizard {
    pub(super) fn start_group(&self, temp: &mut Temporary) -> Result<Reply, SproutError> {
        temp.reset();
        temp.step = Step::AddGroupTitle;
        temp.set_group(&Group::draft(temp.user_id))?;
        Ok(Reply::prompt(t("ask_group_title"), keyboards::cancel()))
    }

    pub(super) async fn list_groups(&self, temp: &mut Temporary) -> Result<Reply, SproutError> {
        let groups = self.usecases.list_groups(temp.user_id).await?;
        temp.reset();
        if groups.is_empty() {
            temp.step = Step::MainMenu;
            return Ok(Reply::prompt(t("no_groups"), keyboards::no_groups()));
        }
        temp.step = Step::ChooseGroup;
        Ok(Reply::prompt(t("choose_group"), keyboards::groups(&groups)))
    }

    /// The "group watered" button under a reminder. Valid from any step.
    pub(super) async fn watered(&self, user_id: i64, group_id: i64) -> Result<Reply, SproutError> {
        let group = self.usecases.acknowledge_watering(user_id, group_id).await?;
        Ok(Reply::notice(i18n::watered(&group)))
    }

    /// Show the scenario card and wait for an action.
    fn show_group(&self, temp: &mut Temporary, group: &Group) -> Result<Reply, SproutError> {
        temp.step = Step::ManageGroupAction;
        temp.set_group(group)?;
        Ok(Reply::prompt(
            i18n::group_card(group),
            keyboards::group_actions(),
        ))
    }

    pub(super) async fn group_text(
        &self,
        temp: &mut Temporary,
        text: String,
    ) -> Result<Reply, SproutError> {
        match temp.step {
            Step::AddGroupTitle => {
                if let Some(problem) = title_problem(&text) {
                    return Ok(problem);
                }
                if self.usecases.group_exists(temp.user_id, &text).await? {
                    return Err(SproutError::GroupAlreadyExists);
                }
                let mut group = temp.group()?;
                group.title = text;
                temp.step = Step::AddGroupDescription;
                temp.set_group(&group)?;
                Ok(Reply::prompt(t("ask_group_description"), keyboards::cancel()))
            }
            Step::AddGroupDescription => {
                let mut group = temp.group()?;
                group.description = text;
                temp.step = Step::AddGroupLastWateringDate;
                temp.set_group(&group)?;
                let today = today();
                Ok(Reply::prompt(
                    t("ask_last_watering_date"),
                    keyboards::calendar(today, today),
                ))
            }
            Step::UpdateGroupTitle => {
                if let Some(problem) = title_problem(&text) {
                    return Ok(problem);
                }
                let group = temp.group()?;
                let group = self.usecases.update_group_title(group.id, &text).await?;
                self.show_group(temp, &group)
            }
            Step::UpdateGroupDescription => {
                let group = temp.group()?;
                let group = self
                    .usecases
                    .update_group_description(group.id, &text)
                    .await?;
                self.show_group(temp, &group)
            }
            _ => Ok(Reply::notice(t("use_buttons"))),
        }
    }

    pub(super) async fn group_button(
        &self,
        temp: &mut Temporary,
        callback: Callback,
    ) -> Result<Reply, SproutError> {
        match (temp.step, callback) {
            (Step::ChooseGroup, Callback::Group(id)) => {
                let group = self.usecases.get_user_group(temp.user_id, id).await?;
                self.show_group(temp, &group)
            }
            (
                Step::AddGroupLastWateringDate | Step::UpdateGroupLastWateringDate,
                Callback::Calendar(month),
            ) => {
                let today = today();
                let prompt = if temp.step == Step::AddGroupLastWateringDate {
                    t("ask_last_watering_date")
                } else {
                    t("ask_new_last_watering_date")
                };
                Ok(Reply::prompt(prompt, keyboards::calendar(month, today)))
            }
            (Step::AddGroupLastWateringDate, Callback::Date(date)) => {
                if date > today() {
                    return Ok(Reply::notice(t("future_date")));
                }
                let mut group = temp.group()?;
                group.last_watering_date = start_of_day(date);
                temp.step = Step::AddGroupWateringInterval;
                temp.set_group(&group)?;
                Ok(Reply::prompt(
                    t("ask_watering_interval"),
                    keyboards::intervals(),
                ))
            }
            (Step::UpdateGroupLastWateringDate, Callback::Date(date)) => {
                if date > today() {
                    return Ok(Reply::notice(t("future_date")));
                }
                let group = temp.group()?;
                let group = self
                    .usecases
                    .update_group_last_watering_date(group.id, date)
                    .await?;
                self.show_group(temp, &group)
            }
            (Step::AddGroupWateringInterval, Callback::Interval(days))
                if is_valid_interval(days) =>
            {
                let mut group = temp.group()?;
                group.watering_interval = days;
                reschedule(&mut group, today())?;
                temp.step = Step::ConfirmAddGroup;
                temp.set_group(&group)?;
                Ok(Reply::prompt(
                    i18n::group_summary(&group),
                    keyboards::confirm(),
                ))
            }
            (Step::UpdateGroupWateringInterval, Callback::Interval(days))
                if is_valid_interval(days) =>
            {
                let group = temp.group()?;
                let group = self
                    .usecases
                    .update_group_watering_interval(group.id, days)
                    .await?;
                self.show_group(temp, &group)
            }
            (Step::ConfirmAddGroup, Callback::Confirm) => {
                let group = self.usecases.create_group(temp.group()?).await?;
                temp.reset();
                Ok(Reply::done(i18n::group_created(&group.title)))
            }
            (Step::ManageGroupAction, Callback::GroupAction(action)) => {
                self.group_action(temp, action).await
            }
            (Step::ConfirmDeleteGroup, Callback::Confirm) => {
                let group = temp.group()?;
                let deleted = self.usecases.delete_group(temp.user_id, group.id).await?;
                temp.reset();
                Ok(Reply::done(i18n::group_deleted(&deleted.title)))
            }
            _ => Ok(Reply::notice(t("stale_button"))),
        }
    }

    async fn group_action(
        &self,
        temp: &mut Temporary,
        action: GroupAction,
    ) -> Result<Reply, SproutError> {
        let group = temp.group()?;
        let (step, reply) = match action {
            GroupAction::Title => (
                Step::UpdateGroupTitle,
                Reply::prompt(t("ask_new_group_title"), keyboards::cancel()),
            ),
            GroupAction::Description => (
                Step::UpdateGroupDescription,
                Reply::prompt(t("ask_new_group_description"), keyboards::cancel()),
            ),
            GroupAction::LastWatering => {
                let today = today();
                (
                    Step::UpdateGroupLastWateringDate,
                    Reply::prompt(
                        t("ask_new_last_watering_date"),
                        keyboards::calendar(today, today),
                    ),
                )
            }
            GroupAction::Interval => (
                Step::UpdateGroupWateringInterval,
                Reply::prompt(t("ask_new_watering_interval"), keyboards::intervals()),
            ),
            GroupAction::Delete => {
                let plants = self.usecases.count_group_plants(group.id).await?;
                (
                    Step::ConfirmDeleteGroup,
                    Reply::prompt(
                        i18n::confirm_delete_group(&group, plants),
                        keyboards::confirm(),
                    ),
                )
            }
        };
        temp.step = step;
        Ok(reply)
    }
}
