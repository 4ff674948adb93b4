//! Plant flows.

use super::{title_problem, Reply, Wizard};
use crate::callback::{Callback, PlantAction};
use crate::i18n::{self, t};
use crate::keyboards;
use sprout_core::{
    entities::{Plant, Temporary},
    error::SproutError,
    step::Step,
};

impl Wizard {
    /// Start a new plant. A plant needs a scenario to live in.
    pub(super) async fn start_plant(&self, temp: &mut Temporary) -> Result<Reply, SproutError> {
        let groups = self.usecases.count_groups(temp.user_id).await?;
        temp.reset();
        if groups == 0 {
            temp.step = Step::MainMenu;
            return Ok(Reply::prompt(t("need_group_first"), keyboards::no_groups()));
        }
        temp.step = Step::AddPlantTitle;
        temp.set_plant(&Plant::draft(temp.user_id))?;
        Ok(Reply::prompt(t("ask_plant_title"), keyboards::cancel()))
    }

    pub(super) async fn list_plants(&self, temp: &mut Temporary) -> Result<Reply, SproutError> {
        let plants = self.usecases.list_plants(temp.user_id).await?;
        temp.reset();
        if plants.is_empty() {
            temp.step = Step::MainMenu;
            return Ok(Reply::prompt(t("no_plants"), keyboards::no_plants()));
        }
        temp.step = Step::ChoosePlant;
        Ok(Reply::prompt(t("choose_plant"), keyboards::plants(&plants)))
    }

    /// Show the plant card (with its photo) and wait for an action.
    async fn show_plant(&self, temp: &mut Temporary, plant: &Plant) -> Result<Reply, SproutError> {
        let group = self.usecases.get_group(plant.group_id).await?;
        temp.step = Step::ManagePlantAction;
        temp.set_plant(plant)?;
        Ok(
            Reply::prompt(i18n::plant_card(plant, &group.title), keyboards::plant_actions())
                .with_photo(&plant.photo),
        )
    }

    /// Summary before creation.
    async fn confirm_plant(&self, temp: &mut Temporary, plant: &Plant) -> Result<Reply, SproutError> {
        let group = self.usecases.get_group(plant.group_id).await?;
        temp.step = Step::ConfirmAddPlant;
        temp.set_plant(plant)?;
        Ok(
            Reply::prompt(i18n::plant_summary(plant, &group.title), keyboards::confirm())
                .with_photo(&plant.photo),
        )
    }

    pub(super) async fn plant_text(
        &self,
        temp: &mut Temporary,
        text: String,
    ) -> Result<Reply, SproutError> {
        match temp.step {
            Step::AddPlantTitle => {
                if let Some(problem) = title_problem(&text) {
                    return Ok(problem);
                }
                let mut plant = temp.plant()?;
                plant.title = text;
                temp.step = Step::AddPlantDescription;
                temp.set_plant(&plant)?;
                Ok(Reply::prompt(t("ask_plant_description"), keyboards::cancel()))
            }
            Step::AddPlantDescription => {
                let mut plant = temp.plant()?;
                plant.description = text;
                let groups = self.usecases.list_groups(temp.user_id).await?;
                if groups.is_empty() {
                    temp.reset();
                    temp.step = Step::MainMenu;
                    return Ok(Reply::prompt(t("need_group_first"), keyboards::no_groups()));
                }
                temp.step = Step::AddPlantGroup;
                temp.set_plant(&plant)?;
                Ok(Reply::prompt(t("ask_plant_group"), keyboards::groups(&groups)))
            }
            Step::UpdatePlantTitle => {
                if let Some(problem) = title_problem(&text) {
                    return Ok(problem);
                }
                let plant = temp.plant()?;
                let plant = self.usecases.update_plant_title(plant.id, &text).await?;
                self.show_plant(temp, &plant).await
            }
            Step::UpdatePlantDescription => {
                let plant = temp.plant()?;
                let plant = self
                    .usecases
                    .update_plant_description(plant.id, &text)
                    .await?;
                self.show_plant(temp, &plant).await
            }
            Step::AddPlantPhoto | Step::UpdatePlantPhoto => {
                Ok(Reply::notice(t("ask_plant_photo")))
            }
            _ => Ok(Reply::notice(t("use_buttons"))),
        }
    }

    pub(super) async fn plant_photo(
        &self,
        temp: &mut Temporary,
        photo: Vec<u8>,
    ) -> Result<Reply, SproutError> {
        match temp.step {
            Step::AddPlantPhoto => {
                let mut plant = temp.plant()?;
                plant.photo = photo;
                self.confirm_plant(temp, &plant).await
            }
            Step::UpdatePlantPhoto => {
                let plant = temp.plant()?;
                let plant = self.usecases.update_plant_photo(plant.id, photo).await?;
                self.show_plant(temp, &plant).await
            }
            _ => Ok(Reply::notice(t("photo_not_expected"))),
        }
    }

    pub(super) async fn plant_button(
        &self,
        temp: &mut Temporary,
        callback: Callback,
    ) -> Result<Reply, SproutError> {
        match (temp.step, callback) {
            (Step::ChoosePlant, Callback::Plant(id)) => {
                let plant = self.usecases.get_user_plant(temp.user_id, id).await?;
                self.show_plant(temp, &plant).await
            }
            (Step::AddPlantGroup, Callback::Group(id)) => {
                let group = self.usecases.get_user_group(temp.user_id, id).await?;
                let mut plant = temp.plant()?;
                if self.usecases.plant_exists(group.id, &plant.title).await? {
                    return Err(SproutError::PlantAlreadyExists);
                }
                plant.group_id = group.id;
                temp.step = Step::AddPlantPhotoQuestion;
                temp.set_plant(&plant)?;
                Ok(Reply::prompt(
                    t("ask_plant_photo_question"),
                    keyboards::photo_question(),
                ))
            }
            (Step::AddPlantPhotoQuestion, Callback::Photo(true)) => {
                temp.step = Step::AddPlantPhoto;
                Ok(Reply::prompt(t("ask_plant_photo"), keyboards::cancel()))
            }
            (Step::AddPlantPhotoQuestion, Callback::Photo(false)) => {
                let plant = temp.plant()?;
                self.confirm_plant(temp, &plant).await
            }
            (Step::ConfirmAddPlant, Callback::Confirm) => {
                let plant = self.usecases.create_plant(temp.plant()?).await?;
                temp.reset();
                Ok(Reply::done(i18n::plant_created(&plant.title)))
            }
            (Step::ManagePlantAction, Callback::PlantAction(action)) => {
                self.plant_action(temp, action).await
            }
            (Step::UpdatePlantGroup, Callback::Group(group_id)) => {
                let plant = temp.plant()?;
                let plant = self.usecases.update_plant_group(plant.id, group_id).await?;
                self.show_plant(temp, &plant).await
            }
            (Step::ConfirmDeletePlant, Callback::Confirm) => {
                let plant = temp.plant()?;
                let deleted = self.usecases.delete_plant(temp.user_id, plant.id).await?;
                temp.reset();
                Ok(Reply::done(i18n::plant_deleted(&deleted.title)))
            }
            _ => Ok(Reply::notice(t("stale_button"))),
        }
    }

    async fn plant_action(
        &self,
        temp: &mut Temporary,
        action: PlantAction,
    ) -> Result<Reply, SproutError> {
        let plant = temp.plant()?;
        let (step, reply) = match action {
            PlantAction::Title => (
                Step::UpdatePlantTitle,
                Reply::prompt(t("ask_new_plant_title"), keyboards::cancel()),
            ),
            PlantAction::Description => (
                Step::UpdatePlantDescription,
                Reply::prompt(t("ask_new_plant_description"), keyboards::cancel()),
            ),
            PlantAction::Group => {
                let groups = self.usecases.list_groups(temp.user_id).await?;
                (
                    Step::UpdatePlantGroup,
                    Reply::prompt(t("ask_new_plant_group"), keyboards::groups(&groups)),
                )
            }
            PlantAction::Photo => (
                Step::UpdatePlantPhoto,
                Reply::prompt(t("ask_new_plant_photo"), keyboards::cancel()),
            ),
            PlantAction::Delete => (
                Step::ConfirmDeletePlant,
                Reply::prompt(i18n::confirm_delete_plant(&plant), keyboards::confirm()),
            ),
        };
        temp.step = step;
        Ok(reply)
    }
}
