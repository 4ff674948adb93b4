//! Wizard steps: the persisted state of a user's scratchpad.

use crate::error::SproutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which partial entity the scratchpad carries while in a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftKind {
    None,
    Group,
    Plant,
}

/// A state of the conversational wizard.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    #[default]
    Start,
    MainMenu,

    AddGroupTitle,
    AddGroupDescription,
    AddGroupLastWateringDate,
    AddGroupWateringInterval,
    ConfirmAddGroup,

    ChooseGroup,
    ManageGroupAction,
    UpdateGroupTitle,
    UpdateGroupDescription,
    UpdateGroupLastWateringDate,
    UpdateGroupWateringInterval,
    ConfirmDeleteGroup,

    AddPlantTitle,
    AddPlantDescription,
    AddPlantGroup,
    AddPlantPhotoQuestion,
    AddPlantPhoto,
    ConfirmAddPlant,

    ChoosePlant,
    ManagePlantAction,
    UpdatePlantTitle,
    UpdatePlantDescription,
    UpdatePlantGroup,
    UpdatePlantPhoto,
    ConfirmDeletePlant,
}

impl Step {
    pub const ALL: [Step; 27] = [
        Step::Start,
        Step::MainMenu,
        Step::AddGroupTitle,
        Step::AddGroupDescription,
        Step::AddGroupLastWateringDate,
        Step::AddGroupWateringInterval,
        Step::ConfirmAddGroup,
        Step::ChooseGroup,
        Step::ManageGroupAction,
        Step::UpdateGroupTitle,
        Step::UpdateGroupDescription,
        Step::UpdateGroupLastWateringDate,
        Step::UpdateGroupWateringInterval,
        Step::ConfirmDeleteGroup,
        Step::AddPlantTitle,
        Step::AddPlantDescription,
        Step::AddPlantGroup,
        Step::AddPlantPhotoQuestion,
        Step::AddPlantPhoto,
        Step::ConfirmAddPlant,
        Step::ChoosePlant,
        Step::ManagePlantAction,
        Step::UpdatePlantTitle,
        Step::UpdatePlantDescription,
        Step::UpdatePlantGroup,
        Step::UpdatePlantPhoto,
        Step::ConfirmDeletePlant,
    ];

    /// Stable name stored in the `temporary.step` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::MainMenu => "main_menu",
            Self::AddGroupTitle => "add_group_title",
            Self::AddGroupDescription => "add_group_description",
            Self::AddGroupLastWateringDate => "add_group_last_watering_date",
            Self::AddGroupWateringInterval => "add_group_watering_interval",
            Self::ConfirmAddGroup => "confirm_add_group",
            Self::ChooseGroup => "choose_group",
            Self::ManageGroupAction => "manage_group_action",
            Self::UpdateGroupTitle => "update_group_title",
            Self::UpdateGroupDescription => "update_group_description",
            Self::UpdateGroupLastWateringDate => "update_group_last_watering_date",
            Self::UpdateGroupWateringInterval => "update_group_watering_interval",
            Self::ConfirmDeleteGroup => "confirm_delete_group",
            Self::AddPlantTitle => "add_plant_title",
            Self::AddPlantDescription => "add_plant_description",
            Self::AddPlantGroup => "add_plant_group",
            Self::AddPlantPhotoQuestion => "add_plant_photo_question",
            Self::AddPlantPhoto => "add_plant_photo",
            Self::ConfirmAddPlant => "confirm_add_plant",
            Self::ChoosePlant => "choose_plant",
            Self::ManagePlantAction => "manage_plant_action",
            Self::UpdatePlantTitle => "update_plant_title",
            Self::UpdatePlantDescription => "update_plant_description",
            Self::UpdatePlantGroup => "update_plant_group",
            Self::UpdatePlantPhoto => "update_plant_photo",
            Self::ConfirmDeletePlant => "confirm_delete_plant",
        }
    }

    /// The partial entity `Temporary.data` must hold in this step.
    pub fn draft(&self) -> DraftKind {
        match self {
            Self::Start | Self::MainMenu | Self::ChooseGroup | Self::ChoosePlant => DraftKind::None,
            Self::AddGroupTitle
            | Self::AddGroupDescription
            | Self::AddGroupLastWateringDate
            | Self::AddGroupWateringInterval
            | Self::ConfirmAddGroup
            | Self::ManageGroupAction
            | Self::UpdateGroupTitle
            | Self::UpdateGroupDescription
            | Self::UpdateGroupLastWateringDate
            | Self::UpdateGroupWateringInterval
            | Self::ConfirmDeleteGroup => DraftKind::Group,
            Self::AddPlantTitle
            | Self::AddPlantDescription
            | Self::AddPlantGroup
            | Self::AddPlantPhotoQuestion
            | Self::AddPlantPhoto
            | Self::ConfirmAddPlant
            | Self::ManagePlantAction
            | Self::UpdatePlantTitle
            | Self::UpdatePlantDescription
            | Self::UpdatePlantGroup
            | Self::UpdatePlantPhoto
            | Self::ConfirmDeletePlant => DraftKind::Plant,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = SproutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|step| step.as_str() == s)
            .copied()
            .ok_or_else(|| SproutError::Decode(format!("unknown step '{s}'")))
    }
}

impl TryFrom<String> for Step {
    type Error = SproutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_step_parses_back_from_its_name() {
        for step in Step::ALL {
            assert_eq!(step.as_str().parse::<Step>().unwrap(), step);
        }
    }

    #[test]
    fn test_unknown_step_is_decode_error() {
        let err = "water_the_cat".parse::<Step>().unwrap_err();
        assert!(matches!(err, SproutError::Decode(_)));
    }

    #[test]
    fn test_draft_kind_follows_flow() {
        assert_eq!(Step::Start.draft(), DraftKind::None);
        assert_eq!(Step::AddGroupWateringInterval.draft(), DraftKind::Group);
        assert_eq!(Step::ConfirmDeleteGroup.draft(), DraftKind::Group);
        assert_eq!(Step::AddPlantPhoto.draft(), DraftKind::Plant);
        assert_eq!(Step::ChoosePlant.draft(), DraftKind::None);
    }
}
