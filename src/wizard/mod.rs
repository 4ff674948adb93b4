//! Wizard: the per-user conversational state machine.
//!
//! Each user has one persisted scratchpad (`Temporary`) holding the current
//! `Step` and the partially built scenario or plant. A transition loads the
//! scratchpad, applies one inbound event to it in memory, and persists it
//! once at the end. Refused or failed transitions leave it untouched.
//!
//! Split into focused submodules:
//! - `group`: creating, browsing, editing and deleting watering scenarios
//! - `plant`: the same for plants

mod group;
mod plant;


use crate::callback::Callback;
use crate::commands::Command;
use crate::i18n::t;
use crate::keyboards;
use crate::usecases::UseCases;
use sprout_core::{
    entities::Temporary,
    error::SproutError,
    message::{InlineKeyboard, Payload},
    step::{DraftKind, Step},
};
use tracing::debug;

/// Titles longer than this are refused.
const MAX_TITLE_CHARS: usize = 64;

/// One inbound user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Command(Command),
    Text(String),
    Photo(Vec<u8>),
    Button {
        callback: Callback,
        /// The message carrying the pressed keyboard.
        message_id: Option<i64>,
    },
    /// A button whose payload no longer parses.
    UnknownButton,
}

impl From<Payload> for Event {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Text(text) => match Command::parse(&text) {
                Some(cmd) => Self::Command(cmd),
                None => Self::Text(text),
            },
            Payload::Photo { data, .. } => Self::Photo(data),
            Payload::Callback {
                data, message_id, ..
            } => match Callback::parse(&data) {
                Some(callback) => Self::Button {
                    callback,
                    message_id,
                },
                None => Self::UnknownButton,
            },
        }
    }
}

/// What to show the user after a transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
    /// Send as a photo with `text` as the caption.
    pub photo: Option<Vec<u8>>,
    /// The reply is the current prompt; remember its message id.
    pub track: bool,
    /// A side remark that leaves the current prompt in place.
    pub notice: bool,
}

impl Reply {
    /// A prompt waiting for the next user action.
    pub fn prompt(text: impl Into<String>, keyboard: InlineKeyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
            track: true,
            ..Default::default()
        }
    }

    /// The end of a flow, back at the main menu.
    pub fn done(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboards::main_menu()),
            ..Default::default()
        }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            notice: true,
            ..Default::default()
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    /// Attach a photo; an empty one is ignored.
    pub fn with_photo(mut self, photo: &[u8]) -> Self {
        if !photo.is_empty() {
            self.photo = Some(photo.to_vec());
        }
        self
    }
}

/// The outcome of one event, for the gateway to deliver.
#[derive(Debug, Default)]
pub struct Transition {
    /// `None` when nothing needs to be said (decorative buttons).
    pub reply: Option<Reply>,
    /// Replace this message with the reply instead of sending a new one.
    pub edit_message: Option<i64>,
    /// Outdated keyboard messages to remove.
    pub delete_messages: Vec<i64>,
}

impl Transition {
    fn notice(reply: Reply) -> Self {
        Self {
            reply: Some(reply),
            ..Default::default()
        }
    }
}

/// The conversational state machine.
#[derive(Clone)]
pub struct Wizard {
    usecases: UseCases,
}

impl Wizard {
    pub fn new(usecases: UseCases) -> Self {
        Self { usecases }
    }

    /// Apply `event` to the scratchpad of `user_id`.
    ///
    /// Domain conflicts and stale references become notices and leave the
    /// scratchpad as it was; every other failure is returned.
    pub async fn handle(&self, user_id: i64, event: Event) -> Result<Transition, SproutError> {
        if let Event::Button {
            callback: Callback::Noop,
            ..
        } = event
        {
            return Ok(Transition::default());
        }

        let mut temp = self.usecases.get_temporary(user_id).await?;
        let before = temp.clone();
        let pressed = match &event {
            Event::Button { message_id, .. } => *message_id,
            _ => None,
        };

        let reply = match self.dispatch(&mut temp, event).await {
            Ok(reply) => reply,
            Err(e) => match refusal(&e) {
                Some(text) => {
                    debug!(user_id, step = %before.step, "transition refused: {e}");
                    return Ok(Transition::notice(Reply::notice(text)));
                }
                None => return Err(e),
            },
        };

        if reply.notice {
            return Ok(Transition::notice(reply));
        }

        let mut transition = Transition::default();
        match pressed {
            Some(message_id) if reply.photo.is_none() => {
                transition.edit_message = Some(message_id);
                temp.message_id = reply.track.then_some(message_id);
            }
            Some(message_id) => {
                transition.delete_messages.push(message_id);
                temp.message_id = None;
            }
            None => temp.message_id = None,
        }
        if let Some(old) = before.message_id.filter(|&old| Some(old) != pressed) {
            transition.delete_messages.push(old);
        }

        if temp != before {
            self.usecases.update_temporary(&temp).await?;
        }
        debug!(user_id, from = %before.step, to = %temp.step, "wizard transition");

        transition.reply = Some(reply);
        Ok(transition)
    }

    async fn dispatch(&self, temp: &mut Temporary, event: Event) -> Result<Reply, SproutError> {
        match event {
            Event::Command(cmd) => self.on_command(temp, cmd).await,
            Event::Button { callback, .. } => self.on_button(temp, callback).await,
            Event::UnknownButton => Ok(Reply::notice(t("stale_button"))),
            Event::Text(text) => self.on_text(temp, text.trim().to_string()).await,
            Event::Photo(photo) => self.on_photo(temp, photo).await,
        }
    }

    async fn on_command(&self, temp: &mut Temporary, cmd: Command) -> Result<Reply, SproutError> {
        match cmd {
            Command::Start => {
                temp.reset();
                Ok(Reply::prompt(
                    format!("{}\n\n{}", t("welcome"), t("main_menu")),
                    keyboards::main_menu(),
                ))
            }
            Command::Menu => Ok(main_menu(temp)),
            Command::Groups => self.list_groups(temp).await,
            Command::Plants => self.list_plants(temp).await,
            Command::Cancel => Ok(cancel(temp)),
            Command::Help => Ok(Reply::notice(t("help"))),
        }
    }

    async fn on_button(
        &self,
        temp: &mut Temporary,
        callback: Callback,
    ) -> Result<Reply, SproutError> {
        match callback {
            Callback::Menu => Ok(main_menu(temp)),
            Callback::Cancel => Ok(cancel(temp)),
            Callback::GroupAdd => self.start_group(temp),
            Callback::GroupList => self.list_groups(temp).await,
            Callback::PlantAdd => self.start_plant(temp).await,
            Callback::PlantList => self.list_plants(temp).await,
            Callback::Watered(group_id) => self.watered(temp.user_id, group_id).await,
            other => match (temp.step, temp.step.draft()) {
                (Step::ChooseGroup, _) | (_, DraftKind::Group) => {
                    self.group_button(temp, other).await
                }
                (Step::ChoosePlant, _) | (_, DraftKind::Plant) => {
                    self.plant_button(temp, other).await
                }
                _ => Ok(Reply::notice(t("stale_button"))),
            },
        }
    }

    async fn on_text(&self, temp: &mut Temporary, text: String) -> Result<Reply, SproutError> {
        match temp.step.draft() {
            DraftKind::Group => self.group_text(temp, text).await,
            DraftKind::Plant => self.plant_text(temp, text).await,
            DraftKind::None if matches!(temp.step, Step::Start | Step::MainMenu) => {
                Ok(Reply::notice(t("use_menu")).with_keyboard(keyboards::main_menu()))
            }
            DraftKind::None => Ok(Reply::notice(t("use_buttons"))),
        }
    }

    async fn on_photo(&self, temp: &mut Temporary, photo: Vec<u8>) -> Result<Reply, SproutError> {
        match temp.step {
            Step::AddPlantPhoto | Step::UpdatePlantPhoto => self.plant_photo(temp, photo).await,
            _ => Ok(Reply::notice(t("photo_not_expected"))),
        }
    }
}

fn main_menu(temp: &mut Temporary) -> Reply {
    temp.reset();
    temp.step = Step::MainMenu;
    Reply::prompt(t("main_menu"), keyboards::main_menu())
}

fn cancel(temp: &mut Temporary) -> Reply {
    temp.reset();
    Reply::done(t("cancelled"))
}

/// The notice for errors the user can act on.
fn refusal(e: &SproutError) -> Option<&'static str> {
    match e {
        SproutError::GroupAlreadyExists => Some(t("group_exists")),
        SproutError::PlantAlreadyExists => Some(t("plant_exists")),
        SproutError::NotFound(_) => Some(t("stale_button")),
        _ => None,
    }
}

/// A notice when `title` cannot be used as a title.
fn title_problem(title: &str) -> Option<Reply> {
    if title.is_empty() {
        Some(Reply::notice(t("empty_title")))
    } else if title.chars().count() > MAX_TITLE_CHARS {
        Some(Reply::notice(t("title_too_long")))
    } else {
        None
    }
}
