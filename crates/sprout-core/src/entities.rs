//! Persisted entities: users, watering scenarios, plants, the wizard
//! scratchpad, and the notification audit trail.

use crate::error::SproutError;
use crate::message::Sender;
use crate::step::{DraftKind, Step};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A chat-platform user. Created on first contact, never deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    /// External identity, unique.
    pub telegram_id: i64,
    pub username: Option<String>,
    pub firstname: String,
    pub lastname: Option<String>,
    pub is_bot: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Sender> for User {
    fn from(sender: &Sender) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            telegram_id: sender.telegram_id,
            username: sender.username.clone(),
            firstname: sender.first_name.clone(),
            lastname: sender.last_name.clone(),
            is_bot: sender.is_bot,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A watering scenario: a named schedule that groups plants.
///
/// Also serves as the partial entity while the wizard builds or edits a
/// scenario, so every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Group {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub last_watering_date: NaiveDateTime,
    pub next_watering_date: NaiveDateTime,
    /// Whole days, at least 1 once committed.
    pub watering_interval: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// An empty draft owned by `user_id`.
    pub fn draft(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }
}

/// A plant inside a watering scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Plant {
    pub id: i64,
    pub group_id: i64,
    /// Always equal to the owning group's `user_id`.
    pub user_id: i64,
    pub title: String,
    pub description: String,
    /// Opaque image bytes; empty when the plant has no photo.
    pub photo: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plant {
    /// An empty draft owned by `user_id`.
    pub fn draft(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    pub fn has_photo(&self) -> bool {
        !self.photo.is_empty()
    }
}

/// The per-user wizard scratchpad. Exactly one row per user.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct Temporary {
    pub id: i64,
    pub user_id: i64,
    #[sqlx(try_from = "String")]
    pub step: Step,
    /// Last inline-keyboard message sent for the current flow.
    pub message_id: Option<i64>,
    /// JSON snapshot of the partial entity implied by `step`.
    pub data: Option<String>,
}

impl Temporary {
    /// A fresh scratchpad at [`Step::Start`].
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// Back to the initial state: no draft, no tracked message, `Start`.
    pub fn reset(&mut self) {
        self.step = Step::Start;
        self.message_id = None;
        self.data = None;
    }

    /// Decode the group draft. Fails unless the step carries a group.
    pub fn group(&self) -> Result<Group, SproutError> {
        self.decode(DraftKind::Group)
    }

    /// Decode the plant draft. Fails unless the step carries a plant.
    pub fn plant(&self) -> Result<Plant, SproutError> {
        self.decode(DraftKind::Plant)
    }

    pub fn set_group(&mut self, group: &Group) -> Result<(), SproutError> {
        self.data = Some(encode(group)?);
        Ok(())
    }

    pub fn set_plant(&mut self, plant: &Plant) -> Result<(), SproutError> {
        self.data = Some(encode(plant)?);
        Ok(())
    }

    fn decode<T: DeserializeOwned>(&self, expected: DraftKind) -> Result<T, SproutError> {
        if self.step.draft() != expected {
            return Err(SproutError::Decode(format!(
                "step {} does not carry a {expected:?} draft",
                self.step
            )));
        }
        let data = self
            .data
            .as_deref()
            .ok_or_else(|| SproutError::Decode(format!("step {} has no draft", self.step)))?;
        serde_json::from_str(data)
            .map_err(|e| SproutError::Decode(format!("bad {expected:?} draft: {e}")))
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, SproutError> {
    serde_json::to_string(value).map_err(|e| SproutError::Decode(format!("encode draft: {e}")))
}

/// Append-only record of a sent watering notification.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct Notification {
    pub id: i64,
    pub group_id: i64,
    pub message_id: i64,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}
