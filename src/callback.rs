//! Inline-button payloads.
//!
//! Every button carries a short `kind:value` string (Telegram allows at most
//! 64 bytes). Parsing is total: anything unrecognized yields `None`, which
//! the wizard answers as a stale button.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// What to change on a scenario card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    Title,
    Description,
    LastWatering,
    Interval,
    Delete,
}

/// What to change on a plant card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantAction {
    Title,
    Description,
    Group,
    Photo,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Menu,
    Cancel,
    Confirm,
    /// Decorative button (calendar header, blank cells).
    Noop,
    GroupAdd,
    GroupList,
    Group(i64),
    GroupAction(GroupAction),
    PlantAdd,
    PlantList,
    Plant(i64),
    PlantAction(PlantAction),
    /// Show the calendar for the month starting on this date.
    Calendar(NaiveDate),
    Date(NaiveDate),
    Interval(i64),
    Photo(bool),
    /// "Group watered" on a reminder.
    Watered(i64),
}

impl GroupAction {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::LastWatering => "last",
            Self::Interval => "interval",
            Self::Delete => "delete",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "last" => Some(Self::LastWatering),
            "interval" => Some(Self::Interval),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl PlantAction {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Group => "group",
            Self::Photo => "photo",
            Self::Delete => "delete",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "group" => Some(Self::Group),
            "photo" => Some(Self::Photo),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl Callback {
    /// Parse a button payload. Returns `None` for unknown or malformed data.
    pub fn parse(data: &str) -> Option<Self> {
        let (kind, value) = match data.split_once(':') {
            Some((k, v)) => (k, Some(v)),
            None => (data, None),
        };

        match (kind, value) {
            ("menu", None) => Some(Self::Menu),
            ("cancel", None) => Some(Self::Cancel),
            ("confirm", None) => Some(Self::Confirm),
            ("noop", None) => Some(Self::Noop),
            ("group", Some("add")) => Some(Self::GroupAdd),
            ("group", Some("list")) => Some(Self::GroupList),
            ("group", Some(id)) => parse_id(id).map(Self::Group),
            ("group_action", Some(a)) => GroupAction::parse(a).map(Self::GroupAction),
            ("plant", Some("add")) => Some(Self::PlantAdd),
            ("plant", Some("list")) => Some(Self::PlantList),
            ("plant", Some(id)) => parse_id(id).map(Self::Plant),
            ("plant_action", Some(a)) => PlantAction::parse(a).map(Self::PlantAction),
            ("cal", Some(month)) => NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
                .ok()
                .map(Self::Calendar),
            ("date", Some(d)) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .ok()
                .map(Self::Date),
            ("interval", Some(n)) => parse_id(n).map(Self::Interval),
            ("photo", Some("yes")) => Some(Self::Photo(true)),
            ("photo", Some("no")) => Some(Self::Photo(false)),
            ("watered", Some(id)) => parse_id(id).map(Self::Watered),
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }
}

/// Positive integers only.
fn parse_id(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().filter(|&n| n > 0)
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Menu => f.write_str("menu"),
            Self::Cancel => f.write_str("cancel"),
            Self::Confirm => f.write_str("confirm"),
            Self::Noop => f.write_str("noop"),
            Self::GroupAdd => f.write_str("group:add"),
            Self::GroupList => f.write_str("group:list"),
            Self::Group(id) => write!(f, "group:{id}"),
            Self::GroupAction(a) => write!(f, "group_action:{}", a.as_str()),
            Self::PlantAdd => f.write_str("plant:add"),
            Self::PlantList => f.write_str("plant:list"),
            Self::Plant(id) => write!(f, "plant:{id}"),
            Self::PlantAction(a) => write!(f, "plant_action:{}", a.as_str()),
            Self::Calendar(month) => write!(f, "cal:{:04}-{:02}", month.year(), month.month()),
            Self::Date(d) => write!(f, "date:{}", d.format("%Y-%m-%d")),
            Self::Interval(n) => write!(f, "interval:{n}"),
            Self::Photo(true) => f.write_str("photo:yes"),
            Self::Photo(false) => f.write_str("photo:no"),
            Self::Watered(id) => write!(f, "watered:{id}"),
        }
    }
}
