use thiserror::Error;

/// Top-level error type for Sprout.
#[derive(Debug, Error)]
pub enum SproutError {
    /// Database transport or constraint failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// A single-row lookup found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The user already has a watering scenario with this title.
    #[error("group already exists")]
    GroupAlreadyExists,

    /// The scenario already contains a plant with this title.
    #[error("plant already exists")]
    PlantAlreadyExists,

    /// Wizard scratchpad data does not match its step.
    #[error("decode error: {0}")]
    Decode(String),

    /// A value rejected by a business rule (e.g. a zero-day interval).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SproutError {
    /// Whether this error is a user-visible domain conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::GroupAlreadyExists | Self::PlantAlreadyExists)
    }
}
