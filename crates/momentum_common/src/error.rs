//! Error types for Momentum.

use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, MomentumError>;

#[derive(Error, Debug)]
pub enum MomentumError {
    #[error("Invalid calendar day '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("Invalid progression record: {0}")]
    InvalidRecord(String),

    #[error("Penalty of {delta} XP would drop level {level} below level 1")]
    LevelFloor { level: u32, delta: i64 },

    #[error("XP arithmetic overflow applying delta {0}")]
    XpOverflow(i64),

    #[error("Invalid user id '{0}'")]
    InvalidUser(String),

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MomentumError {
    /// Stable short code for logs and CLI output
    pub fn code(&self) -> &'static str {
        match self {
            MomentumError::InvalidDate { .. } => "invalid_date",
            MomentumError::InvalidRecord(_) => "invalid_record",
            MomentumError::LevelFloor { .. } => "level_floor",
            MomentumError::XpOverflow(_) => "xp_overflow",
            MomentumError::InvalidUser(_) => "invalid_user",
            MomentumError::InvalidHabitName(_) => "invalid_habit_name",
            MomentumError::HabitNotFound(_) => "habit_not_found",
            MomentumError::Store(_) => "store",
            MomentumError::Io(_) => "io",
            MomentumError::Json(_) => "json",
        }
    }

    /// True for errors caused by caller input rather than storage
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MomentumError::InvalidDate { .. }
                | MomentumError::InvalidRecord(_)
                | MomentumError::LevelFloor { .. }
                | MomentumError::InvalidUser(_)
                | MomentumError::InvalidHabitName(_)
                | MomentumError::HabitNotFound(_)
        )
    }
}
