//! Shared types and logic for Momentum.
//!
//! Pure streak and progression computations, plus the persistence gateway
//! and habit service that drive them.

pub mod calendar;
pub mod config;
pub mod error;
pub mod gateway;
pub mod habit;
pub mod progression;
pub mod service;
pub mod streaks;
pub mod xp_events;

pub use calendar::CalendarDay;
pub use config::MomentumConfig;
pub use error::{MomentumError, Result};
pub use gateway::{FileGateway, MemoryGateway, PersistenceGateway};
pub use habit::{Habit, HabitId, UserDocument, UserId};
pub use progression::{
    award_xp, award_xp_with, xp_to_next_level, AwardOutcome, LevelFloorPolicy, ProgressionRecord,
};
pub use service::{HabitService, HabitSummary, ToggleOutcome};
pub use streaks::{compute_streak, streak_stats, CompletionDateSet, StreakStats};
pub use xp_events::{XpEvent, XpSource};

/// Environment variable naming the acting user
pub const USER_ENV: &str = "MOMENTUM_USER";
