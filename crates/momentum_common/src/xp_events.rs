//! XP event history.
//!
//! The progression record is the source of truth. Events are an audit trail
//! kept next to it so a user's level can be re-derived with
//! [`crate::progression::replay`] when the history is complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progression::AwardOutcome;

/// What granted or revoked the points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpSource {
    HabitCompleted,
    HabitUnchecked,
    JournalEntry,
    Manual,
}

impl XpSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HabitCompleted => "habit completed",
            Self::HabitUnchecked => "habit unchecked",
            Self::JournalEntry => "journal entry",
            Self::Manual => "manual",
        }
    }
}

/// One applied award
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpEvent {
    pub at: DateTime<Utc>,
    pub source: XpSource,
    pub delta: i64,
    pub level_after: u32,
}

impl XpEvent {
    pub fn new(source: XpSource, outcome: &AwardOutcome) -> Self {
        Self {
            at: Utc::now(),
            source,
            delta: outcome.delta(),
            level_after: outcome.after.level,
        }
    }
}

/// Append an event, dropping the oldest ones beyond `limit`
pub fn append_bounded(history: &mut Vec<XpEvent>, event: XpEvent, limit: usize) {
    history.push(event);
    if history.len() > limit {
        let excess = history.len() - limit;
        history.drain(..excess);
    }
}
