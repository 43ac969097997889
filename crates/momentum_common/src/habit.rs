//! Habit and per-user document types stored by the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{MomentumError, Result};
use crate::progression::ProgressionRecord;
use crate::streaks::CompletionDateSet;
use crate::xp_events::XpEvent;

/// Longest accepted user id
pub const MAX_USER_ID_LEN: usize = 64;

/// Longest accepted habit name
pub const MAX_HABIT_NAME_LEN: usize = 120;

/// Opaque user identifier, restricted to `[A-Za-z0-9_-]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: &str) -> Result<Self> {
        let valid = !id.is_empty()
            && id.len() <= MAX_USER_ID_LEN
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(MomentumError::InvalidUser(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: &str) -> Self {
        Self(id.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completions: CompletionDateSet,
}

impl Habit {
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MomentumError::InvalidHabitName("name is empty".into()));
        }
        if name.chars().count() > MAX_HABIT_NAME_LEN {
            return Err(MomentumError::InvalidHabitName(format!(
                "name longer than {} characters",
                MAX_HABIT_NAME_LEN
            )));
        }
        Ok(Self {
            id: HabitId::generate(),
            name: name.to_string(),
            created_at: Utc::now(),
            completions: CompletionDateSet::new(),
        })
    }
}

/// Everything stored for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    pub user_id: UserId,
    #[serde(default)]
    pub progression: ProgressionRecord,
    #[serde(default)]
    pub habits: BTreeMap<HabitId, Habit>,
    #[serde(default)]
    pub history: Vec<XpEvent>,
}

impl UserDocument {
    /// Fresh document with the starting progression record
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            progression: ProgressionRecord::default(),
            habits: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    pub fn habit(&self, id: &HabitId) -> Result<&Habit> {
        self.habits
            .get(id)
            .ok_or_else(|| MomentumError::HabitNotFound(id.to_string()))
    }

    pub fn habit_mut(&mut self, id: &HabitId) -> Result<&mut Habit> {
        self.habits
            .get_mut(id)
            .ok_or_else(|| MomentumError::HabitNotFound(id.to_string()))
    }
}
