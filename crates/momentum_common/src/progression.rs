//! Level / XP progression engine.
//!
//! ## XP Curve
//!
//! The cost of the next level grows linearly: reaching `level + 1` from
//! `level` costs `level * 100` XP.
//!
//! - Level 1 → 2: 100 XP (cumulative 100)
//! - Level 2 → 3: 200 XP (cumulative 300)
//! - Level 3 → 4: 300 XP (cumulative 600)
//!
//! A record stores the running total, the current level and the XP still
//! needed for the next level. Awards move all three; a penalty can move the
//! level back down. Awarding a delta and then its negation restores the
//! original record.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MomentumError, Result};

/// XP cost multiplier per level
pub const XP_PER_LEVEL: i64 = 100;

/// XP needed to go from `level` to `level + 1`
pub fn xp_to_next_level(level: u32) -> i64 {
    level as i64 * XP_PER_LEVEL
}

/// Total XP at the start of `level` (level 1 starts at 0)
pub fn cumulative_xp_for_level(level: u32) -> i128 {
    cumulative_at(level as i128)
}

fn cumulative_at(level: i128) -> i128 {
    XP_PER_LEVEL as i128 * level * (level - 1) / 2
}

/// Highest level whose start is at or below `position` (a non-negative
/// distance from the start of level 1)
fn level_at(position: i128) -> i128 {
    let estimate = (1.0 + (1.0 + 8.0 * position as f64 / XP_PER_LEVEL as f64).sqrt()) / 2.0;
    let mut level = (estimate as i128).max(1);
    while level > 1 && cumulative_at(level) > position {
        level -= 1;
    }
    while cumulative_at(level + 1) <= position {
        level += 1;
    }
    level
}

/// What to do when a penalty would push a user below level 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelFloorPolicy {
    /// Refuse the award, leaving the record unchanged
    #[default]
    Reject,
    /// Pin the user to the start of level 1
    Clamp,
}

impl std::str::FromStr for LevelFloorPolicy {
    type Err = MomentumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "clamp" => Ok(Self::Clamp),
            other => Err(MomentumError::InvalidRecord(format!(
                "unknown level floor policy '{}' (expected reject or clamp)",
                other
            ))),
        }
    }
}

/// Per-user progression snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionRecord {
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
    pub level: u32,
    /// XP still needed to reach `level + 1`
    #[serde(rename = "remainingXP")]
    pub remaining_xp: i64,
}

impl Default for ProgressionRecord {
    fn default() -> Self {
        Self {
            total_xp: 0,
            level: 1,
            remaining_xp: xp_to_next_level(1),
        }
    }
}

impl ProgressionRecord {
    /// Consistent record for a given total, derived by replay from zero
    pub fn from_total_xp(total_xp: i64) -> Result<Self> {
        if total_xp < 0 {
            return Err(MomentumError::InvalidRecord(format!(
                "total XP must be non-negative, got {}",
                total_xp
            )));
        }
        award_xp(&Self::default(), total_xp)
    }

    /// Check the structural ranges the engine relies on
    pub fn validate(&self) -> Result<()> {
        if self.level == 0 {
            return Err(MomentumError::InvalidRecord("level must be at least 1".into()));
        }
        if self.total_xp < 0 {
            return Err(MomentumError::InvalidRecord(format!(
                "total XP must be non-negative, got {}",
                self.total_xp
            )));
        }
        let cap = xp_to_next_level(self.level);
        if self.remaining_xp <= 0 || self.remaining_xp > cap {
            return Err(MomentumError::InvalidRecord(format!(
                "remaining XP {} outside (0, {}] for level {}",
                self.remaining_xp, cap, self.level
            )));
        }
        Ok(())
    }

    /// True when replaying `total_xp` from zero lands on this record
    pub fn is_consistent(&self) -> bool {
        if self.validate().is_err() {
            return false;
        }
        let earned_in_level = (xp_to_next_level(self.level) - self.remaining_xp) as i128;
        cumulative_xp_for_level(self.level) + earned_in_level == self.total_xp as i128
    }

    /// XP earned inside the current level
    pub fn xp_into_level(&self) -> i64 {
        xp_to_next_level(self.level) - self.remaining_xp
    }

    /// Progress within the current level (0.0-1.0)
    pub fn progress_fraction(&self) -> f64 {
        let cap = xp_to_next_level(self.level);
        if cap <= 0 {
            return 0.0;
        }
        (self.xp_into_level() as f64 / cap as f64).clamp(0.0, 1.0)
    }
}

/// Apply a signed XP delta, rejecting penalties below level 1
pub fn award_xp(record: &ProgressionRecord, delta: i64) -> Result<ProgressionRecord> {
    award_xp_with(record, delta, LevelFloorPolicy::Reject)
}

/// Apply a signed XP delta with an explicit level floor policy
pub fn award_xp_with(
    record: &ProgressionRecord,
    delta: i64,
    policy: LevelFloorPolicy,
) -> Result<ProgressionRecord> {
    record.validate()?;

    let overflow = || MomentumError::XpOverflow(delta);
    let total_xp = record.total_xp.checked_add(delta).ok_or_else(overflow)?;

    // Distance from the start of level 1, before and after the delta. The
    // target level is solved from the curve rather than walked one level at
    // a time.
    let position = cumulative_xp_for_level(record.level) + record.xp_into_level() as i128;
    let target = position + delta as i128;

    if target < 0 || total_xp < 0 {
        return match policy {
            LevelFloorPolicy::Reject => Err(MomentumError::LevelFloor {
                level: record.level,
                delta,
            }),
            LevelFloorPolicy::Clamp => {
                debug!(delta, from_level = record.level, "clamping progression at level 1");
                Ok(ProgressionRecord::default())
            }
        };
    }

    let level = level_at(target);
    let level = u32::try_from(level).map_err(|_| overflow())?;
    let next_start = cumulative_xp_for_level(level) + xp_to_next_level(level) as i128;
    let remaining = i64::try_from(next_start - target).map_err(|_| overflow())?;

    if level != record.level {
        debug!(delta, from_level = record.level, to_level = level, "level changed");
    }

    Ok(ProgressionRecord {
        total_xp,
        level,
        remaining_xp: remaining,
    })
}

/// Fold a delta history from the default record
pub fn replay<I>(deltas: I) -> Result<ProgressionRecord>
where
    I: IntoIterator<Item = i64>,
{
    deltas
        .into_iter()
        .try_fold(ProgressionRecord::default(), |record, delta| {
            award_xp(&record, delta)
        })
}

/// Before/after pair for one award, used to drive level-up UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardOutcome {
    pub before: ProgressionRecord,
    pub after: ProgressionRecord,
}

impl AwardOutcome {
    pub fn new(before: ProgressionRecord, after: ProgressionRecord) -> Self {
        Self { before, after }
    }

    /// Signed number of levels crossed
    pub fn levels_changed(&self) -> i64 {
        self.after.level as i64 - self.before.level as i64
    }

    pub fn leveled_up(&self) -> bool {
        self.levels_changed() > 0
    }

    pub fn leveled_down(&self) -> bool {
        self.levels_changed() < 0
    }

    pub fn delta(&self) -> i64 {
        self.after.total_xp - self.before.total_xp
    }
}
