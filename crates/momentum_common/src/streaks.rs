//! Habit streak calculation.
//!
//! A streak is the run of consecutive completed days ending today or
//! yesterday. Anything older than yesterday means the streak is broken.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::calendar::CalendarDay;
use crate::error::Result;

/// Days on which one habit was marked done
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionDateSet {
    days: BTreeSet<CalendarDay>,
}

impl CompletionDateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse stored `YYYY-MM-DD` strings, failing on the first bad one
    pub fn parse_all<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        values
            .iter()
            .map(|v| CalendarDay::parse(v.as_ref()))
            .collect()
    }

    pub fn insert(&mut self, day: CalendarDay) -> bool {
        self.days.insert(day)
    }

    pub fn remove(&mut self, day: CalendarDay) -> bool {
        self.days.remove(&day)
    }

    /// Flip the day; returns true when the day is now completed
    pub fn toggle(&mut self, day: CalendarDay) -> bool {
        if self.days.remove(&day) {
            false
        } else {
            self.days.insert(day);
            true
        }
    }

    pub fn contains(&self, day: CalendarDay) -> bool {
        self.days.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Most recent completed day
    pub fn latest(&self) -> Option<CalendarDay> {
        self.days.iter().next_back().copied()
    }

    /// Days in ascending order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CalendarDay> {
        self.days.iter()
    }

    /// Days up to and including `today`, ascending
    fn up_to(&self, today: CalendarDay) -> impl DoubleEndedIterator<Item = &CalendarDay> {
        self.days.range(..=today)
    }
}

impl FromIterator<CalendarDay> for CompletionDateSet {
    fn from_iter<I: IntoIterator<Item = CalendarDay>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

/// Current streak for a habit, anchored at `today`.
///
/// Completions dated after `today` are ignored.
pub fn compute_streak(dates: &CompletionDateSet, today: CalendarDay) -> u32 {
    let mut days = dates.up_to(today).rev();

    let latest = match days.next() {
        Some(day) => *day,
        None => return 0,
    };

    // Not done today or yesterday: streak broken
    if today.days_since(latest) > 1 {
        return 0;
    }

    let mut streak = 1u32;
    let mut prev = latest;
    for day in days {
        if prev.days_since(*day) != 1 {
            break;
        }
        streak += 1;
        prev = *day;
    }
    streak
}

/// Streak statistics for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    /// Current streak (0 when broken)
    pub current_streak: u32,
    /// Longest run of consecutive days ever
    pub best_streak: u32,
    /// Unique days with a completion
    pub active_days: u32,
    pub last_completed: Option<CalendarDay>,
}

/// Current and best streak plus activity totals, up to `today`
pub fn streak_stats(dates: &CompletionDateSet, today: CalendarDay) -> StreakStats {
    let days: Vec<CalendarDay> = dates.up_to(today).copied().collect();

    if days.is_empty() {
        return StreakStats::default();
    }

    let mut best_streak = 1u32;
    let mut run = 1u32;
    for window in days.windows(2) {
        if window[1].days_since(window[0]) == 1 {
            run += 1;
            best_streak = best_streak.max(run);
        } else {
            run = 1;
        }
    }

    StreakStats {
        current_streak: compute_streak(dates, today),
        best_streak,
        active_days: days.len() as u32,
        last_completed: days.last().copied(),
    }
}
