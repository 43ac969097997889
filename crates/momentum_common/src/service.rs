//! Habit service: the read-compute-write flows callers use.
//!
//! Each operation runs inside a single gateway transaction, so toggling a
//! habit and awarding its points either both land or neither does.

use serde::Serialize;
use tracing::{debug, info};

use crate::calendar::CalendarDay;
use crate::config::MomentumConfig;
use crate::error::{MomentumError, Result};
use crate::gateway::PersistenceGateway;
use crate::habit::{Habit, HabitId, UserDocument, UserId};
use crate::progression::{award_xp_with, AwardOutcome, LevelFloorPolicy, ProgressionRecord};
use crate::streaks::{compute_streak, streak_stats, StreakStats};
use crate::xp_events::{append_bounded, XpEvent, XpSource};

/// Result of flipping one habit for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleOutcome {
    pub habit_id: HabitId,
    pub day: CalendarDay,
    /// True when the day is now marked done
    pub completed: bool,
    /// Streak after the toggle, anchored at today
    pub streak: u32,
    pub award: AwardOutcome,
}

/// Habit row for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitSummary {
    pub id: HabitId,
    pub name: String,
    pub done_today: bool,
    pub stats: StreakStats,
}

pub struct HabitService<G> {
    gateway: G,
    habit_points: i64,
    journal_points: i64,
    level_floor: LevelFloorPolicy,
    history_limit: usize,
}

impl<G: PersistenceGateway> HabitService<G> {
    pub fn new(gateway: G, config: &MomentumConfig) -> Self {
        Self {
            gateway,
            habit_points: config.points.habit,
            journal_points: config.points.journal,
            level_floor: config.progression.level_floor,
            history_limit: config.progression.history_limit,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn create_habit(&self, user: &UserId, name: &str) -> Result<Habit> {
        let habit = Habit::new(name)?;
        self.gateway.transact(user, |doc| {
            doc.habits.insert(habit.id.clone(), habit.clone());
            Ok(())
        })?;
        info!(user = %user, habit = %habit.id, name = %habit.name, "habit created");
        Ok(habit)
    }

    /// Habits sorted by name, with streaks anchored at `today`
    pub fn list_habits(&self, user: &UserId, today: CalendarDay) -> Result<Vec<HabitSummary>> {
        let doc = match self.gateway.load(user)? {
            Some(doc) => doc,
            None => return Ok(Vec::new()),
        };

        let mut rows: Vec<HabitSummary> = doc
            .habits
            .values()
            .map(|h| HabitSummary {
                id: h.id.clone(),
                name: h.name.clone(),
                done_today: h.completions.contains(today),
                stats: streak_stats(&h.completions, today),
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    /// Mark or un-mark `day` for a habit and award or revoke its points
    pub fn toggle_habit(
        &self,
        user: &UserId,
        habit_id: &HabitId,
        day: CalendarDay,
        today: CalendarDay,
    ) -> Result<ToggleOutcome> {
        if day > today {
            return Err(MomentumError::InvalidDate {
                value: day.to_string(),
                reason: format!("after today ({})", today),
            });
        }

        let outcome = self.gateway.transact(user, |doc| {
            let habit = doc.habit_mut(habit_id)?;
            let completed = habit.completions.toggle(day);
            let streak = compute_streak(&habit.completions, today);

            let (delta, source) = if completed {
                (self.habit_points, XpSource::HabitCompleted)
            } else {
                (-self.habit_points, XpSource::HabitUnchecked)
            };
            let award = self.apply_award(doc, delta, source)?;

            Ok(ToggleOutcome {
                habit_id: habit_id.clone(),
                day,
                completed,
                streak,
                award,
            })
        })?;

        debug!(
            user = %user,
            habit = %habit_id,
            day = %day,
            completed = outcome.completed,
            streak = outcome.streak,
            "habit toggled"
        );
        Ok(outcome)
    }

    pub fn record_journal_entry(&self, user: &UserId) -> Result<AwardOutcome> {
        self.award(user, self.journal_points, XpSource::JournalEntry)
    }

    /// Apply any point delta the host application decides on
    pub fn award(&self, user: &UserId, delta: i64, source: XpSource) -> Result<AwardOutcome> {
        self.gateway
            .transact(user, |doc| self.apply_award(doc, delta, source))
    }

    pub fn streak(
        &self,
        user: &UserId,
        habit_id: &HabitId,
        today: CalendarDay,
    ) -> Result<StreakStats> {
        let doc = self
            .gateway
            .load(user)?
            .ok_or_else(|| MomentumError::HabitNotFound(habit_id.to_string()))?;
        Ok(streak_stats(&doc.habit(habit_id)?.completions, today))
    }

    /// Current record, or the starting record for an unknown user
    pub fn status(&self, user: &UserId) -> Result<ProgressionRecord> {
        Ok(self
            .gateway
            .load(user)?
            .map(|doc| doc.progression)
            .unwrap_or_default())
    }

    /// Recent XP events, oldest first
    pub fn history(&self, user: &UserId) -> Result<Vec<XpEvent>> {
        Ok(self
            .gateway
            .load(user)?
            .map(|doc| doc.history)
            .unwrap_or_default())
    }

    fn apply_award(
        &self,
        doc: &mut UserDocument,
        delta: i64,
        source: XpSource,
    ) -> Result<AwardOutcome> {
        let before = doc.progression;
        let after = award_xp_with(&before, delta, self.level_floor)?;
        let outcome = AwardOutcome::new(before, after);

        doc.progression = after;
        append_bounded(
            &mut doc.history,
            XpEvent::new(source, &outcome),
            self.history_limit,
        );

        if outcome.leveled_up() {
            info!(user = %doc.user_id, level = after.level, "level up");
        } else if outcome.leveled_down() {
            info!(user = %doc.user_id, level = after.level, "level down");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    fn service() -> HabitService<MemoryGateway> {
        HabitService::new(MemoryGateway::new(), &MomentumConfig::default())
    }

    fn user() -> UserId {
        UserId::new("dana").unwrap()
    }

    fn today() -> CalendarDay {
        CalendarDay::from_ymd(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_toggle_awards_and_revokes() {
        let svc = service();
        let habit = svc.create_habit(&user(), "Meditate").unwrap();

        let on = svc.toggle_habit(&user(), &habit.id, today(), today()).unwrap();
        assert!(on.completed);
        assert_eq!(on.streak, 1);
        assert_eq!(on.award.after.total_xp, 10);

        let off = svc.toggle_habit(&user(), &habit.id, today(), today()).unwrap();
        assert!(!off.completed);
        assert_eq!(off.streak, 0);
        assert_eq!(svc.status(&user()).unwrap(), ProgressionRecord::default());
        assert_eq!(svc.history(&user()).unwrap().len(), 2);
    }

    #[test]
    fn test_uncheck_with_no_points_is_rejected_atomically() {
        let svc = service();
        let habit = svc.create_habit(&user(), "Run").unwrap();
        let yesterday = today().pred().unwrap();

        // Completed before points existed: seed the day directly
        svc.gateway()
            .transact(&user(), |doc| {
                doc.habit_mut(&habit.id)?.completions.insert(yesterday);
                Ok(())
            })
            .unwrap();

        let err = svc
            .toggle_habit(&user(), &habit.id, yesterday, today())
            .unwrap_err();
        assert!(matches!(err, MomentumError::LevelFloor { .. }));

        // Day is still marked, progression untouched
        let stats = svc.streak(&user(), &habit.id, today()).unwrap();
        assert_eq!(stats.current_streak, 1);
        assert_eq!(svc.status(&user()).unwrap(), ProgressionRecord::default());
    }

    #[test]
    fn test_future_day_rejected() {
        let svc = service();
        let habit = svc.create_habit(&user(), "Read").unwrap();
        let tomorrow = today().succ().unwrap();
        assert!(svc.toggle_habit(&user(), &habit.id, tomorrow, today()).is_err());
    }

    #[test]
    fn test_unknown_habit() {
        let svc = service();
        let err = svc
            .toggle_habit(&user(), &HabitId::new("missing"), today(), today())
            .unwrap_err();
        assert!(matches!(err, MomentumError::HabitNotFound(_)));
    }

    #[test]
    fn test_journal_entry_award() {
        let svc = service();
        let outcome = svc.record_journal_entry(&user()).unwrap();
        assert_eq!(outcome.after.total_xp, 10);
        assert_eq!(svc.history(&user()).unwrap()[0].source, XpSource::JournalEntry);
    }

    #[test]
    fn test_list_habits_sorted_with_streaks() {
        let svc = service();
        let walk = svc.create_habit(&user(), "Walk").unwrap();
        svc.create_habit(&user(), "Floss").unwrap();
        svc.toggle_habit(&user(), &walk.id, today().pred().unwrap(), today())
            .unwrap();
        svc.toggle_habit(&user(), &walk.id, today(), today()).unwrap();

        let rows = svc.list_habits(&user(), today()).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Floss", "Walk"]);
        assert!(rows[1].done_today);
        assert_eq!(rows[1].stats.current_streak, 2);
        assert_eq!(rows[0].stats.current_streak, 0);
    }

    #[test]
    fn test_status_for_unknown_user() {
        assert_eq!(service().status(&user()).unwrap(), ProgressionRecord::default());
        assert!(service().list_habits(&user(), today()).unwrap().is_empty());
    }

    #[test]
    fn test_clamp_policy_from_config() {
        let mut config = MomentumConfig::default();
        config.progression.level_floor = LevelFloorPolicy::Clamp;
        let svc = HabitService::new(MemoryGateway::new(), &config);

        svc.award(&user(), 50, XpSource::Manual).unwrap();
        let outcome = svc.award(&user(), -80, XpSource::Manual).unwrap();
        assert_eq!(outcome.after, ProgressionRecord::default());
    }
}
