//! End-to-end scenarios against the file gateway.

use momentum_common::{
    CalendarDay, FileGateway, HabitService, MomentumConfig, PersistenceGateway,
    ProgressionRecord, UserId, XpSource,
};
use tempfile::tempdir;

fn day(s: &str) -> CalendarDay {
    CalendarDay::parse(s).unwrap()
}

fn service(root: &std::path::Path) -> HabitService<FileGateway> {
    HabitService::new(FileGateway::new(root), &MomentumConfig::default())
}

#[test]
fn test_complete_then_uncheck_in_one_session() {
    let dir = tempdir().unwrap();
    let svc = service(dir.path());
    let user = UserId::new("erin").unwrap();
    let habit = svc.create_habit(&user, "Drink water").unwrap();

    // Build some history first
    for d in ["2024-04-01", "2024-04-02", "2024-04-03"] {
        svc.toggle_habit(&user, &habit.id, day(d), day(d)).unwrap();
    }
    svc.record_journal_entry(&user).unwrap();

    let today = day("2024-04-04");
    let record_before = svc.status(&user).unwrap();
    let streak_before = svc.streak(&user, &habit.id, today).unwrap().current_streak;
    assert_eq!(streak_before, 3);

    let on = svc.toggle_habit(&user, &habit.id, today, today).unwrap();
    assert!(on.completed);
    assert_eq!(on.streak, 4);

    let off = svc.toggle_habit(&user, &habit.id, today, today).unwrap();
    assert!(!off.completed);

    assert_eq!(svc.status(&user).unwrap(), record_before);
    assert_eq!(
        svc.streak(&user, &habit.id, today).unwrap().current_streak,
        streak_before
    );
}

#[test]
fn test_level_up_persists_across_restarts() {
    let dir = tempdir().unwrap();
    let user = UserId::new("frank").unwrap();

    {
        let svc = service(dir.path());
        let outcome = svc.award(&user, 95, XpSource::Manual).unwrap();
        assert!(!outcome.leveled_up());
    }

    let svc = service(dir.path());
    let outcome = svc.record_journal_entry(&user).unwrap();
    assert!(outcome.leveled_up());
    assert_eq!(
        outcome.after,
        ProgressionRecord {
            total_xp: 105,
            level: 2,
            remaining_xp: 195,
        }
    );

    let doc = svc.gateway().load(&user).unwrap().unwrap();
    assert_eq!(doc.history.len(), 2);
    let deltas: Vec<i64> = doc.history.iter().map(|e| e.delta).collect();
    assert_eq!(
        momentum_common::progression::replay(deltas).unwrap(),
        doc.progression
    );
}

#[test]
fn test_broken_streak_keeps_best() {
    let dir = tempdir().unwrap();
    let svc = service(dir.path());
    let user = UserId::new("gina").unwrap();
    let habit = svc.create_habit(&user, "Practice piano").unwrap();

    for d in ["2024-01-10", "2024-01-11", "2024-01-12", "2024-01-13"] {
        svc.toggle_habit(&user, &habit.id, day(d), day(d)).unwrap();
    }

    let stats = svc.streak(&user, &habit.id, day("2024-01-20")).unwrap();
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.best_streak, 4);
    assert_eq!(stats.active_days, 4);
}

#[test]
fn test_users_are_isolated() {
    let dir = tempdir().unwrap();
    let svc = service(dir.path());
    let a = UserId::new("hana").unwrap();
    let b = UserId::new("ivan").unwrap();

    svc.award(&a, 250, XpSource::Manual).unwrap();
    assert_eq!(svc.status(&b).unwrap(), ProgressionRecord::default());
    assert!(svc.gateway().load(&b).unwrap().is_none());
}
