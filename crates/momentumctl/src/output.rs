//! Text formatting for momentumctl - ASCII only.

use momentum_common::{
    xp_to_next_level, AwardOutcome, HabitSummary, ProgressionRecord, StreakStats, ToggleOutcome,
    XpEvent,
};
use owo_colors::OwoColorize;

/// Bar width in characters, excluding brackets
pub const BAR_WIDTH: usize = 20;

/// `[=====---------------]` for a 0.0-1.0 fraction
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).floor() as usize).min(width);
    format!("[{}{}]", "=".repeat(filled), "-".repeat(width - filled))
}

pub fn format_status(record: &ProgressionRecord) -> String {
    let cap = xp_to_next_level(record.level);
    format!(
        "Level {}  {} {}/{} XP  ({} to next, {} total)",
        record.level,
        progress_bar(record.progress_fraction(), BAR_WIDTH),
        record.xp_into_level(),
        cap,
        record.remaining_xp,
        record.total_xp
    )
}

/// Signed XP line plus a banner when the level moved
pub fn format_award(outcome: &AwardOutcome) -> String {
    let delta = outcome.delta();
    let sign = if delta >= 0 { "+" } else { "" };
    let mut out = format!("{}{} XP\n{}", sign, delta, format_status(&outcome.after));

    if outcome.leveled_up() {
        out.push_str(&format!(
            "\n{} You reached level {}",
            "[LEVEL UP]".bright_green().bold(),
            outcome.after.level
        ));
    } else if outcome.leveled_down() {
        out.push_str(&format!(
            "\n{} Back to level {}",
            "[LEVEL DOWN]".yellow(),
            outcome.after.level
        ));
    }
    out
}

pub fn format_toggle(outcome: &ToggleOutcome) -> String {
    let action = if outcome.completed { "done" } else { "undone" };
    format!(
        "{} marked {} for {}  (streak {})\n{}",
        outcome.habit_id,
        action,
        outcome.day,
        outcome.streak,
        format_award(&outcome.award)
    )
}

pub fn format_streak(stats: &StreakStats) -> String {
    let last = stats
        .last_completed
        .map(|d| d.to_string())
        .unwrap_or_else(|| "never".to_string());
    format!(
        "current_streak  {}\nbest_streak     {}\nactive_days     {}\nlast_completed  {}",
        stats.current_streak, stats.best_streak, stats.active_days, last
    )
}

pub fn format_habits(rows: &[HabitSummary]) -> String {
    if rows.is_empty() {
        return "No habits yet. Add one with: momentumctl habit add <name>".to_string();
    }
    rows.iter()
        .map(|r| {
            let mark = if r.done_today { "[x]" } else { "[ ]" };
            format!(
                "{} {:24} streak {:>3}  best {:>3}  {}",
                mark, r.name, r.stats.current_streak, r.stats.best_streak, r.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_history(events: &[XpEvent]) -> String {
    if events.is_empty() {
        return "No XP events recorded".to_string();
    }
    events
        .iter()
        .map(|e| {
            format!(
                "{}  {:>+6} XP  {:16} -> level {}",
                e.at.format("%Y-%m-%d %H:%M"),
                e.delta,
                e.source.label(),
                e.level_after
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
