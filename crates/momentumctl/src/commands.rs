//! Command dispatch for momentumctl.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::cli::{Cli, Commands, HabitCommands};
use crate::output;
use momentum_common::{
    CalendarDay, FileGateway, HabitId, HabitService, MomentumConfig, MomentumError, UserId,
    XpSource, USER_ENV,
};

/// Exit code for rejected input (bad date, unknown habit, level floor...)
pub const EXIT_INPUT: i32 = 2;
/// Exit code for every other failure
pub const EXIT_FAILURE: i32 = 1;

/// Resolve the acting user: flag, then environment, then config
pub fn resolve_user(flag: Option<&str>, config: &MomentumConfig) -> Result<UserId> {
    let env_user = std::env::var(USER_ENV).ok().filter(|u| !u.is_empty());
    let raw = flag
        .map(str::to_string)
        .or(env_user)
        .or_else(|| config.user.default_id.clone())
        .with_context(|| {
            format!(
                "No user given. Pass --user, set {} or user.default_id in config",
                USER_ENV
            )
        })?;
    Ok(UserId::new(&raw)?)
}

/// Run a parsed command line with the real clock
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    run_with(cli, CalendarDay::today_local(), out)
}

/// Run a parsed command line with an explicit "today"
pub fn run_with(cli: Cli, today: CalendarDay, out: &mut dyn Write) -> Result<()> {
    let mut config = MomentumConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }

    let data_dir = config.data_dir();
    let service = HabitService::new(FileGateway::new(&data_dir), &config);
    let user = || -> Result<UserId> {
        let user = resolve_user(cli.user.as_deref(), &config)?;
        debug!(user = %user, data_dir = %data_dir.display(), today = %today, "dispatching");
        Ok(user)
    };
    let json = cli.json;

    match cli.command {
        Commands::Habit { command } => match command {
            HabitCommands::Add { name } => {
                let habit = service.create_habit(&user()?, &name)?;
                emit(out, json, &habit, || {
                    format!("Created habit '{}' ({})", habit.name, habit.id)
                })
            }
            HabitCommands::List => {
                let rows = service.list_habits(&user()?, today)?;
                emit(out, json, &rows, || output::format_habits(&rows))
            }
        },
        Commands::Toggle { habit_id, date } => {
            let day = match date {
                Some(d) => CalendarDay::parse(&d)?,
                None => today,
            };
            let outcome = service.toggle_habit(&user()?, &HabitId::new(&habit_id), day, today)?;
            emit(out, json, &outcome, || output::format_toggle(&outcome))
        }
        Commands::Streak { habit_id } => {
            let stats = service.streak(&user()?, &HabitId::new(&habit_id), today)?;
            emit(out, json, &stats, || output::format_streak(&stats))
        }
        Commands::Journal => {
            let outcome = service.record_journal_entry(&user()?)?;
            emit(out, json, &outcome, || output::format_award(&outcome))
        }
        Commands::Award { delta } => {
            let outcome = service.award(&user()?, delta, XpSource::Manual)?;
            emit(out, json, &outcome, || output::format_award(&outcome))
        }
        Commands::Status => {
            let record = service.status(&user()?)?;
            emit(out, json, &record, || output::format_status(&record))
        }
        Commands::History { limit } => {
            let events = service.history(&user()?)?;
            let recent = &events[events.len().saturating_sub(limit)..];
            emit(out, json, recent, || output::format_history(recent))
        }
        Commands::Config => {
            write!(out, "{}", config.to_toml()?)?;
            Ok(())
        }
    }
}

/// Map a command error to the process exit code
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<MomentumError>() {
        Some(e) if e.is_input_error() => EXIT_INPUT,
        _ => EXIT_FAILURE,
    }
}

/// Write either pretty JSON or the text rendering
fn emit<T, F>(out: &mut dyn Write, json: bool, value: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    } else {
        writeln!(out, "{}", text())?;
    }
    Ok(())
}
