//! Command-line surface for momentumctl.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "momentumctl")]
#[command(about = "Momentum - habit streaks and XP progression", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Acting user id (else $MOMENTUM_USER, else user.default_id in config)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Directory holding user documents
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (else $MOMENTUM_CONFIG, ~/.config/momentum/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Manage habits
    Habit {
        #[command(subcommand)]
        command: HabitCommands,
    },

    /// Mark a habit done for a day, or undo it
    Toggle {
        habit_id: String,

        /// Day to toggle (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Show streak statistics for a habit
    Streak { habit_id: String },

    /// Record a journal entry and collect its points
    Journal,

    /// Grant (or with a negative value, revoke) XP
    Award {
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Show level and XP progress
    Status,

    /// Show recent XP events
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum HabitCommands {
    /// Create a habit
    Add { name: String },

    /// List habits with their streaks
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toggle_with_date() {
        let cli = Cli::try_parse_from([
            "momentumctl",
            "--user",
            "alice",
            "toggle",
            "abc",
            "--date",
            "2024-01-02",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("alice"));
        assert_eq!(
            cli.command,
            Commands::Toggle {
                habit_id: "abc".into(),
                date: Some("2024-01-02".into()),
            }
        );
    }

    #[test]
    fn test_parse_negative_award() {
        let cli = Cli::try_parse_from(["momentumctl", "award", "-10"]).unwrap();
        assert_eq!(cli.command, Commands::Award { delta: -10 });
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["momentumctl", "habit", "list", "--json", "-v"]).unwrap();
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Habit {
                command: HabitCommands::List
            }
        );
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["momentumctl"]).is_err());
    }
}
