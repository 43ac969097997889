//! momentumctl - command-line caller for the Momentum habit engine.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;

pub use cli::{Cli, Commands, HabitCommands};
pub use commands::{exit_code, run, run_with};
