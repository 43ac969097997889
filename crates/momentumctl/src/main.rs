//! momentumctl - habit streaks and XP from the command line.

use clap::Parser;
use momentumctl::{exit_code, logging, run, Cli};
use owo_colors::OwoColorize;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(cli, &mut out) {
        eprintln!("{} {:#}", "[ERROR]".bright_red(), e);
        std::process::exit(exit_code(&e));
    }
}
