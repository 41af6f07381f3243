//! # tl - repeating task list CLI
//!
//! A command-line front end over a local JSON task cache.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a weekly chore that reappears seven days after you finish it
//! tl add "Vacuum" --priority high --repeat-start "* * * 7 C"
//!
//! # Add something due on the 1st of every month
//! tl add "Pay rent" --due 2024-06-01 --repeat-due "1 * * 1 S"
//!
//! # Today's list, most urgent first
//! tl list
//!
//! # Finish a task; repeating tasks schedule their next instance
//! tl complete Vacuum
//!
//! # Try out a rule
//! tl rule next "* * 1-5 1 C" --completed 2024-05-10
//! ```
//!
//! Data is stored in `~/.taskline/tasks.json` unless `--db` or `TASKLINE_DB`
//! says otherwise. `--today` pins the date for scripting. Set `RUST_LOG=debug`
//! to see rejected rules and discarded notes directives.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskline::cli::Cli;
use taskline::cmd;
use taskline::config::Config;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    tracing::debug!(db = %config.db_path.display(), today = %config.today, "resolved configuration");

    if let Err(e) = cmd::run(cli.command, &config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
