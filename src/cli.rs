use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::cmd::Commands;

/// Plain-text task list with repeating tasks and deadline ordering.
/// Storage defaults to ~/.taskline/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tl", version, about = "Repeating tasks and deadline ordering")]
pub struct Cli {
    /// Path to the JSON task cache.
    #[arg(long, global = true, env = "TASKLINE_DB")]
    pub db: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today.
    #[arg(long, global = true, env = "TASKLINE_TODAY")]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Commands,
}
