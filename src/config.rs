//! Runtime configuration resolved from command-line flags and environment.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::cli::Cli;

/// Everything a command needs to know about its surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Local task cache file.
    pub db_path: PathBuf,
    /// The day all date arithmetic is relative to.
    pub today: NaiveDate,
}

impl Config {
    /// Resolve flags, falling back to `$HOME/.taskline/tasks.json` and the
    /// local calendar date.
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            db_path: cli.db.clone().unwrap_or_else(default_db_path),
            today: cli.today.unwrap_or_else(|| Local::now().date_naive()),
        }
    }
}

/// Default location of the task cache.
pub fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".taskline").join("tasks.json")
}
