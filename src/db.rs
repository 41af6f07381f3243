//! Local task cache and utility functions for the CLI.
//!
//! This module provides the `Database` struct standing in for the remote task
//! list, along with date input parsing, relative date formatting and task
//! lookup used by the commands.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CmdError, StoreError};
use crate::order::{self, Placement};
use crate::task::{parse_date, Task};

/// In-memory copy of the task list, kept in the order the list is displayed
/// in by other clients.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    pub tasks: Vec<Task>,
}

impl Database {
    /// Load the cache from a JSON file. A missing file is an empty list.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "no task cache yet, starting empty");
            return Ok(Database::default());
        }
        let buf = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let db: Database = serde_json::from_str(&buf).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), tasks = db.tasks.len(), "loaded task cache");
        Ok(db)
    }

    /// Save the cache using an atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let mut f = File::create(&tmp).map_err(io_err)?;
        f.write_all(data.as_bytes()).map_err(io_err)?;
        f.flush().map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        debug!(path = %path.display(), tasks = self.tasks.len(), "saved task cache");
        Ok(())
    }

    /// Generate the next free local id.
    pub fn next_id(&self) -> String {
        let max = self.tasks.iter().filter_map(|t| t.id.parse::<u64>().ok()).max().unwrap_or(0);
        (max + 1).to_string()
    }

    /// Get a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Insert or replace `task`, moving only it to where it sorts today.
    /// Tasks without an id get a fresh one.
    pub fn upsert(&mut self, mut task: Task, today: NaiveDate) -> Placement {
        if task.id.is_empty() {
            task.id = self.next_id();
        }
        let id = task.id.clone();
        let (tasks, placement) = order::apply_placement(std::mem::take(&mut self.tasks), task, today);
        self.tasks = tasks;
        info!(id = %id, index = placement.index, after = ?placement.after, "placed task");
        placement
    }

    /// Remove a task by id. Subtasks pointing at it are promoted to top level.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(idx);
        for t in self.tasks.iter_mut() {
            if t.parent.as_deref() == Some(id) {
                t.parent = None;
            }
        }
        Some(removed)
    }
}

/// Parse human-readable date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday", "next monday", "this friday" (and three-letter forms)
/// - "end of week", "end of month"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_date_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_this_week(today);
            return Some(end);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            return NaiveDate::from_ymd_opt(year, month, 1).map(|d| d - Duration::days(1));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(n) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Duration::try_days(n).and_then(|d| today.checked_add_signed(d));
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Duration::try_weeks(n).and_then(|d| today.checked_add_signed(d));
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current = today.weekday().num_days_from_monday() as i64;
    for (name, target) in weekdays {
        let ahead = (target + 7 - current) % 7;
        if s == name || s == format!("this {name}") {
            return Some(today + Duration::days(ahead));
        }
        if s == format!("next {name}") {
            let days = if ahead == 0 { 7 } else { ahead + 7 };
            return Some(today + Duration::days(days));
        }
    }

    parse_date(&s)
}

/// Like [`parse_date_input`] but reports unreadable input.
pub fn require_date(s: &str, today: NaiveDate) -> Result<NaiveDate, CmdError> {
    parse_date_input(s, today).ok_or_else(|| CmdError::InvalidDate(s.to_string()))
}

/// Calculate the start and end dates of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Format a date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_relative(date: Option<NaiveDate>, today: NaiveDate) -> String {
    match date {
        None => "-".into(),
        Some(d) => match (d - today).num_days() {
            0 => "today".into(),
            1 => "tomorrow".into(),
            n if n > 1 => format!("in {n}d"),
            n => format!("{}d late", -n),
        },
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Resolve a task identifier (either id or title) to a task id.
pub fn resolve_task_identifier(identifier: &str, db: &Database) -> Result<String, CmdError> {
    if db.get(identifier).is_some() {
        return Ok(identifier.to_string());
    }

    let wanted = identifier.to_lowercase();
    let matches: Vec<&Task> = db.tasks.iter().filter(|t| t.title.to_lowercase() == wanted).collect();

    match matches.as_slice() {
        [] => Err(CmdError::NotFound(identifier.to_string())),
        [one] => Ok(one.id.clone()),
        many => Err(CmdError::Ambiguous {
            query: identifier.to_string(),
            ids: many.iter().map(|t| t.id.clone()).collect(),
        }),
    }
}
