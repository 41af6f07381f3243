//! Task data structure and related functionality.
//!
//! A `Task` is a plain value: the store hands one in, the engine computes
//! with it and hands derived copies back. Nothing here mutates shared state.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::fields::*;

/// A single item on the task list.
///
/// `assigned_date` is the calendar placement owned by the remote service;
/// `start_date`, `due_date`, priority and the repeat rules travel inside the
/// notes field as directives (see [`crate::notes`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub assigned_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub repeat_start: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub repeat_due: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub completed: Option<NaiveDate>,
    #[serde(default)]
    pub status: Status,
}

impl Task {
    /// Create an untriaged task with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Task {
            title: title.into(),
            ..Task::default()
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed || self.completed.is_some()
    }

    /// True when the task hangs below another task.
    pub fn has_parent(&self) -> bool {
        self.parent.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Trimmed rule text, or `None` when nothing but whitespace is left.
///
/// Notes cannot carry a blank rule, so one never enters a task.
pub fn rule_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}

fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(rule_text(text.as_deref()))
}

/// Format an optional date as `YYYY-MM-DD`, or an empty string.
pub fn date_str(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Date layout used in notes directives and sort keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
