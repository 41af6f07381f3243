//! Enumerations and field types for task management.
//!
//! This module defines the small closed sets a task draws its values from:
//! the four priority levels and the completion status.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority of a task, from untriaged to most important.
///
/// The numeric level (0-3) is what the notes directive `#P:` carries.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    /// Level 0: not yet looked at.
    #[default]
    #[value(alias = "0")]
    Triage,
    #[value(alias = "1")]
    Low,
    #[value(alias = "2")]
    Medium,
    #[value(alias = "3")]
    High,
}

impl Priority {
    /// All levels, lowest first.
    pub const ALL: [Priority; 4] = [Priority::Triage, Priority::Low, Priority::Medium, Priority::High];

    /// Numeric level as written in notes.
    pub fn level(self) -> u8 {
        match self {
            Priority::Triage => 0,
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    /// Map a numeric level back to a priority. Anything outside 0..=3 is rejected.
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(Priority::Triage),
            1 => Some(Priority::Low),
            2 => Some(Priority::Medium),
            3 => Some(Priority::High),
            _ => None,
        }
    }

    /// Days from the effective start to the deadline implied by this priority.
    ///
    /// Triage is negative so untriaged work surfaces as overdue.
    pub fn implied_deadline_days(self) -> i64 {
        match self {
            Priority::High => 7,
            Priority::Medium => 14,
            Priority::Low => 30,
            Priority::Triage => -7,
        }
    }

    /// Single-digit tie-break for equal dates; higher priority sorts first.
    pub fn tie_break(self) -> u8 {
        3 - self.level()
    }
}

/// Task completion status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    #[serde(alias = "needsAction")]
    NeedsAction,
    Completed,
}
