//! Five-field recurrence rules: `<day-of-month> <month> <day-of-week> <offset-days> <C|S>`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::debug;

use super::field::{parse_number, FieldBounds, FieldError, FieldSpec, DAY_OF_MONTH, DAY_OF_WEEK, MONTH};

/// Largest accepted offset, in days.
pub const MAX_OFFSET_DAYS: u32 = 999;

/// What the offset is counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `C`: the day the task was completed.
    Completion,
    /// `S`: the task's last scheduled date.
    Scheduled,
}

impl Anchor {
    pub fn letter(self) -> char {
        match self {
            Anchor::Completion => 'C',
            Anchor::Scheduled => 'S',
        }
    }
}

/// Why a rule was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule is empty")]
    Empty,
    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),
    #[error("{field}: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: FieldError,
    },
    #[error("offset '{0}' must be a whole number of days between 0 and 999")]
    Offset(String),
    #[error("anchor '{0}' must be C (completion) or S (scheduled)")]
    Anchor(String),
}

/// A validated recurrence rule. Every component parsed; there is no partial rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub day_of_month: FieldSpec,
    pub month: FieldSpec,
    pub day_of_week: FieldSpec,
    pub offset_days: u32,
    pub anchor: Anchor,
}

impl RecurrenceRule {
    /// True when all three calendar fields accept `date`.
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        self.day_of_month.matches(date.day())
            && self.month.matches(date.month())
            && self.day_of_week.matches(date.weekday().num_days_from_sunday())
    }
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.is_empty() {
            return Err(RuleError::Empty);
        }
        if parts.len() != 5 {
            return Err(RuleError::FieldCount(parts.len()));
        }

        let day_of_month = field(parts[0], DAY_OF_MONTH)?;
        let month = field(parts[1], MONTH)?;
        let day_of_week = field(parts[2], DAY_OF_WEEK)?;

        let offset_days = parse_number(parts[3])
            .ok()
            .filter(|n| *n <= MAX_OFFSET_DAYS)
            .ok_or_else(|| RuleError::Offset(parts[3].to_string()))?;

        let anchor = match parts[4] {
            "C" => Anchor::Completion,
            "S" => Anchor::Scheduled,
            other => return Err(RuleError::Anchor(other.to_string())),
        };

        Ok(RecurrenceRule { day_of_month, month, day_of_week, offset_days, anchor })
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.day_of_month,
            self.month,
            self.day_of_week,
            self.offset_days,
            self.anchor.letter()
        )
    }
}

fn field(text: &str, bounds: FieldBounds) -> Result<FieldSpec, RuleError> {
    FieldSpec::parse(text, bounds).map_err(|source| RuleError::Field { field: bounds.name, source })
}

/// Lenient parse: any malformed rule means "no recurrence".
pub fn parse(text: &str) -> Option<RecurrenceRule> {
    match text.parse::<RecurrenceRule>() {
        Ok(rule) => Some(rule),
        Err(RuleError::Empty) => None,
        Err(e) => {
            debug!(rule = text, error = %e, "ignoring invalid recurrence rule");
            None
        }
    }
}

/// Whether `text` would produce a recurrence at all.
pub fn is_valid(text: &str) -> bool {
    parse(text).is_some()
}
