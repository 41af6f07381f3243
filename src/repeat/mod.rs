//! Recurrence rules for repeating tasks.
//!
//! A rule reads like a trimmed-down crontab line with day granularity:
//!
//! ```text
//! <day-of-month> <month> <day-of-week> <offset-days> <anchor>
//!      1-31       1-12     0-6 (Sun=0)     0-999       C | S
//! ```
//!
//! `* * * 7 C` repeats a week after completion; `1 * * 0 C` lands on the
//! first of the next month; `* * 1-5 1 S` takes the first weekday after the
//! scheduled date. Malformed rules are never an error for callers, they
//! simply mean "does not repeat".

pub mod field;
pub mod occurrence;
pub mod rule;

pub use field::{FieldError, FieldSpec};
pub use occurrence::{next, next_from_text, SEARCH_HORIZON_DAYS};
pub use rule::{is_valid, parse, Anchor, RecurrenceRule, RuleError};
