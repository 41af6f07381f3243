//! Forward search for the next date a rule fires on.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use super::rule::{self, Anchor, RecurrenceRule};

/// Number of consecutive days examined before giving up.
pub const SEARCH_HORIZON_DAYS: u32 = 1000;

/// Next occurrence of `rule`.
///
/// The offset is counted from `completed` for `C` rules and from `scheduled`
/// for `S` rules; a task that was never scheduled falls back to `completed`.
/// Starting at `anchor + offset`, days are scanned one at a time until all
/// three calendar fields match. Returns `None` for a missing rule and also
/// when nothing matches within [`SEARCH_HORIZON_DAYS`].
pub fn next(rule: Option<&RecurrenceRule>, scheduled: Option<NaiveDate>, completed: NaiveDate) -> Option<NaiveDate> {
    let rule = rule?;
    let anchor = match (rule.anchor, scheduled) {
        (Anchor::Scheduled, Some(s)) => s,
        _ => completed,
    };
    let mut day = anchor.checked_add_signed(Duration::days(rule.offset_days as i64))?;

    for _ in 0..SEARCH_HORIZON_DAYS {
        if rule.matches_date(day) {
            return Some(day);
        }
        day = day.succ_opt()?;
    }

    debug!(rule = %rule, %anchor, "no occurrence within search horizon");
    None
}

/// [`next`] for rule text as stored on a task.
pub fn next_from_text(text: &str, scheduled: Option<NaiveDate>, completed: NaiveDate) -> Option<NaiveDate> {
    next(rule::parse(text).as_ref(), scheduled, completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_completion_anchor() {
        assert_eq!(next_from_text("* * * 7 C", Some(d(2023, 1, 1)), d(2023, 1, 15)), Some(d(2023, 1, 22)));
    }

    #[test]
    fn test_scheduled_anchor() {
        assert_eq!(next_from_text("* * * 7 S", Some(d(2023, 1, 1)), d(2023, 1, 15)), Some(d(2023, 1, 8)));
    }

    #[test]
    fn test_scheduled_anchor_without_schedule_uses_completion() {
        assert_eq!(next_from_text("* * * 7 S", None, d(2023, 1, 15)), Some(d(2023, 1, 22)));
    }

    #[test]
    fn test_day_of_month() {
        assert_eq!(next_from_text("15 * * 0 C", Some(d(2023, 1, 1)), d(2023, 1, 1)), Some(d(2023, 1, 15)));
    }

    #[test]
    fn test_month() {
        assert_eq!(next_from_text("* 3 * 0 C", Some(d(2023, 1, 1)), d(2023, 1, 1)), Some(d(2023, 3, 1)));
    }

    #[test]
    fn test_day_of_week_sunday() {
        assert_eq!(next_from_text("* * 0 0 C", Some(d(2023, 1, 1)), d(2023, 1, 2)), Some(d(2023, 1, 8)));
    }

    #[test]
    fn test_candidate_day_itself_can_match() {
        // Zero offset on a matching day returns that day.
        assert_eq!(next_from_text("* * * 0 C", None, d(2024, 6, 3)), Some(d(2024, 6, 3)));
    }

    #[test]
    fn test_constraints_are_conjunctive() {
        // First Friday the 13th on or after 2023-01-01.
        assert_eq!(next_from_text("13 * 5 0 C", None, d(2023, 1, 1)), Some(d(2023, 1, 13)));
        // Next one after that.
        assert_eq!(next_from_text("13 * 5 0 C", None, d(2023, 1, 14)), Some(d(2023, 10, 13)));
    }

    #[test]
    fn test_invalid_rule_has_no_occurrence() {
        assert_eq!(next_from_text("invalid", Some(d(2023, 1, 1)), d(2023, 1, 2)), None);
        assert_eq!(next(None, None, d(2023, 1, 2)), None);
    }

    #[test]
    fn test_unsatisfiable_rule_exhausts_horizon() {
        assert_eq!(next_from_text("31 2 * 0 C", None, d(2023, 1, 1)), None);
    }

    #[test]
    fn test_horizon_boundary() {
        // Leap day is more than 1000 days past 2024-03-01 (next one is 2028-02-29, 1460 days out).
        assert_eq!(next_from_text("29 2 * 0 C", None, d(2024, 3, 1)), None);
        // From 2025-06-05 the next leap day is 999 days away: the last day examined.
        assert_eq!(next_from_text("29 2 * 0 C", None, d(2025, 6, 5)), Some(d(2028, 2, 29)));
        assert_eq!(next_from_text("29 2 * 0 C", None, d(2025, 6, 4)), None);
    }

    #[test]
    fn test_step_fields() {
        // Even days of month starting from an odd day.
        assert_eq!(next_from_text("*/2 * * 0 C", None, d(2023, 1, 1)), Some(d(2023, 1, 2)));
    }
}
