//! Headline counts for the task list: how much of each priority, and how
//! much is due when.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::fields::Priority;
use crate::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub p3: usize,
    pub p2: usize,
    pub p1: usize,
    pub p0: usize,
    /// Due before today.
    pub overdue: usize,
    pub today: usize,
    /// Due tomorrow through a week from today.
    pub week: usize,
    /// Due more than a week and at most 30 days out.
    pub month: usize,
}

/// Count tasks by priority and by explicit due date.
///
/// Only `due_date` is bucketed; implied deadlines are not counted.
pub fn stats(tasks: &[Task], today: NaiveDate) -> Stats {
    let week_end = today + Duration::days(7);
    let month_end = today + Duration::days(30);
    let mut s = Stats::default();

    for t in tasks {
        match t.priority {
            Priority::High => s.p3 += 1,
            Priority::Medium => s.p2 += 1,
            Priority::Low => s.p1 += 1,
            Priority::Triage => s.p0 += 1,
        }
        let Some(due) = t.due_date else { continue };
        if due < today {
            s.overdue += 1;
        } else if due == today {
            s.today += 1;
        } else if due <= week_end {
            s.week += 1;
        } else if due <= month_end {
            s.month += 1;
        }
    }
    s
}
