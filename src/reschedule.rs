//! Completing tasks and rolling repeating ones forward.
//!
//! Nothing here edits a task in place. Completing returns the finished copy
//! plus, for repeating tasks, a brand-new follow-up task; the caller decides
//! how both land in its list.

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::fields::Status;
use crate::repeat::{self, RecurrenceRule};
use crate::task::{rule_text, Task};

/// Outcome of completing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub completed: Task,
    /// The next instance, when the task repeats and a next date was found.
    pub next: Option<Task>,
}

/// Mark `task` done on `today` and derive its follow-up.
///
/// The finished copy is placed on the calendar at `today` unless it already
/// had an assigned date. The follow-up keeps title, description, priority,
/// parent and rules; its start and due dates come from `repeat_start` and
/// `repeat_due` respectively, and a date with no valid rule behind it is left
/// empty.
pub fn complete(task: &Task, today: NaiveDate) -> Completion {
    let completed = Task {
        status: Status::Completed,
        completed: Some(today),
        assigned_date: task.assigned_date.or(Some(today)),
        ..task.clone()
    };
    Completion {
        completed,
        next: follow_up(task, today),
    }
}

/// The next instance of a repeating task completed on `today`.
pub fn follow_up(task: &Task, today: NaiveDate) -> Option<Task> {
    let start_rule = rule_of(task.repeat_start.as_deref());
    let due_rule = rule_of(task.repeat_due.as_deref());
    if start_rule.is_none() && due_rule.is_none() {
        return None;
    }

    let start_date = repeat::next(start_rule.as_ref(), task.start_date, today);
    let due_date = repeat::next(due_rule.as_ref(), task.due_date, today);
    if start_date.is_none() && due_date.is_none() {
        debug!(title = %task.title, "repeating task has no further occurrence");
        return None;
    }

    info!(title = %task.title, ?start_date, ?due_date, "scheduled next occurrence");
    Some(Task {
        id: String::new(),
        title: task.title.clone(),
        description: task.description.clone(),
        priority: task.priority,
        start_date,
        due_date,
        assigned_date: None,
        repeat_start: task.repeat_start.clone(),
        repeat_due: task.repeat_due.clone(),
        parent: task.parent.clone(),
        completed: None,
        status: Status::NeedsAction,
    })
}

fn rule_of(text: Option<&str>) -> Option<RecurrenceRule> {
    text.and_then(repeat::parse)
}

/// Push the start of `task` to tomorrow so it drops out of today's view.
pub fn defer_to_tomorrow(task: &Task, today: NaiveDate) -> Task {
    Task {
        start_date: Some(today + Duration::days(1)),
        ..task.clone()
    }
}

/// Drop a start date that has already arrived; it no longer hides anything.
pub fn clear_stale_start(task: &Task, today: NaiveDate) -> Task {
    Task {
        start_date: task.start_date.filter(|s| *s > today),
        ..task.clone()
    }
}

/// Drop repeat rules that do not parse, so only working rules are stored.
/// Kept rules are trimmed.
pub fn sanitize_rules(task: &Task) -> Task {
    let keep = |text: &Option<String>| rule_text(text.as_deref()).filter(|t| repeat::is_valid(t));
    Task {
        repeat_start: keep(&task.repeat_start),
        repeat_due: keep(&task.repeat_due),
        ..task.clone()
    }
}
