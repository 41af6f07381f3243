//! Display ordering for the task list.
//!
//! Every eligible task gets a deadline: the assigned date if it has one, else
//! its due date, else a deadline implied by its priority counted from its
//! start date (never earlier than today). Tasks sort by that deadline, and
//! equal deadlines put higher priority first.

pub mod placement;

use chrono::{Duration, NaiveDate};

use crate::task::{Task, DATE_FORMAT};

pub use placement::{apply_placement, place, Placement};

/// Whether a task belongs in the top-level, current view.
///
/// Subtasks are shown under their parent, and tasks that start in the future
/// stay hidden until their start date.
pub fn is_eligible(task: &Task, today: NaiveDate) -> bool {
    !task.has_parent() && task.start_date.map_or(true, |start| start <= today)
}

/// The date a task is ordered by.
pub fn effective_deadline(task: &Task, today: NaiveDate) -> NaiveDate {
    if let Some(date) = task.assigned_date.or(task.due_date) {
        return date;
    }
    // A stale start must not drag the implied deadline further into the past.
    let start = task.start_date.unwrap_or(today).max(today);
    start
        .checked_add_signed(Duration::days(task.priority.implied_deadline_days()))
        .unwrap_or(start)
}

/// Sort key of the form `YYYY-MM-DD-N`, where `N` is `3 - priority`.
///
/// Keys compare as strings: the date dominates and the digit only breaks
/// ties between tasks landing on the same day.
pub fn sort_key(task: &Task, today: NaiveDate) -> String {
    format!(
        "{}-{}",
        effective_deadline(task, today).format(DATE_FORMAT),
        task.priority.tie_break()
    )
}

/// Eligible tasks in display order. Tasks with equal keys keep input order.
pub fn order(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    order_refs(tasks, today)
}

/// [`order`] over an already filtered selection.
pub fn order_refs<'a>(tasks: impl IntoIterator<Item = &'a Task>, today: NaiveDate) -> Vec<&'a Task> {
    let mut shown: Vec<&Task> = tasks.into_iter().filter(|t| is_eligible(t, today)).collect();
    // Stable, so equal keys keep their input order.
    shown.sort_by_cached_key(|t| sort_key(t, today));
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn days(n: i64) -> NaiveDate {
        today() + Duration::days(n)
    }

    fn task(title: &str, priority: Priority) -> Task {
        Task {
            id: title.into(),
            priority,
            ..Task::new(title)
        }
    }

    #[test]
    fn test_eligible_without_dates() {
        assert!(is_eligible(&task("a", Priority::Low), today()));
    }

    #[test]
    fn test_future_start_is_not_eligible() {
        let mut t = task("future", Priority::High);
        t.start_date = Some(days(5));
        assert!(!is_eligible(&t, today()));
        t.start_date = Some(today());
        assert!(is_eligible(&t, today()));
        t.start_date = Some(days(-5));
        assert!(is_eligible(&t, today()));
    }

    #[test]
    fn test_subtask_is_not_eligible() {
        let mut t = task("child", Priority::High);
        t.parent = Some("parent".into());
        assert!(!is_eligible(&t, today()));
    }

    #[test]
    fn test_priority_only_keys() {
        let high = sort_key(&task("h", Priority::High), today());
        let triage = sort_key(&task("t", Priority::Triage), today());
        let medium = sort_key(&task("m", Priority::Medium), today());
        // Triage first, then P3, P2: untriaged work demands attention.
        assert!(triage < high);
        assert!(high < medium);
    }

    #[test]
    fn test_implied_deadlines() {
        assert_eq!(sort_key(&task("3", Priority::High), today()), "2024-05-17-0");
        assert_eq!(sort_key(&task("2", Priority::Medium), today()), "2024-05-24-1");
        assert_eq!(sort_key(&task("1", Priority::Low), today()), "2024-06-09-2");
        assert_eq!(sort_key(&task("0", Priority::Triage), today()), "2024-05-03-3");
    }

    #[test]
    fn test_past_start_is_clamped_to_today() {
        let mut t = task("old", Priority::High);
        t.start_date = Some(days(-30));
        assert_eq!(effective_deadline(&t, today()), days(7));
    }

    #[test]
    fn test_future_start_shifts_implied_deadline() {
        let mut t = task("later", Priority::High);
        t.start_date = Some(days(3));
        assert_eq!(effective_deadline(&t, today()), days(10));
    }

    #[test]
    fn test_due_date_wins_over_implied() {
        let mut t = task("due", Priority::Medium);
        t.start_date = Some(days(2));
        t.due_date = Some(days(5));
        assert!(sort_key(&t, today()).starts_with("2024-05-15"));
    }

    #[test]
    fn test_assigned_date_wins_over_due() {
        let mut t = task("assigned", Priority::Medium);
        t.due_date = Some(days(1));
        t.assigned_date = Some(days(3));
        assert!(sort_key(&t, today()).starts_with("2024-05-13"));
    }

    #[test]
    fn test_tie_break_on_equal_dates() {
        let mut a = task("a", Priority::High);
        let mut b = task("b", Priority::Medium);
        a.due_date = Some(today());
        b.due_date = Some(today());
        assert!(sort_key(&a, today()) < sort_key(&b, today()));
    }

    #[test]
    fn test_order_filters_and_sorts() {
        let mut future = task("future", Priority::Triage);
        future.start_date = Some(days(5));
        let mut child = task("child", Priority::Triage);
        child.parent = Some("high".into());
        let tasks = vec![
            task("high", Priority::High),
            task("triage", Priority::Triage),
            task("medium", Priority::Medium),
            future,
            child,
        ];
        let ordered: Vec<&str> = order(&tasks, today()).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(ordered, vec!["triage", "high", "medium"]);
    }

    #[test]
    fn test_order_is_stable_for_equal_keys() {
        let tasks = vec![task("first", Priority::Low), task("second", Priority::Low), task("third", Priority::Low)];
        let ordered: Vec<&str> = order(&tasks, today()).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(ordered, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_order_empty() {
        assert!(order(&[], today()).is_empty());
    }
}
