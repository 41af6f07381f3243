//! Where an edited task goes in a list the remote service keeps in its own order.
//!
//! Re-sorting the whole list on every edit would fight with manual reordering
//! done in other clients, so only the edited task moves: it is inserted just
//! before the first task that sorts after it, and every other task keeps its
//! position.

use chrono::NaiveDate;

use super::{is_eligible, sort_key};
use crate::task::Task;

/// Insertion point for an edited task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Index in the list with any previous copy of the task removed.
    pub index: usize,
    /// Id of the task it should follow, `None` for the head of the list.
    pub after: Option<String>,
}

/// Compute where `updated` belongs in `current`.
///
/// A task in `current` sharing `updated`'s id is treated as the stale copy
/// and ignored. Ineligible and completed tasks have no display rank, so such
/// an `updated` goes to the end and such neighbours never push it down.
pub fn place(current: &[Task], updated: &Task, today: NaiveDate) -> Placement {
    let others: Vec<&Task> = current.iter().filter(|t| !same_task(t, updated)).collect();
    let index = insertion_index(&others, updated, today);
    Placement {
        index,
        after: index.checked_sub(1).map(|i| others[i].id.clone()),
    }
}

/// Splice `updated` into `tasks` at its placement, replacing any stale copy.
pub fn apply_placement(mut tasks: Vec<Task>, updated: Task, today: NaiveDate) -> (Vec<Task>, Placement) {
    let placement = place(&tasks, &updated, today);
    tasks.retain(|t| !same_task(t, &updated));
    tasks.insert(placement.index, updated);
    (tasks, placement)
}

fn same_task(a: &Task, b: &Task) -> bool {
    !b.id.is_empty() && a.id == b.id
}

fn ranked(task: &Task, today: NaiveDate) -> bool {
    !task.is_completed() && is_eligible(task, today)
}

fn insertion_index(others: &[&Task], updated: &Task, today: NaiveDate) -> usize {
    if !ranked(updated, today) {
        return others.len();
    }
    let key = sort_key(updated, today);
    // The updated task sorts after every eligible task with key <= its own,
    // since it would be appended last before a stable sort.
    others
        .iter()
        .position(|t| ranked(t, today) && sort_key(t, today) > key)
        .unwrap_or(others.len())
}
