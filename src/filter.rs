//! Text search and view filters applied before ordering.

use chrono::NaiveDate;

use crate::task::Task;

/// View options for the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArgs {
    pub search: String,
    pub hide_children: bool,
    pub hide_future: bool,
}

impl Default for FilterArgs {
    fn default() -> Self {
        FilterArgs {
            search: String::new(),
            hide_children: true,
            hide_future: false,
        }
    }
}

impl FilterArgs {
    /// Apply the search plus the visibility toggles.
    pub fn apply<'a>(&self, tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
        filter_tasks(tasks, &self.search)
            .into_iter()
            .filter(|t| !(self.hide_children && t.has_parent()))
            .filter(|t| !(self.hide_future && t.start_date.is_some_and(|s| s > today)))
            .collect()
    }
}

/// Case-insensitive substring match on title or description.
/// An empty search keeps everything.
pub fn filter_tasks<'a>(tasks: &'a [Task], search: &str) -> Vec<&'a Task> {
    if search.is_empty() {
        return tasks.iter().collect();
    }
    let needle = search.to_lowercase();
    tasks
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&needle) || t.description.to_lowercase().contains(&needle))
        .collect()
}
