//! Structured fields carried inside a task's free-text notes.
//!
//! The remote task service only offers a title, a notes blob and a due
//! timestamp. Everything else rides along in the notes as one directive per
//! line:
//!
//! ```text
//! Pick up the dry cleaning
//! #P:2
//! #S:2024-01-10
//! #D:2024-01-15
//! #RS:* * * 7 C
//! #RD:* * * 7 C
//! ```
//!
//! Decoding is lenient because users edit these notes by hand in other
//! clients: a directive whose value does not parse is dropped and the field
//! keeps its default. Lines of the description that themselves start with `#`
//! are indistinguishable from directives and will not survive a round trip.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, trace};

use crate::fields::Priority;
use crate::task::{date_str, parse_date, rule_text, Task};

/// Structured values found in a notes blob. `None` means absent or unparseable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Directives {
    pub priority: Option<Priority>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub repeat_start: Option<String>,
    pub repeat_due: Option<String>,
}

/// Result of splitting notes into directives and the remaining description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodedNotes {
    #[serde(flatten)]
    pub directives: Directives,
    pub description: String,
}

/// Split `raw` into directives and description.
pub fn decode(raw: &str) -> DecodedNotes {
    let mut directives = Directives::default();
    let mut description = Vec::new();

    for line in raw.lines().map(str::trim) {
        if line.starts_with('#') {
            apply_directive(&mut directives, line);
        } else {
            description.push(line);
        }
    }

    DecodedNotes {
        directives,
        description: description.join("\n"),
    }
}

fn apply_directive(d: &mut Directives, line: &str) {
    // `#R:` predates the start/due split and always meant the start rule.
    if let Some(v) = line.strip_prefix("#RS:").or_else(|| line.strip_prefix("#R:")) {
        d.repeat_start = rule_text(Some(v));
    } else if let Some(v) = line.strip_prefix("#RD:") {
        d.repeat_due = rule_text(Some(v));
    } else if let Some(v) = line.strip_prefix("#P:") {
        match v.trim().parse::<i64>().ok().and_then(Priority::from_level) {
            Some(p) => d.priority = Some(p),
            None => debug!(value = v, "discarding unreadable priority directive"),
        }
    } else if let Some(v) = line.strip_prefix("#D:") {
        match parse_date(v) {
            Some(date) => d.due_date = Some(date),
            None => debug!(value = v, "discarding unreadable due date directive"),
        }
    } else if let Some(v) = line.strip_prefix("#S:") {
        match parse_date(v) {
            Some(date) => d.start_date = Some(date),
            None => debug!(value = v, "discarding unreadable start date directive"),
        }
    } else {
        trace!(line, "ignoring unknown directive");
    }
}

/// Render a task's description and structured fields as a notes blob.
///
/// Directive order is fixed: P, S, D, RS, RD. Priority is always written.
pub fn encode(task: &Task) -> String {
    let mut notes = format!("{}\n", task.description);
    notes.push_str(&format!("#P:{}\n", task.priority.level()));
    if task.start_date.is_some() {
        notes.push_str(&format!("#S:{}\n", date_str(task.start_date)));
    }
    if task.due_date.is_some() {
        notes.push_str(&format!("#D:{}\n", date_str(task.due_date)));
    }
    if let Some(rule) = rule_text(task.repeat_start.as_deref()) {
        notes.push_str(&format!("#RS:{rule}\n"));
    }
    if let Some(rule) = rule_text(task.repeat_due.as_deref()) {
        notes.push_str(&format!("#RD:{rule}\n"));
    }
    notes.trim().to_string()
}

impl Task {
    /// Replace description, priority, dates and rules with what `raw` encodes.
    pub fn apply_notes(&mut self, raw: &str) {
        let DecodedNotes { directives, description } = decode(raw);
        self.description = description;
        self.priority = directives.priority.unwrap_or_default();
        self.start_date = directives.start_date;
        self.due_date = directives.due_date;
        self.repeat_start = directives.repeat_start;
        self.repeat_due = directives.repeat_due;
    }

    /// Notes blob for writing back to the remote service.
    pub fn notes(&self) -> String {
        encode(self)
    }
}
