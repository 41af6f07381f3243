//! Command implementations for the CLI interface.
//!
//! Each handler loads nothing itself: it receives the task cache and the
//! resolved [`Config`], edits the cache through derived task values, and
//! saves when something changed.

use std::collections::BTreeMap;
use std::io::Read;

use chrono::NaiveDate;
use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::warn;

use crate::config::Config;
use crate::db::*;
use crate::error::CmdError;
use crate::fields::*;
use crate::filter::FilterArgs;
use crate::notes;
use crate::order::{self, Placement};
use crate::repeat::{self, RecurrenceRule, SEARCH_HORIZON_DAYS};
use crate::reschedule;
use crate::summary;
use crate::task::{date_str, Task};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: triage (0) | low (1) | medium (2) | high (3).
        #[arg(long, value_enum, default_value_t = Priority::Triage)]
        priority: Priority,
        /// Hide the task until this date.
        #[arg(long)]
        start: Option<String>,
        /// Deadline: YYYY-MM-DD, "today", "tomorrow", "in Nd", "next friday".
        #[arg(long)]
        due: Option<String>,
        /// Put the task on the calendar on this date.
        #[arg(long)]
        assigned: Option<String>,
        /// Rule moving the start date when completed, e.g. "* * * 7 C".
        #[arg(long)]
        repeat_start: Option<String>,
        /// Rule moving the due date when completed.
        #[arg(long)]
        repeat_due: Option<String>,
        /// Parent task id or title.
        #[arg(long)]
        parent: Option<String>,
    },

    /// List open tasks in deadline order.
    List {
        /// Only tasks whose title or description contains this text.
        #[arg(long)]
        search: Option<String>,
        /// Show subtasks indented under their parent.
        #[arg(long)]
        tree: bool,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by id or title.
    View {
        /// Task id or title
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task id or title
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        assigned: Option<String>,
        #[arg(long)]
        repeat_start: Option<String>,
        #[arg(long)]
        repeat_due: Option<String>,
        #[arg(long)]
        clear_start: bool,
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        clear_assigned: bool,
        /// Remove both repeat rules.
        #[arg(long)]
        clear_repeat: bool,
    },

    /// Mark a task done, scheduling the next one if it repeats.
    Complete {
        /// Task id or title
        id: String,
    },

    /// Hide a task until tomorrow.
    Tomorrow {
        /// Task id or title
        id: String,
    },

    /// Delete a task by id or title.
    Delete {
        /// Task id or title
        id: String,
    },

    /// Read or write the directive notes format.
    Notes {
        #[command(subcommand)]
        action: NotesAction,
    },

    /// Check repeat rules and preview their next date.
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },

    /// Show counts by priority and due date.
    Stats,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum NotesAction {
    /// Split notes read from stdin into fields and description.
    Decode {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print the notes text stored for a task.
    Encode {
        /// Task id or title
        id: String,
    },
}

#[derive(Subcommand)]
pub enum RuleAction {
    /// Validate a rule and explain any problem.
    Check {
        /// Rule text, e.g. "1,15 * * 0 C"
        rule: String,
    },
    /// Compute the next date a rule fires.
    Next {
        /// Rule text, e.g. "* * 1-5 1 S"
        rule: String,
        /// Date the task was last scheduled for.
        #[arg(long)]
        scheduled: Option<String>,
        /// Completion date (default: today).
        #[arg(long)]
        completed: Option<String>,
    },
}

/// Dispatch a parsed command.
pub fn run(command: Commands, config: &Config) -> Result<(), CmdError> {
    match command {
        Commands::Notes { action: NotesAction::Decode { json } } => return cmd_notes_decode(json),
        Commands::Rule { action } => return cmd_rule(action, config),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            return Ok(());
        }
        _ => {}
    }

    let mut db = Database::load(&config.db_path)?;
    match command {
        Commands::Add { title, desc, priority, start, due, assigned, repeat_start, repeat_due, parent } => {
            let task = Task {
                title,
                description: desc.unwrap_or_default(),
                priority,
                start_date: optional_date(start.as_deref(), config)?,
                due_date: optional_date(due.as_deref(), config)?,
                assigned_date: optional_date(assigned.as_deref(), config)?,
                repeat_start,
                repeat_due,
                parent: parent.map(|p| resolve_task_identifier(&p, &db)).transpose()?,
                ..Task::default()
            };
            cmd_add(&mut db, config, task)
        }
        Commands::List { search, tree, limit } => {
            cmd_list(&db, config, search, tree, limit);
            Ok(())
        }
        Commands::View { id } => cmd_view(&db, config, &id),
        Commands::Update {
            id, title, desc, priority, start, due, assigned, repeat_start, repeat_due,
            clear_start, clear_due, clear_assigned, clear_repeat,
        } => {
            let id = resolve_task_identifier(&id, &db)?;
            let mut task = db.get(&id).cloned().ok_or_else(|| CmdError::NotFound(id.clone()))?;
            if let Some(t) = title {
                task.title = t;
            }
            if let Some(d) = desc {
                task.description = d;
            }
            if let Some(p) = priority {
                task.priority = p;
            }
            if let Some(s) = start {
                task.start_date = Some(require_date(&s, config.today)?);
            }
            if let Some(d) = due {
                task.due_date = Some(require_date(&d, config.today)?);
            }
            if let Some(a) = assigned {
                task.assigned_date = Some(require_date(&a, config.today)?);
            }
            if repeat_start.is_some() {
                task.repeat_start = repeat_start;
            }
            if repeat_due.is_some() {
                task.repeat_due = repeat_due;
            }
            if clear_start {
                task.start_date = None;
            }
            if clear_due {
                task.due_date = None;
            }
            if clear_assigned {
                task.assigned_date = None;
            }
            if clear_repeat {
                task.repeat_start = None;
                task.repeat_due = None;
            }
            cmd_update(&mut db, config, task)
        }
        Commands::Complete { id } => cmd_complete(&mut db, config, &id),
        Commands::Tomorrow { id } => cmd_tomorrow(&mut db, config, &id),
        Commands::Delete { id } => cmd_delete(&mut db, config, &id),
        Commands::Notes { action: NotesAction::Encode { id } } => {
            let id = resolve_task_identifier(&id, &db)?;
            if let Some(task) = db.get(&id) {
                println!("{}", task.notes());
            }
            Ok(())
        }
        Commands::Stats => {
            cmd_stats(&db, config);
            Ok(())
        }
        Commands::Notes { .. } | Commands::Rule { .. } | Commands::Completions { .. } => Ok(()),
    }
}

fn optional_date(input: Option<&str>, config: &Config) -> Result<Option<NaiveDate>, CmdError> {
    input.map(|s| require_date(s, config.today)).transpose()
}

/// Clean up a task the way a form submission does: invalid rules are dropped
/// with a warning and a start date that has already arrived is cleared.
fn normalise_edit(task: Task, config: &Config) -> Task {
    let clean = reschedule::sanitize_rules(&task);
    for (label, before, after) in [
        ("repeat-start", &task.repeat_start, &clean.repeat_start),
        ("repeat-due", &task.repeat_due, &clean.repeat_due),
    ] {
        if let (Some(text), None) = (before, after) {
            let reason = text.parse::<RecurrenceRule>().err().map(|e| e.to_string()).unwrap_or_default();
            warn!(rule = %text, %reason, "ignoring invalid {label} rule");
        }
    }
    reschedule::clear_stale_start(&clean, config.today)
}

fn report_placement(verb: &str, task: &Task, placement: &Placement) {
    match &placement.after {
        Some(after) => println!("{verb} task {} (after {after})", task.id),
        None => println!("{verb} task {} (top of list)", task.id),
    }
}

/// Add a new task to the cache.
pub fn cmd_add(db: &mut Database, config: &Config, task: Task) -> Result<(), CmdError> {
    let task = normalise_edit(task, config);
    let id = db.next_id();
    let task = Task { id, ..task };
    let placement = db.upsert(task.clone(), config.today);
    db.save(&config.db_path)?;
    report_placement("Added", &task, &placement);
    Ok(())
}

/// Replace a task with its edited copy and move it to where it now sorts.
pub fn cmd_update(db: &mut Database, config: &Config, task: Task) -> Result<(), CmdError> {
    let task = normalise_edit(task, config);
    let placement = db.upsert(task.clone(), config.today);
    db.save(&config.db_path)?;
    report_placement("Updated", &task, &placement);
    Ok(())
}

/// List open tasks in display order.
pub fn cmd_list(db: &Database, config: &Config, search: Option<String>, tree: bool, limit: Option<usize>) {
    let open: Vec<Task> = db.tasks.iter().filter(|t| !t.is_completed()).cloned().collect();
    let args = FilterArgs {
        search: search.unwrap_or_default(),
        hide_children: !tree,
        ..FilterArgs::default()
    };
    let selected = args.apply(&open, config.today);
    let mut shown = order::order_refs(selected.iter().copied(), config.today);
    if let Some(n) = limit {
        shown.truncate(n);
    }

    let children: BTreeMap<&str, Vec<&Task>> = if tree {
        let mut map: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
        for &t in selected.iter().filter(|t| t.has_parent()) {
            if let Some(p) = t.parent.as_deref() {
                map.entry(p).or_default().push(t);
            }
        }
        map
    } else {
        BTreeMap::new()
    };

    print_table(&shown, &children, config);
}

/// Print tasks in a formatted table, subtasks indented under their parent.
fn print_table(tasks: &[&Task], children: &BTreeMap<&str, Vec<&Task>>, config: &Config) {
    println!(
        "{:<6} {:<4} {:<11} {:<11} {:<11} {}",
        "ID", "Pri", "Start", "Due", "Deadline", "Title"
    );
    for t in tasks {
        print_row(t, 0, children, config);
    }
}

fn print_row(t: &Task, depth: usize, children: &BTreeMap<&str, Vec<&Task>>, config: &Config) {
    let repeats = if t.repeat_start.is_some() || t.repeat_due.is_some() { " ↻" } else { "" };
    println!(
        "{:<6} {:<4} {:<11} {:<11} {:<11} {}{}{}",
        truncate(&t.id, 6),
        format!("P{}", t.priority.level()),
        format_relative(t.start_date, config.today),
        format_relative(t.due_date, config.today),
        format_relative(Some(order::effective_deadline(t, config.today)), config.today),
        "  ".repeat(depth),
        t.title,
        repeats
    );
    // Depth guard against parent cycles in hand-edited caches.
    if depth < 16 {
        for child in children.get(t.id.as_str()).into_iter().flatten() {
            print_row(child, depth + 1, children, config);
        }
    }
}

/// View detailed information about a specific task.
pub fn cmd_view(db: &Database, config: &Config, id: &str) -> Result<(), CmdError> {
    let id = resolve_task_identifier(id, db)?;
    let task = db.get(&id).ok_or_else(|| CmdError::NotFound(id.clone()))?;
    let or_dash = |s: String| if s.is_empty() { "-".to_string() } else { s };

    println!("ID:          {}", task.id);
    println!("Title:       {}", task.title);
    println!("Priority:    P{} ({:?})", task.priority.level(), task.priority);
    println!("Status:      {:?}", task.status);
    println!("Start:       {}", or_dash(date_str(task.start_date)));
    println!("Due:         {}", or_dash(date_str(task.due_date)));
    println!("Assigned:    {}", or_dash(date_str(task.assigned_date)));
    println!("Sort key:    {}", order::sort_key(task, config.today));
    println!("Shown:       {}", if order::is_eligible(task, config.today) { "yes" } else { "no" });
    for (label, rule) in [("Repeat start", &task.repeat_start), ("Repeat due", &task.repeat_due)] {
        if let Some(rule) = rule {
            let state = if repeat::is_valid(rule) { "" } else { " (invalid, ignored)" };
            println!("{label:<12} {rule}{state}");
        }
    }
    if let Some(parent) = &task.parent {
        println!("Parent:      {parent}");
    }
    println!("\nNotes:\n{}", task.notes());
    Ok(())
}

/// Complete a task; a repeating task gets its follow-up inserted.
pub fn cmd_complete(db: &mut Database, config: &Config, id: &str) -> Result<(), CmdError> {
    let id = resolve_task_identifier(id, db)?;
    let task = db.get(&id).cloned().ok_or_else(|| CmdError::NotFound(id.clone()))?;
    if task.is_completed() {
        return Err(CmdError::AlreadyCompleted(id));
    }
    let completion = reschedule::complete(&task, config.today);

    if let Some(slot) = db.tasks.iter_mut().find(|t| t.id == id) {
        *slot = completion.completed;
    }
    println!("Completed task {id}");

    match completion.next {
        Some(next) => {
            let next = Task { id: db.next_id(), ..next };
            let when = next.start_date.or(next.due_date);
            db.upsert(next.clone(), config.today);
            println!("Next occurrence {} on {}", next.id, date_str(when));
        }
        None if task.repeat_start.is_some() || task.repeat_due.is_some() => {
            println!("No further occurrence within {SEARCH_HORIZON_DAYS} days");
        }
        None => {}
    }

    db.save(&config.db_path)?;
    Ok(())
}

/// Hide a task until tomorrow.
pub fn cmd_tomorrow(db: &mut Database, config: &Config, id: &str) -> Result<(), CmdError> {
    let id = resolve_task_identifier(id, db)?;
    let task = db.get(&id).ok_or_else(|| CmdError::NotFound(id.clone()))?;
    let deferred = reschedule::defer_to_tomorrow(task, config.today);
    db.upsert(deferred, config.today);
    db.save(&config.db_path)?;
    println!("Task {id} starts tomorrow");
    Ok(())
}

/// Delete a task.
pub fn cmd_delete(db: &mut Database, config: &Config, id: &str) -> Result<(), CmdError> {
    let id = resolve_task_identifier(id, db)?;
    db.remove(&id);
    db.save(&config.db_path)?;
    println!("Deleted task {id}");
    Ok(())
}

/// Decode notes text from stdin.
pub fn cmd_notes_decode(json: bool) -> Result<(), CmdError> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw).map_err(CmdError::Stdin)?;
    let decoded = notes::decode(&raw);

    if json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        return Ok(());
    }
    let d = &decoded.directives;
    let or_dash = |s: Option<String>| s.unwrap_or_else(|| "-".to_string());
    println!("Priority:     {}", or_dash(d.priority.map(|p| p.level().to_string())));
    println!("Start:        {}", or_dash(d.start_date.map(|x| date_str(Some(x)))));
    println!("Due:          {}", or_dash(d.due_date.map(|x| date_str(Some(x)))));
    println!("Repeat start: {}", or_dash(d.repeat_start.clone()));
    println!("Repeat due:   {}", or_dash(d.repeat_due.clone()));
    println!("Description:\n{}", decoded.description);
    Ok(())
}

/// Parse rule text strictly, keeping the reason it was rejected.
pub fn check_rule(text: &str) -> Result<RecurrenceRule, CmdError> {
    text.parse::<RecurrenceRule>().map_err(|source| CmdError::InvalidRule {
        text: text.to_string(),
        source,
    })
}

/// Next date `text` fires for a task scheduled on `scheduled` and completed
/// on `completed` (today when absent).
pub fn next_occurrence(
    text: &str,
    scheduled: Option<&str>,
    completed: Option<&str>,
    config: &Config,
) -> Result<Option<NaiveDate>, CmdError> {
    let rule = check_rule(text)?;
    let scheduled = optional_date(scheduled, config)?;
    let completed = optional_date(completed, config)?.unwrap_or(config.today);
    Ok(repeat::next(Some(&rule), scheduled, completed))
}

/// Check or evaluate a repeat rule.
pub fn cmd_rule(action: RuleAction, config: &Config) -> Result<(), CmdError> {
    match action {
        RuleAction::Check { rule } => {
            let parsed = check_rule(&rule)?;
            println!("valid: {parsed}");
        }
        RuleAction::Next { rule, scheduled, completed } => {
            match next_occurrence(&rule, scheduled.as_deref(), completed.as_deref(), config)? {
                Some(date) => println!("{}", date_str(Some(date))),
                None => println!("no occurrence within {SEARCH_HORIZON_DAYS} days"),
            }
        }
    }
    Ok(())
}

/// Print priority and deadline counts for open tasks.
pub fn cmd_stats(db: &Database, config: &Config) {
    let open: Vec<Task> = db.tasks.iter().filter(|t| !t.is_completed()).cloned().collect();
    let s = summary::stats(&open, config.today);
    println!("P3 {}  P2 {}  P1 {}  P0 {}", s.p3, s.p2, s.p1, s.p0);
    println!(
        "Overdue {}  Today {}  This week {}  This month {}",
        s.overdue, s.today, s.week, s.month
    );
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
