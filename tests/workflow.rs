use chrono::NaiveDate;
use tempfile::TempDir;

use taskline::cmd;
use taskline::config::Config;
use taskline::db::Database;
use taskline::error::{CmdError, StoreError};
use taskline::repeat::{FieldError, RuleError};
use taskline::fields::{Priority, Status};
use taskline::order;
use taskline::task::Task;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn config(dir: &TempDir, today: NaiveDate) -> Config {
    Config {
        db_path: dir.path().join("nested").join("tasks.json"),
        today,
    }
}

#[test]
fn missing_cache_loads_empty() {
    let dir = TempDir::new().unwrap();
    let db = Database::load(&dir.path().join("absent.json")).unwrap();
    assert!(db.tasks.is_empty());
}

#[test]
fn corrupt_cache_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(Database::load(&path), Err(StoreError::Json { .. })));
}

#[test]
fn cache_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, d(2024, 1, 1));
    let mut db = Database::default();
    db.upsert(
        Task {
            description: "front and back".into(),
            priority: Priority::Medium,
            due_date: Some(d(2024, 1, 20)),
            repeat_due: Some("* * * 14 S".into()),
            ..Task::new("mow lawn")
        },
        cfg.today,
    );
    db.save(&cfg.db_path).unwrap();

    let back = Database::load(&cfg.db_path).unwrap();
    assert_eq!(back.tasks, db.tasks);
    assert!(!cfg.db_path.with_extension("json.tmp").exists());
}

#[test]
fn completing_a_repeating_task_schedules_the_next() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, d(2023, 1, 15));
    let mut db = Database::default();
    db.upsert(
        Task {
            priority: Priority::High,
            start_date: Some(d(2023, 1, 1)),
            repeat_start: Some("* * * 7 C".into()),
            ..Task::new("vacuum")
        },
        cfg.today,
    );

    cmd::cmd_complete(&mut db, &cfg, "vacuum").unwrap();

    let db = Database::load(&cfg.db_path).unwrap();
    assert_eq!(db.tasks.len(), 2);
    let done = db.get("1").unwrap();
    assert_eq!(done.status, Status::Completed);
    assert_eq!(done.assigned_date, Some(d(2023, 1, 15)));

    let next = db.get("2").unwrap();
    assert_eq!(next.start_date, Some(d(2023, 1, 22)));
    assert_eq!(next.status, Status::NeedsAction);
    assert_eq!(next.notes(), "#P:3\n#S:2023-01-22\n#RS:* * * 7 C");
}

#[test]
fn added_tasks_show_in_deadline_order() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, d(2024, 5, 10));
    let mut db = Database::default();

    for (title, priority) in [("low", Priority::Low), ("triage", Priority::Triage), ("high", Priority::High)] {
        cmd::cmd_add(&mut db, &cfg, Task { priority, ..Task::new(title) }).unwrap();
    }
    cmd::cmd_add(
        &mut db,
        &cfg,
        Task {
            priority: Priority::High,
            start_date: Some(d(2024, 5, 20)),
            ..Task::new("later")
        },
    )
    .unwrap();

    let db = Database::load(&cfg.db_path).unwrap();
    let titles: Vec<&str> = order::order(&db.tasks, cfg.today).iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["triage", "high", "low"]);
}

#[test]
fn add_drops_invalid_rules_and_past_start() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, d(2024, 5, 10));
    let mut db = Database::default();
    cmd::cmd_add(
        &mut db,
        &cfg,
        Task {
            start_date: Some(d(2024, 5, 1)),
            repeat_start: Some("weekly".into()),
            repeat_due: Some("1 * * 0 C".into()),
            ..Task::new("rent")
        },
    )
    .unwrap();

    let task = &db.tasks[0];
    assert_eq!(task.start_date, None);
    assert_eq!(task.repeat_start, None);
    assert_eq!(task.repeat_due.as_deref(), Some("1 * * 0 C"));
}

#[test]
fn deferring_hides_until_tomorrow() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, d(2024, 5, 10));
    let mut db = Database::default();
    cmd::cmd_add(&mut db, &cfg, Task::new("call bank")).unwrap();
    cmd::cmd_tomorrow(&mut db, &cfg, "call bank").unwrap();

    assert!(order::order(&db.tasks, cfg.today).is_empty());
    assert_eq!(order::order(&db.tasks, d(2024, 5, 11)).len(), 1);
}

#[test]
fn completing_twice_is_refused() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, d(2023, 1, 15));
    let mut db = Database::default();
    cmd::cmd_add(
        &mut db,
        &cfg,
        Task {
            priority: Priority::High,
            repeat_start: Some("* * * 7 C".into()),
            ..Task::new("vacuum")
        },
    )
    .unwrap();

    cmd::cmd_complete(&mut db, &cfg, "1").unwrap();
    let again = cmd::cmd_complete(&mut db, &cfg, "1");
    assert!(matches!(again, Err(CmdError::AlreadyCompleted(id)) if id == "1"));

    let db = Database::load(&cfg.db_path).unwrap();
    assert_eq!(db.tasks.len(), 2);
    assert_eq!(db.tasks.iter().filter(|t| !t.is_completed()).count(), 1);
}

#[test]
fn rule_next_previews_the_following_date() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, d(2023, 1, 2));

    let next = cmd::next_occurrence("* * 0 0 C", None, None, &cfg).unwrap();
    assert_eq!(next, Some(d(2023, 1, 8)));

    let next = cmd::next_occurrence("* * * 14 S", Some("2023-01-20"), Some("2023-01-25"), &cfg).unwrap();
    assert_eq!(next, Some(d(2023, 2, 3)));

    let never = cmd::next_occurrence("31 2 * 0 C", None, None, &cfg).unwrap();
    assert_eq!(never, None);
}

#[test]
fn rule_check_names_the_bad_part() {
    let err = cmd::check_rule("* 13 * 7 C").unwrap_err();
    match err {
        CmdError::InvalidRule { text, source: RuleError::Field { field, source } } => {
            assert_eq!(text, "* 13 * 7 C");
            assert_eq!(field, "month");
            assert!(matches!(source, FieldError::OutOfRange { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(matches!(cmd::check_rule("* * * 7 X"), Err(CmdError::InvalidRule { source: RuleError::Anchor(_), .. })));
    assert!(matches!(cmd::check_rule("* * * 7"), Err(CmdError::InvalidRule { source: RuleError::FieldCount(4), .. })));
    assert_eq!(cmd::check_rule("1,15 * * 0 C").unwrap().to_string(), "1,15 * * 0 C");
}
