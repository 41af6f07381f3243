//! # taskline
//!
//! Scheduling core for a plain-text task list whose only rich field is a free
//! text "notes" blob.
//!
//! - [`repeat`]: crontab-like repeat rules and the search for the next date
//! - [`notes`]: `#P:`/`#S:`/`#D:`/`#RS:`/`#RD:` directives inside notes
//! - [`order`]: which tasks show up today and in what order
//! - [`reschedule`]: completing tasks and deriving the next repetition
//! - [`filter`], [`summary`]: search and headline counts
//!
//! The engine modules are pure functions of their inputs: they take `today`
//! as a parameter, do no I/O and never fail. Invalid input degrades to
//! "not set" or "does not repeat".
//!
//! ```
//! use chrono::NaiveDate;
//! use taskline::{order, repeat, task::Task};
//!
//! let d = |m, day| NaiveDate::from_ymd_opt(2023, m, day).unwrap();
//! assert_eq!(repeat::next_from_text("* * * 7 C", Some(d(1, 1)), d(1, 15)), Some(d(1, 22)));
//!
//! let mut task = Task::new("water plants");
//! task.apply_notes("balcony\n#P:3\n#RS:* * 6 0 C");
//! assert_eq!(order::sort_key(&task, d(1, 2)), "2023-01-09-0");
//! ```
//!
//! The `tl` binary wraps the engine with a local JSON cache; see [`cmd`].

pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod filter;
pub mod notes;
pub mod order;
pub mod repeat;
pub mod reschedule;
pub mod summary;
pub mod task;
