//! # tasktally
//!
//! A small personal task tracker. Tasks are kept in one JSON file; listing
//! orders them by a priority derived from keywords and completion timing.
//!
//! ## Priority bands
//!
//! Computed fresh for every listing, never stored:
//!
//! | Band | Meaning |
//! |------|---------|
//! | 0 | already done |
//! | 1 | mentions "urgent", or an open task whose recorded duration beats the average |
//! | 2 | mentions "important", or an open task whose recorded duration does not |
//! | 3 | nothing else known |
//!
//! The average only covers completed tasks. With none completed it is
//! treated as infinite, whereas `stats` reports 0 in the same situation.
//!
//! ## Data storage
//!
//! Tasks are saved in your local data directory:
//! *   Linux: `~/.local/share/tasktally/tasks.json`
//! *   macOS: `~/Library/Application Support/tasktally/tasks.json`
//! *   Windows: `%APPDATA%\tasktally\tasks.json`
//!
//! Override it with `--db <PATH>` or the `TASKS_DB` environment variable.
//! Concurrent runs against the same file are not coordinated; the last save wins.

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod operations;
pub mod priority;
pub mod storage;
pub mod tui;

pub use error::{Result, TaskError};
pub use models::Task;
pub use operations::{Completion, Stats, TaskService};
pub use priority::PrioritizedTask;
pub use storage::{migrate, TaskStore};
