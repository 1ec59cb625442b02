//! The four task operations. Each one loads the whole collection and, when it
//! changes something, saves the whole collection back.

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{Result, TaskError};
use crate::models::{local_now, Task};
use crate::priority::{prioritize, PrioritizedTask};
use crate::storage::TaskStore;

/// Result of a successful `mark_done`.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub id: u64,
    /// Seconds from creation to completion.
    pub duration: f64,
}

/// Totals reported by `stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    /// Mean duration of completed tasks, 0 when there are none.
    pub average_duration: f64,
}

/// Runs task operations against one store.
#[derive(Debug, Clone)]
pub struct TaskService {
    store: TaskStore,
    clock: fn() -> NaiveDateTime,
}

impl TaskService {
    pub fn new(store: TaskStore) -> Self {
        Self::with_clock(store, local_now)
    }

    /// Uses `clock` instead of the local wall clock for new timestamps.
    pub fn with_clock(store: TaskStore, clock: fn() -> NaiveDateTime) -> Self {
        TaskService { store, clock }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Adds a new task and returns it.
    ///
    /// Blank descriptions are rejected before the store is read.
    pub fn add(&self, description: &str) -> Result<Task> {
        if description.trim().is_empty() {
            return Err(TaskError::InvalidInput(
                "Task description must not be empty!".into(),
            ));
        }

        let mut tasks = self.store.load()?;
        let task = Task::new(tasks.len() as u64 + 1, description, (self.clock)());
        tasks.push(task.clone());
        self.store.save(&tasks)?;
        info!(id = task.id, "Task added");
        Ok(task)
    }

    /// Marks a task as complete by ID.
    ///
    /// Returns `NotFound` or `AlreadyDone` without saving when there is
    /// nothing to change.
    pub fn mark_done(&self, id: u64) -> Result<Completion> {
        let mut tasks = self.store.load()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound { id })?;
        if task.done {
            return Err(TaskError::AlreadyDone { id });
        }

        let duration = task.complete((self.clock)());
        self.store.save(&tasks)?;
        info!(id, duration, "Task completed");
        Ok(Completion { id, duration })
    }

    /// All tasks with their priority, most pressing first.
    pub fn list(&self) -> Result<Vec<PrioritizedTask>> {
        Ok(prioritize(self.store.load()?))
    }

    pub fn stats(&self) -> Result<Stats> {
        Ok(summarize(&self.store.load()?))
    }
}

/// Counts tasks and averages the durations of completed ones.
///
/// Unlike the listing average, no completed tasks means an average of 0.
pub fn summarize(tasks: &[Task]) -> Stats {
    let completed: Vec<&Task> = tasks.iter().filter(|t| t.done).collect();
    let durations: Vec<f64> = completed.iter().filter_map(|t| t.duration).collect();
    let average_duration = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    };
    Stats {
        total: tasks.len(),
        completed: completed.len(),
        average_duration,
    }
}
