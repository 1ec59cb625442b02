//! Error type shared by the store, the operations and the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while working with the task file.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The task file exists but does not hold a task collection.
    #[error("Task file {} is corrupt: {reason}", path.display())]
    CorruptData { path: PathBuf, reason: String },

    /// The task file could not be read or written.
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Task {id} not found!")]
    NotFound { id: u64 },

    #[error("Task {id} already marked done!")]
    AlreadyDone { id: u64 },

    /// Rejected before the store is touched.
    #[error("{0}")]
    InvalidInput(String),
}

impl TaskError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaskError::Io { path: path.into(), source }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TaskError::CorruptData {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Notices the user should see, but which do not mean the command failed.
    pub fn is_informational(&self) -> bool {
        matches!(self, TaskError::NotFound { .. } | TaskError::AlreadyDone { .. })
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_informational_kinds() {
        assert!(TaskError::NotFound { id: 3 }.is_informational());
        assert!(TaskError::AlreadyDone { id: 3 }.is_informational());
        assert!(!TaskError::InvalidInput("x".into()).is_informational());
        assert!(!TaskError::corrupt("tasks.json", "bad").is_informational());
    }

    #[test]
    fn test_messages() {
        assert_eq!(TaskError::NotFound { id: 999 }.to_string(), "Task 999 not found!");
        assert_eq!(
            TaskError::AlreadyDone { id: 2 }.to_string(),
            "Task 2 already marked done!"
        );
        let err = TaskError::corrupt("/tmp/tasks.json", "expected value");
        assert!(err.to_string().contains("/tmp/tasks.json"));
        assert!(err.to_string().contains("expected value"));
    }
}
