use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, TaskError};
use crate::models::{seconds_between, Task, TaskFile, FILE_VERSION};

/// File-backed task collection.
///
/// Every call reads or writes the whole file. There is no locking, so two
/// processes saving at the same time can lose an update.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all tasks in file order.
    ///
    /// Returns an empty vector if the file does not exist.
    pub fn load(&self) -> Result<Vec<Task>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No task file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(TaskError::io(&self.path, e)),
        };
        let tasks = self.decode(&content)?;
        debug!(path = %self.path.display(), count = tasks.len(), "Loaded tasks");
        Ok(migrate(tasks))
    }

    /// Saves the given list of tasks, replacing the whole file.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| TaskError::io(dir, e))?;
        }

        let file = TaskFile::new(tasks.to_vec());
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| TaskError::io(&self.path, e.into()))?;

        let mut temp_name = self.path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = self.path.with_file_name(temp_name);

        fs::write(&temp_path, json).map_err(|e| TaskError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| TaskError::io(&self.path, e))?;
        debug!(path = %self.path.display(), count = tasks.len(), "Saved tasks");
        Ok(())
    }

    /// Accepts the versioned envelope and the older bare array of records.
    fn decode(&self, content: &str) -> Result<Vec<Task>> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| TaskError::corrupt(&self.path, e))?;
        match value {
            Value::Array(_) => {
                debug!(path = %self.path.display(), "Reading unversioned task file");
                serde_json::from_value(value).map_err(|e| TaskError::corrupt(&self.path, e))
            }
            Value::Object(_) => {
                let file: TaskFile =
                    serde_json::from_value(value).map_err(|e| TaskError::corrupt(&self.path, e))?;
                if file.version > FILE_VERSION {
                    return Err(TaskError::corrupt(
                        &self.path,
                        format!(
                            "unsupported file version {} (newest known is {})",
                            file.version, FILE_VERSION
                        ),
                    ));
                }
                Ok(file.tasks)
            }
            _ => Err(TaskError::corrupt(
                &self.path,
                "expected a list of tasks or a versioned task file",
            )),
        }
    }
}

/// Backfills `duration` on done tasks written before it was tracked.
pub fn migrate(mut tasks: Vec<Task>) -> Vec<Task> {
    let mut repaired = 0usize;
    for task in tasks.iter_mut() {
        if !task.done || task.duration.is_some() {
            continue;
        }
        if let Some(completed) = task.completed {
            task.duration = Some(seconds_between(task.created, completed));
            repaired += 1;
        }
    }
    if repaired > 0 {
        info!(repaired, "Backfilled missing task durations");
    }
    tasks
}
