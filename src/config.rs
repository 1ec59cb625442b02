use std::path::PathBuf;

/// Environment variable that overrides the task file location.
pub const DB_ENV_VAR: &str = "TASKS_DB";

const APP_DIR: &str = "tasktally";
const DB_FILE: &str = "tasks.json";

/// Returns the path to the tasks database file.
///
/// The path is determined in the following order:
/// 1. An explicit path (`--db` or `TASKS_DB`, both handled by the CLI).
/// 2. `~/.local/share/tasktally/tasks.json` (on Linux).
/// 3. `./tasks.json` (fallback).
pub fn resolve_db_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(default_db_path)
}

fn default_db_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(mut p) => {
            p.push(APP_DIR);
            p.push(DB_FILE);
            p
        }
        None => PathBuf::from(DB_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let p = resolve_db_path(Some(PathBuf::from("/tmp/mine.json")));
        assert_eq!(p, PathBuf::from("/tmp/mine.json"));
    }

    #[test]
    fn test_default_path_ends_in_app_file() {
        let p = resolve_db_path(None);
        assert!(p.ends_with(DB_FILE));
    }
}
