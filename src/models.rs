use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

/// Schema version written by this build.
pub const FILE_VERSION: u32 = 1;

/// Represents a single task in the task tracker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Position-derived identifier, `count + 1` at creation time.
    pub id: u64,
    /// What needs doing.
    pub description: String,
    /// Local time the task was added.
    #[serde(with = "timestamp")]
    pub created: NaiveDateTime,
    /// Whether the task has been completed.
    #[serde(default)]
    pub done: bool,
    /// Local time the task was marked done.
    #[serde(default, with = "timestamp::option")]
    pub completed: Option<NaiveDateTime>,
    /// Seconds between `created` and `completed`.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Task {
    /// Creates a fresh, not-yet-done task.
    pub fn new(id: u64, description: impl Into<String>, created: NaiveDateTime) -> Self {
        Task {
            id,
            description: description.into(),
            created,
            done: false,
            completed: None,
            duration: None,
        }
    }

    /// Marks the task done at `at`, recording how long it took.
    pub fn complete(&mut self, at: NaiveDateTime) -> f64 {
        let duration = seconds_between(self.created, at);
        self.done = true;
        self.completed = Some(at);
        self.duration = Some(duration);
        duration
    }
}

/// On-disk layout of the task file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskFile {
    pub version: u32,
    pub tasks: Vec<Task>,
}

impl TaskFile {
    pub fn new(tasks: Vec<Task>) -> Self {
        TaskFile {
            version: FILE_VERSION,
            tasks,
        }
    }
}

/// Fractional seconds from `start` to `end`.
pub fn seconds_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let delta = end - start;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Current local time at the precision the task file keeps.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}

/// ISO-8601 timestamps without an offset, e.g. `2024-03-01T09:30:00.250000`.
///
/// Reading also accepts values without fractional seconds and RFC 3339
/// strings with an offset, which are converted to local time.
pub mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

    pub fn format(dt: &NaiveDateTime) -> String {
        dt.format(FORMAT).to_string()
    }

    pub fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        if let Ok(dt) = raw.parse::<NaiveDateTime>() {
            return Ok(dt);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Local).naive_local())
            .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
    }

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => serializer.serialize_str(&super::format(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw).map(Some).map_err(de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_complete_sets_all_fields() {
        let mut task = Task::new(1, "write report", at(9, 0, 0));
        let took = task.complete(at(9, 1, 30));
        assert!(task.done);
        assert_eq!(task.completed, Some(at(9, 1, 30)));
        assert_eq!(task.duration, Some(90.0));
        assert_eq!(took, 90.0);
    }

    #[test]
    fn test_record_field_order_and_nulls() {
        let task = Task::new(1, "buy milk", at(8, 0, 0));
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"description":"buy milk","created":"2024-03-01T08:00:00.000000","done":false,"completed":null,"duration":null}"#
        );
    }

    #[test]
    fn test_reads_legacy_timestamp_forms() {
        let json = r#"{"id":1,"description":"x","created":"2024-03-01T08:00:00","done":true,"completed":"2024-03-01T08:00:05.5"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.created, at(8, 0, 0));
        assert_eq!(seconds_between(task.created, task.completed.unwrap()), 5.5);
        assert_eq!(task.duration, None);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id":4,"description":"x","created":"2024-03-01T08:00:00"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.done);
        assert_eq!(task.completed, None);
        assert_eq!(task.duration, None);
    }

    #[test]
    fn test_rejects_garbage_timestamp() {
        let json = r#"{"id":1,"description":"x","created":"yesterday"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_rfc3339_timestamp_is_accepted() {
        assert!(timestamp::parse("2024-03-01T08:00:00+02:00").is_ok());
    }

    #[test]
    fn test_local_now_has_microsecond_precision() {
        let now = local_now();
        let reparsed = timestamp::parse(&timestamp::format(&now)).unwrap();
        assert_eq!(now, reparsed);
    }
}
