use crate::models::Task;

/// Band for tasks that are already finished.
pub const PRIORITY_DONE: u8 = 0;
/// Band for `urgent` keywords and for legacy durations faster than average.
pub const PRIORITY_HIGH: u8 = 1;
/// Band for `important` keywords and for legacy durations at or above average.
pub const PRIORITY_MEDIUM: u8 = 2;
/// Band when nothing is known about the task.
pub const PRIORITY_DEFAULT: u8 = 3;

/// A task paired with the priority computed for one listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PrioritizedTask {
    pub task: Task,
    pub priority: u8,
}

/// Mean duration of completed tasks.
///
/// Infinite when no completed task has a duration, so that any recorded
/// duration counts as fast.
pub fn average_duration(tasks: &[Task]) -> f64 {
    let durations: Vec<f64> = tasks
        .iter()
        .filter(|t| t.done)
        .filter_map(|t| t.duration)
        .collect();
    if durations.is_empty() {
        return f64::INFINITY;
    }
    durations.iter().sum::<f64>() / durations.len() as f64
}

/// Calculates the priority band for a task. Lower is listed first.
///
/// Keyword bands and duration bands share the values 1 and 2.
pub fn compute_priority(task: &Task, avg_duration: f64) -> u8 {
    if task.done {
        return PRIORITY_DONE;
    }
    let description = task.description.to_lowercase();
    if description.contains("urgent") {
        PRIORITY_HIGH
    } else if description.contains("important") {
        PRIORITY_MEDIUM
    } else if let Some(duration) = task.duration {
        // undone task carrying a duration from older data
        if duration < avg_duration {
            PRIORITY_HIGH
        } else {
            PRIORITY_MEDIUM
        }
    } else {
        PRIORITY_DEFAULT
    }
}

/// Prioritizes every task and sorts ascending, keeping load order for ties.
pub fn prioritize(tasks: Vec<Task>) -> Vec<PrioritizedTask> {
    let avg = average_duration(&tasks);
    let mut listing: Vec<PrioritizedTask> = tasks
        .into_iter()
        .map(|task| {
            let priority = compute_priority(&task, avg);
            PrioritizedTask { task, priority }
        })
        .collect();
    listing.sort_by_key(|p| p.priority);
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: u64, description: &str, done: bool, duration: Option<f64>) -> Task {
        let created = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        Task {
            id,
            description: description.into(),
            created,
            done,
            completed: if done { Some(created) } else { None },
            duration,
        }
    }

    #[test]
    fn test_average_ignores_open_tasks() {
        let tasks = vec![
            task(1, "a", true, Some(10.0)),
            task(2, "b", true, Some(30.0)),
            task(3, "c", false, Some(1000.0)),
        ];
        assert_eq!(average_duration(&tasks), 20.0);
    }

    #[test]
    fn test_average_without_completed_tasks_is_infinite() {
        assert!(average_duration(&[]).is_infinite());
        assert!(average_duration(&[task(1, "a", false, None)]).is_infinite());
    }

    #[test]
    fn test_done_wins_over_keywords() {
        assert_eq!(compute_priority(&task(1, "URGENT", true, Some(1.0)), 5.0), PRIORITY_DONE);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(compute_priority(&task(1, "Fix it, Urgent!", false, None), 5.0), PRIORITY_HIGH);
        assert_eq!(compute_priority(&task(1, "IMPORTANT call", false, None), 5.0), PRIORITY_MEDIUM);
    }

    #[test]
    fn test_urgent_checked_before_important() {
        assert_eq!(
            compute_priority(&task(1, "important and urgent", false, None), 5.0),
            PRIORITY_HIGH
        );
    }

    #[test]
    fn test_keyword_beats_legacy_duration() {
        assert_eq!(
            compute_priority(&task(1, "important", false, Some(1.0)), 5.0),
            PRIORITY_MEDIUM
        );
    }

    #[test]
    fn test_legacy_duration_bands() {
        assert_eq!(compute_priority(&task(1, "x", false, Some(4.0)), 5.0), PRIORITY_HIGH);
        assert_eq!(compute_priority(&task(1, "x", false, Some(5.0)), 5.0), PRIORITY_MEDIUM);
        assert_eq!(compute_priority(&task(1, "x", false, Some(9.0)), 5.0), PRIORITY_MEDIUM);
    }

    #[test]
    fn test_default_band() {
        assert_eq!(compute_priority(&task(1, "buy milk", false, None), 5.0), PRIORITY_DEFAULT);
    }

    #[test]
    fn test_sort_is_stable() {
        let listing = prioritize(vec![
            task(1, "a", false, None),
            task(2, "b", true, Some(1.0)),
            task(3, "c", false, None),
            task(4, "d", true, Some(2.0)),
        ]);
        let ids: Vec<u64> = listing.iter().map(|p| p.task.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }
}
