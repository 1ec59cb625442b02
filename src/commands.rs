use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::error::{Result, TaskError};
use crate::operations::{Stats, TaskService};
use crate::priority::PrioritizedTask;

pub const NO_TASKS: &str = "No tasks yet!";
pub const INVALID_ID: &str = "Please provide a valid task ID!";

/// Adds a new task and confirms the assigned id.
pub fn cmd_add(service: &TaskService, words: &[String]) -> Result<()> {
    let description = words.join(" ");
    let task = service.add(&description)?;
    println!("Added task {}: {}", task.id, task.description);
    Ok(())
}

/// Lists tasks in a formatted table, sorted by priority.
pub fn cmd_list(service: &TaskService) -> Result<()> {
    let listing = service.list()?;
    if listing.is_empty() {
        println!("{}", NO_TASKS);
        return Ok(());
    }
    println!("{}", render_listing(&listing));
    Ok(())
}

/// Marks a task as complete by the id given on the command line.
///
/// A malformed id, not-found and already-done are printed as notices, not returned.
pub fn cmd_done(service: &TaskService, raw_id: &str) -> Result<()> {
    let id = match parse_id(raw_id) {
        Ok(Some(id)) => id,
        Ok(None) => {
            println!("Task {} not found!", raw_id.trim());
            return Ok(());
        }
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };
    match service.mark_done(id) {
        Ok(c) => {
            println!("Marked task {} as done! (Took {:.2} seconds)", c.id, c.duration);
            Ok(())
        }
        Err(e) if e.is_informational() => {
            println!("{}", e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Prints task totals and the average completion time.
pub fn cmd_stats(service: &TaskService) -> Result<()> {
    let stats = service.stats()?;
    if stats.total == 0 {
        println!("{}", NO_TASKS);
        return Ok(());
    }
    println!("{}", format_stats(&stats));
    Ok(())
}

/// Parses a task id typed by the user.
///
/// Integers that no task can carry (negative or past `u64::MAX`) give
/// `Ok(None)`; anything that is not an integer is `InvalidInput`.
pub fn parse_id(raw: &str) -> Result<Option<u64>> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u64>() {
        return Ok(Some(id));
    }
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    Err(TaskError::InvalidInput(INVALID_ID.into()))
}

pub fn format_stats(stats: &Stats) -> String {
    format!(
        "Total tasks: {}, Completed: {}, Avg duration: {:.2} seconds",
        stats.total, stats.completed, stats.average_duration
    )
}

pub fn done_marker(done: bool) -> &'static str {
    if done {
        "✓"
    } else {
        " "
    }
}

pub fn render_listing(listing: &[PrioritizedTask]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Done").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
        ]);

    for entry in listing {
        let priority_color = match entry.priority {
            0 => Color::Grey,
            1 => Color::Red,
            2 => Color::Yellow,
            _ => Color::Green,
        };
        table.add_row(vec![
            Cell::new(entry.task.id),
            Cell::new(done_marker(entry.task.done)),
            Cell::new(&entry.task.description),
            Cell::new(entry.priority).fg(priority_color),
        ]);
    }
    table
}
