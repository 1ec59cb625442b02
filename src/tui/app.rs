use ratatui::widgets::TableState;

use crate::commands::format_stats;
use crate::error::{Result, TaskError};
use crate::operations::{Stats, TaskService};
use crate::priority::PrioritizedTask;

#[derive(Debug, PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
}

pub struct App {
    pub service: TaskService,
    pub listing: Vec<PrioritizedTask>,
    pub stats: Stats,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    /// Outcome of the last action, shown in the status line.
    pub message: Option<String>,
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new(service: TaskService) -> Result<App> {
        let mut app = App {
            service,
            listing: Vec::new(),
            stats: Stats { total: 0, completed: 0, average_duration: 0.0 },
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            message: None,
        };
        app.reload()?;
        Ok(app)
    }

    /// Selects the next task, wrapping around.
    pub fn next(&mut self) {
        if self.listing.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.listing.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task, wrapping around.
    pub fn previous(&mut self) {
        if self.listing.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.listing.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.state
            .selected()
            .and_then(|i| self.listing.get(i))
            .map(|p| p.task.id)
    }

    /// Marks the currently selected task as complete.
    pub fn complete_selected(&mut self) -> Result<()> {
        let Some(id) = self.selected_id() else {
            return Ok(());
        };
        match self.service.mark_done(id) {
            Ok(c) => {
                self.message = Some(format!(
                    "Marked task {} as done! (Took {:.2} seconds)",
                    c.id, c.duration
                ));
            }
            Err(e) if e.is_informational() => self.message = Some(e.to_string()),
            Err(e) => return Err(e),
        }
        self.reload()
    }

    /// Reloads the listing and stats from storage, keeping the selection in range.
    pub fn reload(&mut self) -> Result<()> {
        self.listing = self.service.list()?;
        self.stats = self.service.stats()?;

        if self.listing.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.listing.len() {
                self.state.select(Some(self.listing.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
        Ok(())
    }

    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Adds a task from the input box. Blank input keeps the box open.
    pub fn submit_add(&mut self) -> Result<()> {
        match self.service.add(&self.input_buffer) {
            Ok(task) => {
                self.message = Some(format!("Added task {}: {}", task.id, task.description));
                self.cancel_input();
                self.reload()
            }
            Err(TaskError::InvalidInput(msg)) => {
                self.message = Some(msg);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn status_line(&self) -> String {
        let summary = if self.stats.total == 0 {
            crate::commands::NO_TASKS.to_string()
        } else {
            format_stats(&self.stats)
        };
        match &self.message {
            Some(msg) => format!("{} | {}", summary, msg),
            None => summary,
        }
    }
}
