//! The calendar session: task store, selectors and persistence.
//!
//! A [`CalendarSession`] owns everything the dashboard used to keep in
//! globals: the ordered task list, the month cursor, the regulation and
//! priority filters, the view mode and the theme. Every projection is
//! computed on demand from these fields with an explicit `now`.

pub mod dates;
pub mod grid;
pub mod projection;
pub mod render;
pub mod samples;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::Result;
use crate::models::*;
use crate::reminders::{reminder_sweep, Reminder};

pub use dates::format_relative;
pub use grid::{day_detail, month_grid, DayCell, DayDetail, MonthGrid};
pub use projection::{TaskCard, TaskStats};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// A short message for the user, e.g. the overdue warning shown at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub struct CalendarSession {
    db: Database,
    tasks: Vec<ComplianceTask>,
    current_date: NaiveDateTime,
    filter: TaskFilter,
    view: ViewMode,
    theme: Theme,
}

impl CalendarSession {
    /// A fresh session seeded with the sample tasks. Nothing is read from storage.
    pub fn new(db: Database, now: NaiveDateTime) -> Self {
        Self {
            db,
            tasks: samples::sample_tasks(now),
            current_date: now,
            filter: TaskFilter::default(),
            view: ViewMode::default(),
            theme: Theme::default(),
        }
    }

    /// A session restored from storage, falling back to defaults.
    pub fn open(db: Database, now: NaiveDateTime) -> Self {
        let mut session = Self::new(db, now);
        session.load();
        session
    }

    /// Restore tasks, theme and month cursor from storage.
    ///
    /// An absent or unreadable document leaves the current state untouched;
    /// the failure is logged and never returned.
    pub fn load(&mut self) {
        let raw = match self.db.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No persisted calendar state, keeping defaults");
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to read persisted calendar state: {}", e);
                return;
            }
        };

        let state: PersistedState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Persisted calendar state is unreadable, keeping defaults: {}", e);
                return;
            }
        };

        if let Some(tasks) = state.tasks {
            self.tasks = tasks;
        }
        self.theme = state
            .theme
            .as_deref()
            .and_then(Theme::from_str)
            .unwrap_or_default();
        if let Some(current) = state.current_date.as_deref().and_then(timestamp::parse) {
            self.current_date = current;
        }

        tracing::info!("Loaded {} compliance tasks from storage", self.tasks.len());
    }

    /// Write tasks, theme and month cursor as one JSON document.
    pub fn save(&self) -> Result<()> {
        let state = PersistedState {
            tasks: Some(self.tasks.clone()),
            theme: Some(self.theme.as_str().to_string()),
            current_date: Some(timestamp::format(&self.current_date)),
        };
        let json = serde_json::to_string(&state)?;
        self.db.set_item(STORAGE_KEY, &json)?;
        tracing::debug!("Saved {} compliance tasks", self.tasks.len());
        Ok(())
    }

    pub fn tasks(&self) -> &[ComplianceTask] {
        &self.tasks
    }

    pub fn task(&self, id: u32) -> Option<&ComplianceTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a task with `id = count + 1` and persist.
    ///
    /// The title is not validated; an empty title is stored as given. When the
    /// save fails the task is not kept.
    pub fn add_task(&mut self, input: CreateTaskInput) -> Result<ComplianceTask> {
        let task = ComplianceTask {
            id: self.tasks.len() as u32 + 1,
            title: input.title,
            description: input.description,
            due_date: input.due_date.and_time(chrono::NaiveTime::MIN),
            priority: input.priority,
            regulation: input.regulation,
            tags: input.tags,
            completed: false,
        };
        self.tasks.push(task.clone());
        if let Err(e) = self.save() {
            self.tasks.pop();
            return Err(e);
        }

        tracing::info!(
            "Added task {} ({}, {}) due {}",
            task.id,
            task.regulation.as_str(),
            task.priority.as_str(),
            task.due_date.date()
        );
        Ok(task)
    }

    /// Flip `completed` and persist. Unknown ids are a silent no-op, and a
    /// failed save leaves the task as it was.
    pub fn toggle_completed(&mut self, id: u32) -> Result<Option<ComplianceTask>> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            tracing::debug!("Toggle ignored for unknown task {}", id);
            return Ok(None);
        };
        self.tasks[index].completed = !self.tasks[index].completed;
        if let Err(e) = self.save() {
            self.tasks[index].completed = !self.tasks[index].completed;
            return Err(e);
        }
        Ok(Some(self.tasks[index].clone()))
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn set_regulation_filter(&mut self, regulation: Option<Regulation>) {
        self.filter.regulation = regulation;
    }

    pub fn set_priority_filter(&mut self, priority: Option<Priority>) {
        self.filter.priority = priority;
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let previous = self.theme;
        self.theme = previous.toggled();
        if let Err(e) = self.save() {
            self.theme = previous;
            return Err(e);
        }
        Ok(self.theme)
    }

    pub fn current_date(&self) -> NaiveDateTime {
        self.current_date
    }

    /// Move the month cursor. The new position is persisted with the next save.
    pub fn change_month(&mut self, delta: i32) {
        self.current_date = dates::shift_months(self.current_date, delta);
    }

    pub fn upcoming(&self) -> Vec<&ComplianceTask> {
        projection::upcoming(&self.tasks, &self.filter)
    }

    pub fn list_view(&self) -> Vec<&ComplianceTask> {
        projection::list_view(&self.tasks, &self.filter)
    }

    /// Tasks due on `date`, ignoring the active filters.
    pub fn day_tasks(&self, date: NaiveDate) -> Vec<&ComplianceTask> {
        projection::tasks_on(&self.tasks, date)
    }

    pub fn stats(&self, now: NaiveDateTime) -> TaskStats {
        projection::stats(&self.tasks, now)
    }

    /// Grid for the month under the cursor.
    pub fn month_grid(&self, today: NaiveDate) -> Result<MonthGrid> {
        month_grid(
            &self.tasks,
            self.current_date.year(),
            self.current_date.month0(),
            today,
        )
    }

    pub fn day_detail(&self, date: NaiveDate) -> DayDetail {
        day_detail(&self.tasks, date)
    }

    /// Warning listing how many tasks are overdue, if any.
    pub fn overdue_notice(&self, now: NaiveDateTime) -> Option<Notice> {
        let overdue = self.stats(now).overdue;
        (overdue > 0).then(|| Notice {
            level: NoticeLevel::Warning,
            message: format!("You have {} overdue tasks!", overdue),
        })
    }

    pub fn reminders(&self, today: NaiveDate) -> Vec<Reminder> {
        reminder_sweep(&self.tasks, today)
    }
}
