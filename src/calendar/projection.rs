//! Read-only projections of the task store.
//!
//! Everything here is a pure function of a task slice, the active filter and
//! an explicit `now`, so the same store can be projected for any instant.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::dates::{format_relative, is_before, on_date};
use crate::models::{ComplianceTask, TaskFilter};

/// Maximum number of tasks in the upcoming panel.
pub const UPCOMING_LIMIT: usize = 5;

/// Width of the "due this week" window.
pub fn week() -> Duration {
    Duration::days(7)
}

/// Incomplete and due strictly before `now`.
pub fn is_overdue(task: &ComplianceTask, now: NaiveDateTime) -> bool {
    !task.completed && is_before(task.due_date, now)
}

/// Incomplete and due within `[now, now + 7 days]`.
///
/// Never true at the same `now` as [`is_overdue`].
pub fn is_due_this_week(task: &ComplianceTask, now: NaiveDateTime) -> bool {
    !task.completed && task.due_date >= now && task.due_date <= now + week()
}

/// Filtered tasks in ascending due-date order. The sort is stable, so tasks
/// due at the same instant keep insertion order.
fn filtered_by_due<'a>(
    tasks: &'a [ComplianceTask],
    filter: &TaskFilter,
) -> impl Iterator<Item = &'a ComplianceTask> {
    let mut sorted: Vec<&ComplianceTask> = tasks.iter().filter(|t| filter.matches(t)).collect();
    sorted.sort_by_key(|t| t.due_date);
    sorted.into_iter()
}

/// Sidebar projection: incomplete, filtered, soonest first, at most five.
pub fn upcoming<'a>(tasks: &'a [ComplianceTask], filter: &TaskFilter) -> Vec<&'a ComplianceTask> {
    filtered_by_due(tasks, filter)
        .filter(|t| !t.completed)
        .take(UPCOMING_LIMIT)
        .collect()
}

/// List view: filtered, soonest first, any completion state, no limit.
pub fn list_view<'a>(tasks: &'a [ComplianceTask], filter: &TaskFilter) -> Vec<&'a ComplianceTask> {
    filtered_by_due(tasks, filter).collect()
}

/// Tasks due on `date`, in store order.
///
/// The month grid does not apply the regulation or priority filters; this
/// mirrors the dashboard, where only the sidebar and list honour them.
pub fn tasks_on(tasks: &[ComplianceTask], date: NaiveDate) -> Vec<&ComplianceTask> {
    tasks.iter().filter(|t| on_date(t.due_date, date)).collect()
}

/// Dashboard counters, computed over the whole store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub due_this_week: usize,
    pub pending: usize,
    pub overdue: usize,
}

pub fn stats(tasks: &[ComplianceTask], now: NaiveDateTime) -> TaskStats {
    TaskStats {
        total: tasks.len(),
        completed: tasks.iter().filter(|t| t.completed).count(),
        due_this_week: tasks.iter().filter(|t| is_due_this_week(t, now)).count(),
        pending: tasks.iter().filter(|t| !t.completed).count(),
        overdue: tasks.iter().filter(|t| is_overdue(t, now)).count(),
    }
}

/// A task prepared for display: the record plus its overdue state and a
/// relative due label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCard {
    #[serde(flatten)]
    pub task: ComplianceTask,
    pub overdue: bool,
    pub due_label: String,
}

impl TaskCard {
    pub fn new(task: &ComplianceTask, now: NaiveDateTime) -> Self {
        Self {
            task: task.clone(),
            overdue: is_overdue(task, now),
            due_label: format_relative(task.due_date, now),
        }
    }
}

pub fn cards(tasks: &[&ComplianceTask], now: NaiveDateTime) -> Vec<TaskCard> {
    tasks.iter().map(|t| TaskCard::new(t, now)).collect()
}
