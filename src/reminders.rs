//! Reminder sweep and quarterly deadline computation.
//!
//! The sweep is read-only: it classifies incomplete tasks by how close they
//! are to (or how far past) their due date, so a scheduler or the CLI can
//! decide whom to notify.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::ComplianceTask;

/// Days before the due date at which the first alert fires.
pub const ALERT_LEAD_DAYS: i64 = 7;
/// Days overdue after which a task is escalated.
pub const ESCALATION_DAYS: i64 = 7;
/// Grace period after quarter end for quarterly returns.
pub const QUARTERLY_GRACE_DAYS: i64 = 14;

/// Due date of a quarterly return and the day its alert starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub next_due: NaiveDate,
    pub alert_on: NaiveDate,
}

/// Deadline for a return submitted on `submitted`: the last day of its
/// quarter plus the grace period, alerting a week earlier.
pub fn quarterly_deadline(submitted: NaiveDate) -> Option<Deadline> {
    let quarter_end_month = 3 * ((submitted.month() - 1) / 3 + 1);
    let quarter_end = NaiveDate::from_ymd_opt(submitted.year(), quarter_end_month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()?;
    let next_due = quarter_end + Duration::days(QUARTERLY_GRACE_DAYS);
    Some(Deadline {
        next_due,
        alert_on: next_due - Duration::days(ALERT_LEAD_DAYS),
    })
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReminderLevel {
    /// Due within the alert window, today included.
    InitialAlert,
    /// Past due by fewer than [`ESCALATION_DAYS`].
    Overdue,
    /// Past due by [`ESCALATION_DAYS`] or more.
    Escalated,
}

impl ReminderLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialAlert => "initial_alert",
            Self::Overdue => "overdue",
            Self::Escalated => "escalated",
        }
    }

    /// Who should hear about a task at this level.
    pub fn audience(&self) -> &'static str {
        match self {
            Self::InitialAlert => "task owner",
            Self::Overdue => "compliance lead",
            Self::Escalated => "head of compliance",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub task_id: u32,
    pub title: String,
    pub due_on: NaiveDate,
    pub level: ReminderLevel,
    /// Negative while the task is still ahead of its due date.
    pub days_overdue: i64,
}

pub fn classify(task: &ComplianceTask, today: NaiveDate) -> Option<ReminderLevel> {
    if task.completed {
        return None;
    }
    let days_overdue = (today - task.due_date.date()).num_days();
    match days_overdue {
        d if d >= ESCALATION_DAYS => Some(ReminderLevel::Escalated),
        d if d > 0 => Some(ReminderLevel::Overdue),
        d if d >= -ALERT_LEAD_DAYS => Some(ReminderLevel::InitialAlert),
        _ => None,
    }
}

/// Classify every incomplete task, soonest due first.
pub fn reminder_sweep(tasks: &[ComplianceTask], today: NaiveDate) -> Vec<Reminder> {
    let mut reminders: Vec<Reminder> = tasks
        .iter()
        .filter_map(|task| {
            let level = classify(task, today)?;
            Some(Reminder {
                task_id: task.id,
                title: task.title.clone(),
                due_on: task.due_date.date(),
                level,
                days_overdue: (today - task.due_date.date()).num_days(),
            })
        })
        .collect();
    reminders.sort_by_key(|r| r.due_on);

    for reminder in &reminders {
        tracing::debug!(
            "Task {} is {} ({} days overdue), notify {}",
            reminder.task_id,
            reminder.level.as_str(),
            reminder.days_overdue,
            reminder.level.audience()
        );
    }
    reminders
}
