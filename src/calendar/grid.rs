use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::dates::{days_in_month, first_weekday, month_name};
use super::projection::tasks_on;
use crate::error::{CalendarError, Result};
use crate::models::{ComplianceTask, Priority};

pub const DAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Layout of one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    /// Zero-based month index.
    pub month: u32,
    /// e.g. `March 2024`.
    pub title: String,
    /// Empty cells before day 1, equal to day 1's weekday (0 = Sunday).
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_weekend: bool,
    /// One marker per priority present that day, high before medium before low.
    pub markers: Vec<PriorityMarker>,
    pub task_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityMarker {
    pub priority: Priority,
    pub color: String,
    /// How many of the day's tasks carry this priority.
    pub count: usize,
}

/// Build the grid for a zero-based month. Day cells ignore the session
/// filters.
pub fn month_grid(
    tasks: &[ComplianceTask],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<MonthGrid> {
    let invalid = || CalendarError::InvalidMonth {
        year,
        month: month + 1,
    };
    let leading_blanks = first_weekday(year, month).ok_or_else(invalid)?;
    let day_count = days_in_month(year, month).ok_or_else(invalid)?;

    let days = (1..=day_count)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month + 1, day))
        .map(|date| day_cell(tasks, date, today))
        .collect();

    Ok(MonthGrid {
        year,
        month,
        title: format!("{} {}", month_name(month), year),
        leading_blanks,
        days,
    })
}

fn day_cell(tasks: &[ComplianceTask], date: NaiveDate, today: NaiveDate) -> DayCell {
    let day_tasks = tasks_on(tasks, date);
    let markers = Priority::ALL
        .iter()
        .filter_map(|&priority| {
            let count = day_tasks.iter().filter(|t| t.priority == priority).count();
            (count > 0).then(|| PriorityMarker {
                priority,
                color: priority.color().to_string(),
                count,
            })
        })
        .collect();

    DayCell {
        day: date.day(),
        date,
        is_today: date == today,
        is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        markers,
        task_count: day_tasks.len(),
    }
}

/// What clicking a day cell reveals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetail {
    pub date: NaiveDate,
    pub entries: Vec<DayEntry>,
    /// Human-readable summary, either the numbered task list or a
    /// "no tasks" notice.
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayEntry {
    pub id: u32,
    pub title: String,
    pub priority: Priority,
    pub completed: bool,
}

pub fn day_detail(tasks: &[ComplianceTask], date: NaiveDate) -> DayDetail {
    let entries: Vec<DayEntry> = tasks_on(tasks, date)
        .into_iter()
        .map(|t| DayEntry {
            id: t.id,
            title: t.title.clone(),
            priority: t.priority,
            completed: t.completed,
        })
        .collect();

    let stamp = format!("{}/{}/{}", date.month(), date.day(), date.year());
    let message = if entries.is_empty() {
        format!("No tasks scheduled for {stamp}")
    } else {
        let mut message = format!("Tasks for {stamp}:\n\n");
        for (i, entry) in entries.iter().enumerate() {
            let status = if entry.completed {
                "✓ Completed"
            } else {
                "○ Pending"
            };
            message.push_str(&format!(
                "{}. {} - {} ({})\n",
                i + 1,
                status,
                entry.title,
                entry.priority.as_str()
            ));
        }
        message
    };

    DayDetail {
        date,
        entries,
        message,
    }
}
