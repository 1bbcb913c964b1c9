//! Plain-text rendering of calendar projections for the terminal.

use super::grid::{MonthGrid, DAY_HEADERS};
use super::projection::{TaskCard, TaskStats};
use crate::models::Priority;

/// Fits the widest label, `>31!*.(9+)`, plus a separating space.
const CELL_WIDTH: usize = 11;

fn marker_symbol(priority: Priority) -> char {
    match priority {
        Priority::High => '!',
        Priority::Medium => '*',
        Priority::Low => '.',
    }
}

/// Render a month grid.
///
/// Example output:
/// ```text
///                                  March 2024
///        Sun        Mon        Tue        Wed        Thu        Fri        Sat
///                                                                 1          2
///          3          4          5          6          7          8          9
///        >10         11         12         13         14    15!.(2)         16
/// ```
/// `>` marks today; `!`, `*` and `.` mark high, medium and low priority tasks.
/// The number in parentheses is the day's task count.
pub fn render_month(grid: &MonthGrid) -> String {
    let width = CELL_WIDTH * DAY_HEADERS.len();
    let mut output = format!("{:^width$}\n", grid.title);

    for header in DAY_HEADERS {
        output.push_str(&format!("{:>w$}", header, w = CELL_WIDTH - 1));
        output.push(' ');
    }
    end_row(&mut output);

    let mut column = 0;
    for _ in 0..grid.leading_blanks {
        output.push_str(&" ".repeat(CELL_WIDTH));
        column += 1;
    }

    for cell in &grid.days {
        let markers: String = cell
            .markers
            .iter()
            .map(|m| marker_symbol(m.priority))
            .collect();
        let today = if cell.is_today { ">" } else { "" };
        let count = match cell.task_count {
            0 => String::new(),
            n @ 1..=9 => format!("({n})"),
            _ => "(9+)".to_string(),
        };
        let label = format!("{today}{}{markers}{count}", cell.day);
        output.push_str(&format!("{:>w$} ", label, w = CELL_WIDTH - 1));

        column += 1;
        if column == DAY_HEADERS.len() {
            end_row(&mut output);
            column = 0;
        }
    }

    if column != 0 {
        end_row(&mut output);
    }
    output
}

fn end_row(output: &mut String) {
    output.truncate(output.trim_end_matches(' ').len());
    output.push('\n');
}

/// Render task cards one per line, optionally with free-text tags.
pub fn render_cards(cards: &[TaskCard], with_tags: bool) -> String {
    if cards.is_empty() {
        return "No tasks.\n".to_string();
    }

    let mut output = String::new();
    for card in cards {
        let task = &card.task;
        let check = if task.completed { "[x]" } else { "[ ]" };
        let due = if card.overdue {
            format!("! {}", card.due_label)
        } else {
            card.due_label.clone()
        };
        output.push_str(&format!(
            "{check} #{:<3} {:<10} {} [{}] [{}]",
            task.id,
            due,
            task.title,
            task.regulation.label(),
            task.priority.as_str()
        ));
        if with_tags && !task.tags.is_empty() {
            output.push_str(&format!(" {}", task.tags.join(", ")));
        }
        output.push('\n');
    }
    output
}

pub fn render_stats(stats: &TaskStats) -> String {
    format!(
        "Total: {}  Completed: {}  Due this week: {}  Pending: {}  Overdue: {}\n",
        stats.total, stats.completed, stats.due_this_week, stats.pending, stats.overdue
    )
}
