use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use compliance_calendar::api;
use compliance_calendar::calendar::projection::cards;
use compliance_calendar::calendar::{month_grid, render, CalendarSession};
use compliance_calendar::config::AppConfig;
use compliance_calendar::models::{parse_due_date, CreateTaskInput, TaskFilter};
use compliance_calendar::reminders::quarterly_deadline;
use compliance_calendar::CalendarError;

#[derive(Parser)]
#[command(name = "ccal")]
#[command(about = "Compliance task calendar")]
struct Cli {
    /// Storage file (overrides CCAL_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API (overrides CCAL_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List tasks soonest first, completed ones included
    List {
        #[arg(short, long, default_value = "all")]
        regulation: String,
        #[arg(short, long, default_value = "all")]
        priority: String,
    },
    /// Show the next five incomplete tasks
    Upcoming {
        #[arg(short, long, default_value = "all")]
        regulation: String,
        #[arg(short, long, default_value = "all")]
        priority: String,
    },
    /// Show dashboard counters
    Stats,
    /// Render a month grid
    Month {
        /// Year to show; defaults to the saved month cursor
        #[arg(long, requires = "month")]
        year: Option<i32>,
        /// Month to show, 1-12
        #[arg(long, requires = "year")]
        month: Option<u32>,
        /// Move the saved month cursor by this many months first
        #[arg(long, allow_hyphen_values = true, conflicts_with = "year")]
        shift: Option<i32>,
    },
    /// Show the tasks due on a day
    Day {
        /// Date as YYYY-MM-DD
        date: String,
    },
    /// Add a compliance task
    Add {
        title: String,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: String,
        #[arg(long)]
        regulation: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Toggle a task between pending and completed
    Toggle { id: u32 },
    /// Switch between light and dark theme
    Theme,
    /// Classify incomplete tasks into alerts and escalations
    Reminders {
        /// Evaluate as of this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
    /// Compute the quarterly return deadline for a submission date
    Deadline {
        /// Submission date as YYYY-MM-DD
        submitted: String,
    },
}

/// Initialize tracing. The server logs to stdout; CLI commands log to stderr
/// so stdout carries only their output.
fn init_tracing(serving: bool) {
    let default_filter = if serving {
        "compliance_calendar=info,tower_http=debug"
    } else {
        "compliance_calendar=warn"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    if serving {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn serve(session: CalendarSession, config: &AppConfig) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    let app = api::create_router_with_config(session, config.security.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Compliance calendar listening on http://{}", addr);
    if config.security.api_key.is_some() {
        tracing::info!("API key authentication enabled");
    }

    axum::serve(listener, app).await?;
    Ok(())
}

fn parse_date_arg(raw: &str) -> anyhow::Result<NaiveDate> {
    Ok(parse_due_date(raw)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let serving = matches!(cli.command, Some(Commands::Serve { .. }) | None);
    init_tracing(serving);

    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }

    // Quarterly deadlines need no stored state.
    if let Some(Commands::Deadline { submitted }) = &cli.command {
        let submitted = parse_date_arg(submitted)?;
        let deadline = quarterly_deadline(submitted).context("Deadline out of range")?;
        println!("Next due: {}", deadline.next_due);
        println!("Alert on: {}", deadline.alert_on);
        return Ok(());
    }

    let db = config.open_database()?;
    let now = Local::now().naive_local();
    let mut session = CalendarSession::open(db, now);

    match cli.command {
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(notice) = session.overdue_notice(now) {
                tracing::warn!("{}", notice.message);
            }
            serve(session, &config).await?;
        }
        None => serve(session, &config).await?,
        Some(Commands::List {
            regulation,
            priority,
        }) => {
            session.set_filter(TaskFilter::parse(&regulation, &priority)?);
            print!("{}", render::render_cards(&cards(&session.list_view(), now), true));
        }
        Some(Commands::Upcoming {
            regulation,
            priority,
        }) => {
            session.set_filter(TaskFilter::parse(&regulation, &priority)?);
            print!("{}", render::render_cards(&cards(&session.upcoming(), now), false));
            if let Some(notice) = session.overdue_notice(now) {
                println!("\n{}", notice.message);
            }
        }
        Some(Commands::Stats) => {
            print!("{}", render::render_stats(&session.stats(now)));
        }
        Some(Commands::Month { year, month, shift }) => {
            let grid = match (year, month) {
                (Some(year), Some(month)) => {
                    let month0 = month
                        .checked_sub(1)
                        .ok_or(CalendarError::InvalidMonth { year, month })?;
                    month_grid(session.tasks(), year, month0, now.date())?
                }
                _ => {
                    if let Some(shift) = shift {
                        session.change_month(shift);
                        session.save()?;
                    }
                    session.month_grid(now.date())?
                }
            };
            print!("{}", render::render_month(&grid));
        }
        Some(Commands::Day { date }) => {
            let date = parse_date_arg(&date)?;
            println!("{}", session.day_detail(date).message.trim_end());
        }
        Some(Commands::Add {
            title,
            due,
            regulation,
            priority,
            description,
            tags,
        }) => {
            let input =
                CreateTaskInput::from_form(&title, &description, &due, &priority, &regulation, &tags)?;
            let task = session.add_task(input)?;
            println!("Task added successfully! (#{})", task.id);
        }
        Some(Commands::Toggle { id }) => match session.toggle_completed(id)? {
            Some(task) => {
                let state = if task.completed { "completed" } else { "pending" };
                println!("Task #{} is now {}", task.id, state);
            }
            None => println!("No task with id {}", id),
        },
        Some(Commands::Theme) => {
            let theme = session.toggle_theme()?;
            println!("Theme: {}", theme.as_str());
        }
        Some(Commands::Reminders { today }) => {
            let today = match today {
                Some(raw) => parse_date_arg(&raw)?,
                None => now.date(),
            };
            let reminders = session.reminders(today);
            if reminders.is_empty() {
                println!("No reminders due on {}.", today);
            }
            for reminder in reminders {
                println!(
                    "[{}] #{} {} (due {}) -> notify {}",
                    reminder.level.as_str(),
                    reminder.task_id,
                    reminder.title,
                    reminder.due_on,
                    reminder.level.audience()
                );
            }
        }
        // Answered before storage was opened.
        Some(Commands::Deadline { .. }) => {}
    }

    Ok(())
}
