use std::sync::MutexGuard;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::SharedSession;
use crate::calendar::projection::cards;
use crate::calendar::{CalendarSession, DayDetail, MonthGrid, Notice, TaskCard, TaskStats};
use crate::error::CalendarError;
use crate::models::*;
use crate::reminders::Reminder;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Validation errors go back to the client as 400; anything else is logged
/// and reported as a generic 500.
fn api_error(e: CalendarError) -> (StatusCode, String) {
    if e.is_validation() {
        tracing::warn!("Validation error: {}", e);
        return (StatusCode::BAD_REQUEST, e.to_string());
    }

    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn lock(session: &SharedSession) -> ApiResult<MutexGuard<'_, CalendarSession>> {
    session.lock().map_err(|_| {
        tracing::error!("Calendar session lock poisoned");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    })
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

// ============================================================
// Request / Response Types
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewInput {
    pub view: ViewMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftInput {
    /// Months to move the cursor; negative moves back.
    pub months: i32,
}

/// Active filter plus every selectable value, so clients never hard-code the
/// regulation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptions {
    pub active: TaskFilter,
    pub regulations: Vec<Regulation>,
    pub priorities: Vec<Priority>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub theme: Theme,
    pub view: ViewMode,
    pub filter: TaskFilter,
    #[serde(with = "timestamp")]
    pub current_date: NaiveDateTime,
    pub stats: TaskStats,
    pub notice: Option<Notice>,
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Tasks
// ============================================================

pub async fn list_tasks(State(session): State<SharedSession>) -> ApiResult<Json<Vec<TaskCard>>> {
    let session = lock(&session)?;
    Ok(Json(cards(&session.list_view(), now())))
}

pub async fn upcoming_tasks(
    State(session): State<SharedSession>,
) -> ApiResult<Json<Vec<TaskCard>>> {
    let session = lock(&session)?;
    Ok(Json(cards(&session.upcoming(), now())))
}

pub async fn create_task(
    State(session): State<SharedSession>,
    Json(input): Json<CreateTaskInput>,
) -> ApiResult<(StatusCode, Json<ComplianceTask>)> {
    let mut session = lock(&session)?;
    session
        .add_task(input)
        .map(|task| (StatusCode::CREATED, Json(task)))
        .map_err(api_error)
}

pub async fn toggle_task(
    State(session): State<SharedSession>,
    Path(id): Path<u32>,
) -> ApiResult<Json<ComplianceTask>> {
    let mut session = lock(&session)?;
    session
        .toggle_completed(id)
        .map_err(api_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Task not found".to_string()))
}

pub async fn get_stats(State(session): State<SharedSession>) -> ApiResult<Json<TaskStats>> {
    let session = lock(&session)?;
    Ok(Json(session.stats(now())))
}

// ============================================================
// Selectors
// ============================================================

pub async fn get_filters(State(session): State<SharedSession>) -> ApiResult<Json<FilterOptions>> {
    let session = lock(&session)?;
    Ok(Json(FilterOptions {
        active: session.filter(),
        regulations: Regulation::ALL.to_vec(),
        priorities: Priority::ALL.to_vec(),
    }))
}

pub async fn set_filters(
    State(session): State<SharedSession>,
    Json(filter): Json<TaskFilter>,
) -> ApiResult<Json<TaskFilter>> {
    let mut session = lock(&session)?;
    session.set_filter(filter);
    tracing::debug!("Filter set to {:?}", filter);
    Ok(Json(session.filter()))
}

pub async fn set_view(
    State(session): State<SharedSession>,
    Json(input): Json<ViewInput>,
) -> ApiResult<StatusCode> {
    let mut session = lock(&session)?;
    session.set_view(input.view);
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Month Grid
// ============================================================

pub async fn get_calendar(State(session): State<SharedSession>) -> ApiResult<Json<MonthGrid>> {
    let session = lock(&session)?;
    session.month_grid(now().date()).map(Json).map_err(api_error)
}

pub async fn shift_calendar(
    State(session): State<SharedSession>,
    Json(input): Json<ShiftInput>,
) -> ApiResult<Json<MonthGrid>> {
    let mut session = lock(&session)?;
    session.change_month(input.months);
    session.month_grid(now().date()).map(Json).map_err(api_error)
}

/// `month` is 1-based in the URL.
pub async fn get_day(
    State(session): State<SharedSession>,
    Path((year, month, day)): Path<(i32, u32, u32)>,
) -> ApiResult<Json<DayDetail>> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        api_error(CalendarError::InvalidDate(format!(
            "{year:04}-{month:02}-{day:02}"
        )))
    })?;
    let session = lock(&session)?;
    Ok(Json(session.day_detail(date)))
}

// ============================================================
// Session
// ============================================================

pub async fn toggle_theme(
    State(session): State<SharedSession>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut session = lock(&session)?;
    let theme = session.toggle_theme().map_err(api_error)?;
    Ok(Json(serde_json::json!({ "theme": theme })))
}

pub async fn get_state(State(session): State<SharedSession>) -> ApiResult<Json<SessionSnapshot>> {
    let session = lock(&session)?;
    let now = now();
    Ok(Json(SessionSnapshot {
        theme: session.theme(),
        view: session.view(),
        filter: session.filter(),
        current_date: session.current_date(),
        stats: session.stats(now),
        notice: session.overdue_notice(now),
    }))
}

pub async fn get_reminders(State(session): State<SharedSession>) -> ApiResult<Json<Vec<Reminder>>> {
    let session = lock(&session)?;
    Ok(Json(session.reminders(now().date())))
}
