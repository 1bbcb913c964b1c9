mod handlers;
mod middleware;

use std::sync::{Arc, Mutex};

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::calendar::CalendarSession;

pub use handlers::{FilterOptions, SessionSnapshot, ShiftInput, ViewInput};
pub use middleware::SecurityConfig;

/// One session shared by all requests; the lock serializes them the way a
/// single browser tab serializes its event callbacks.
pub type SharedSession = Arc<Mutex<CalendarSession>>;

pub fn create_router(session: CalendarSession) -> Router {
    create_router_with_config(session, SecurityConfig::disabled())
}

pub fn create_router_with_config(session: CalendarSession, config: SecurityConfig) -> Router {
    let protected = Router::new()
        // Tasks
        .route("/tasks", get(handlers::list_tasks))
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/upcoming", get(handlers::upcoming_tasks))
        .route("/tasks/{id}/toggle", post(handlers::toggle_task))
        .route("/stats", get(handlers::get_stats))
        // Selectors
        .route("/filters", get(handlers::get_filters))
        .route("/filters", put(handlers::set_filters))
        .route("/view", put(handlers::set_view))
        // Month grid
        .route("/calendar", get(handlers::get_calendar))
        .route("/calendar/shift", post(handlers::shift_calendar))
        .route("/calendar/{year}/{month}/{day}", get(handlers::get_day))
        // Session
        .route("/theme/toggle", post(handlers::toggle_theme))
        .route("/state", get(handlers::get_state))
        .route("/reminders", get(handlers::get_reminders))
        .route_layer(from_fn_with_state(config.clone(), middleware::auth_middleware));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected);

    let state: SharedSession = Arc::new(Mutex::new(session));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(config.cors_layer()),
        )
        .with_state(state)
}
