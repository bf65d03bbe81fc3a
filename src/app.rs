use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/today", get(handlers::get_today))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/history", get(handlers::get_history))
        .route("/api/water", post(handlers::add_water))
        .route("/api/activity", post(handlers::complete_activity))
        .route("/api/details", post(handlers::record_detail))
        .route("/api/pause", post(handlers::pause))
        .route("/api/resume", post(handlers::resume))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/api/notifications", get(handlers::get_notifications))
        .route("/api/reminders/dismiss", post(handlers::dismiss_reminder))
        .with_state(state)
}
