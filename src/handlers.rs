use crate::errors::AppError;
use crate::ledger::Ledger;
use crate::models::{
    Activity, ActivityRequest, DetailRequest, DismissRequest, StatsResponse, TodayResponse,
    WaterAction, WaterRequest,
};
use crate::notify::{NotificationSchedule, Reminder};
use crate::settings::{Settings, SettingsPatch};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::tracker::Tracker;
use axum::{Json, extract::State};

pub async fn get_today(State(state): State<AppState>) -> Json<TodayResponse> {
    let tracker = state.tracker.lock().await;
    Json(tracker.today_view())
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let tracker = state.tracker.lock().await;
    Json(build_stats(&tracker))
}

pub async fn get_history(State(state): State<AppState>) -> Json<Ledger> {
    let tracker = state.tracker.lock().await;
    Json(tracker.ledger().clone())
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    let tracker = state.tracker.lock().await;
    Json(tracker.settings().clone())
}

pub async fn get_notifications(State(state): State<AppState>) -> Json<NotificationSchedule> {
    let tracker = state.tracker.lock().await;
    Json(tracker.notification_schedule())
}

pub async fn add_water(
    State(state): State<AppState>,
    Json(payload): Json<WaterRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    let action = WaterAction::parse(&payload.action)
        .ok_or_else(|| AppError::bad_request("action must be 'add' or 'remove'"))?;

    apply_today(&state, |tracker| tracker.add_water(action)).await
}

pub async fn complete_activity(
    State(state): State<AppState>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    let activity = Activity::parse(&payload.kind).ok_or_else(|| {
        AppError::bad_request(
            "kind must be one of 'eye_break', 'stretch', 'wake_routine', 'sleep_routine'",
        )
    })?;

    apply_today(&state, |tracker| tracker.complete(activity)).await
}

pub async fn record_detail(
    State(state): State<AppState>,
    Json(payload): Json<DetailRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    let group = payload.group.trim();
    let exercise = payload.exercise.trim();
    if group.is_empty() || exercise.is_empty() {
        return Err(AppError::bad_request("group and exercise must not be empty"));
    }

    apply_today(&state, |tracker| tracker.record_detail(group, exercise)).await
}

pub async fn pause(State(state): State<AppState>) -> Json<TodayResponse> {
    apply_state(&state, Tracker::pause).await
}

pub async fn resume(State(state): State<AppState>) -> Json<TodayResponse> {
    apply_state(&state, Tracker::resume).await
}

pub async fn dismiss_reminder(
    State(state): State<AppState>,
    Json(payload): Json<DismissRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    let reminder = Reminder::parse(&payload.kind)
        .ok_or_else(|| AppError::bad_request("kind must be 'eye_break' or 'stretch'"))?;

    Ok(apply_state(&state, |tracker| {
        tracker.dismiss(reminder);
    })
    .await)
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Json<Settings> {
    let mut tracker = state.tracker.lock().await;
    tracker.update_settings(patch);
    state.save_state(&tracker).await;
    Json(tracker.settings().clone())
}

/// Runs a change to today's record and persists history and state.
/// The change is made on a copy and only kept once history is written.
async fn apply_today(
    state: &AppState,
    change: impl FnOnce(&mut Tracker),
) -> Result<Json<TodayResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let mut next = tracker.clone();
    change(&mut next);
    state.commit_today(&next).await?;
    *tracker = next;
    Ok(Json(tracker.today_view()))
}

/// Runs a change that leaves today's record alone.
async fn apply_state(state: &AppState, change: impl FnOnce(&mut Tracker)) -> Json<TodayResponse> {
    let mut tracker = state.tracker.lock().await;
    change(&mut *tracker);
    state.save_state(&tracker).await;
    Json(tracker.today_view())
}
