use crate::calendar::local_today;
use crate::state::AppState;
use chrono::NaiveDate;
use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::error;

/// Owns the one-second tick and the rollover poll. Both tasks stop when
/// the scheduler is shut down or dropped.
pub struct Scheduler {
    ticker: JoinHandle<()>,
    rollover: JoinHandle<()>,
}

impl Scheduler {
    pub fn spawn(state: AppState, tick_interval: Duration, rollover_poll: Duration) -> Self {
        Self::spawn_with_clock(state, tick_interval, rollover_poll, local_today)
    }

    /// Like [`Scheduler::spawn`] with a custom source for the current day.
    pub fn spawn_with_clock(
        state: AppState,
        tick_interval: Duration,
        rollover_poll: Duration,
        today: fn() -> NaiveDate,
    ) -> Self {
        let ticker = tokio::spawn(run_ticker(state.clone(), tick_interval));
        let rollover = tokio::spawn(run_rollover(state, rollover_poll, today));
        Self { ticker, rollover }
    }

    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.ticker.abort();
        self.rollover.abort();
    }
}

async fn run_ticker(state: AppState, period: Duration) {
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;

        let mut tracker = state.tracker.lock().await;
        let outcome = tracker.tick();
        for reminder in &outcome.due {
            state.notifier.break_due(*reminder);
        }
        if outcome.worked {
            if let Err(err) = state.commit_today(&tracker).await {
                error!("failed to persist tick: {}", err.message);
                state.save_state(&tracker).await;
            }
        }
    }
}

async fn run_rollover(state: AppState, period: Duration, today: fn() -> NaiveDate) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;

        let mut tracker = state.tracker.lock().await;
        if tracker.check_rollover(today()) {
            if let Err(err) = state.commit_today(&tracker).await {
                error!("failed to persist rollover: {}", err.message);
                state.save_state(&tracker).await;
            }
        }
    }
}
