use crate::calendar::local_today;
use crate::config::AppConfig;
use crate::debounce::DebouncedWriter;
use crate::errors::AppError;
use crate::notify::{LogNotifier, Notifier};
use crate::snapshot::{HISTORY_KEY, STATE_KEY};
use crate::storage::JsonStore;
use crate::tracker::{Restored, Tracker};
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::info;

/// Shared handle to the widget. The tracker mutex is the single writer:
/// user actions, ticks and rollover checks each run to completion under it.
#[derive(Clone)]
pub struct AppState {
    pub store: JsonStore,
    pub tracker: Arc<Mutex<Tracker>>,
    pub state_writer: DebouncedWriter,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        store: JsonStore,
        tracker: Tracker,
        debounce: Duration,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            state_writer: DebouncedWriter::new(store.clone(), STATE_KEY, debounce),
            store,
            tracker: Arc::new(Mutex::new(tracker)),
            notifier,
        }
    }

    /// Restores the widget from storage for the current local day.
    pub async fn load(store: JsonStore, config: &AppConfig) -> Self {
        let snapshot = store.load_state().await;
        let ledger = store.load_history().await;
        let days = ledger.len();
        let (tracker, restored) = Tracker::restore(snapshot, ledger, local_today());

        match restored {
            Restored::Resumed => info!(day = %tracker.today().day_key, days, "resumed today's progress"),
            Restored::Fresh => info!(day = %tracker.today().day_key, days, "starting a fresh day"),
        }

        Self::new(store, tracker, config.debounce, Arc::new(LogNotifier))
    }

    /// Persists after today's record changed: the ledger is written
    /// immediately, the rest of the state is debounced.
    pub async fn commit_today(&self, tracker: &Tracker) -> Result<(), AppError> {
        self.store.persist(HISTORY_KEY, tracker.ledger()).await?;
        self.save_state(tracker).await;
        Ok(())
    }

    /// Persists a change that did not touch today's record.
    pub async fn save_state(&self, tracker: &Tracker) {
        self.state_writer.schedule(&tracker.snapshot()).await;
        self.notifier.reschedule(&tracker.notification_schedule());
    }

    pub async fn flush(&self) {
        self.state_writer.flush().await;
    }
}
