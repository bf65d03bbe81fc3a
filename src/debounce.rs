use crate::storage::JsonStore;
use serde::Serialize;
use serde_json::Value;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;
use tokio::{sync::Mutex, task::JoinHandle, time};
use tracing::{debug, error};

#[derive(Default)]
struct Slot {
    pending: Option<Value>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

/// Coalesces rapid writes to one storage key into a single write after a
/// quiet period. At most one write is pending at a time; scheduling again
/// replaces its payload and restarts the quiet period.
///
/// Writes happen while the slot is locked, so a write that has started is
/// never cancelled and writes never overlap.
#[derive(Clone)]
pub struct DebouncedWriter {
    store: JsonStore,
    key: &'static str,
    delay: Duration,
    slot: Arc<Mutex<Slot>>,
    writes: Arc<AtomicU64>,
}

impl DebouncedWriter {
    pub fn new(store: JsonStore, key: &'static str, delay: Duration) -> Self {
        Self {
            store,
            key,
            delay,
            slot: Arc::new(Mutex::new(Slot::default())),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn schedule<T: Serialize>(&self, payload: &T) {
        let value = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(err) => {
                error!("failed to serialize {}: {err}", self.key);
                return;
            }
        };

        let mut slot = self.slot.lock().await;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.pending = Some(value);
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;

        let writer = self.clone();
        slot.timer = Some(tokio::spawn(async move {
            time::sleep(writer.delay).await;
            let mut slot = writer.slot.lock().await;
            if slot.generation != generation {
                return;
            }
            slot.timer = None;
            writer.write_pending(&mut slot).await;
        }));
    }

    /// Writes the pending payload now, if there is one.
    pub async fn flush(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        self.write_pending(&mut slot).await;
    }

    #[cfg(test)]
    pub(crate) async fn has_pending(&self) -> bool {
        self.slot.lock().await.pending.is_some()
    }

    #[cfg(test)]
    pub(crate) fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    async fn write_pending(&self, slot: &mut Slot) {
        let Some(value) = slot.pending.take() else {
            return;
        };
        match self.store.persist(self.key, &value).await {
            Ok(()) => {
                self.writes.fetch_add(1, Ordering::Relaxed);
                debug!(key = self.key, "debounced write flushed");
            }
            Err(err) => error!("failed to write {}: {}", self.key, err.message),
        }
    }
}
