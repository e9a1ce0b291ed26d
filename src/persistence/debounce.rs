//! Debounced expansion-state writer.
//!
//! Every [`DebouncedSaver::schedule`] re-arms a trailing timer; the state is
//! written once the window passes without another call. [`DebouncedSaver::flush`]
//! writes a pending save immediately; [`DebouncedSaver::discard`] drops it and
//! deletes the stored value.

use super::PreferenceStore;
use crate::error::StorageError;
use crate::store::ExpansionState;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Default)]
struct Pending {
    generation: u64,
    armed: bool,
    timer: Option<JoinHandle<()>>,
}

struct SaverInner {
    store: Arc<dyn PreferenceStore>,
    key: String,
    state: Arc<RwLock<ExpansionState>>,
    window: Duration,
    pending: Mutex<Pending>,
    // Serializes writes against flush and discard.
    io: Mutex<()>,
}

impl SaverInner {
    fn write(&self) -> Result<(), StorageError> {
        let json = self.state.read().to_json()?;
        self.store.save(&self.key, &json)?;
        debug!(key = %self.key, bytes = json.len(), "Persisted expansion state");
        Ok(())
    }

    fn write_best_effort(&self) {
        if let Err(e) = self.write() {
            warn!(key = %self.key, error = %e, "Failed to persist expansion state");
        }
    }
}

/// Owns the debounce timer for one expansion state.
#[derive(Clone)]
pub struct DebouncedSaver {
    inner: Arc<SaverInner>,
}

impl DebouncedSaver {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        key: &str,
        state: Arc<RwLock<ExpansionState>>,
        window: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(SaverInner {
                store,
                key: key.to_string(),
                state,
                window,
                pending: Mutex::new(Pending::default()),
                io: Mutex::new(()),
            }),
        }
    }

    /// Request a save. Outside a Tokio runtime the write happens immediately.
    pub fn schedule(&self) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                let _io = self.inner.io.lock();
                self.disarm();
                self.inner.write_best_effort();
                return;
            }
        };

        let mut pending = self.inner.pending.lock();
        pending.generation += 1;
        pending.armed = true;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }

        let inner = Arc::clone(&self.inner);
        let generation = pending.generation;
        pending.timer = Some(handle.spawn(async move {
            tokio::time::sleep(inner.window).await;
            let _io = inner.io.lock();
            {
                let mut pending = inner.pending.lock();
                if !pending.armed || pending.generation != generation {
                    return;
                }
                pending.armed = false;
                pending.timer = None;
            }
            inner.write_best_effort();
        }));
    }

    /// Whether a save is waiting for its quiet window.
    pub fn is_pending(&self) -> bool {
        self.inner.pending.lock().armed
    }

    /// Write a pending save now. Returns whether anything was written.
    pub fn flush(&self) -> Result<bool, StorageError> {
        let _io = self.inner.io.lock();
        if !self.disarm() {
            return Ok(false);
        }
        self.inner.write()?;
        Ok(true)
    }

    /// Drop any pending save, empty the state and delete the stored value.
    ///
    /// A timer that already fired either finishes its write before this runs
    /// or finds itself disarmed, so the key is not recreated afterwards.
    pub fn discard(&self) -> Result<(), StorageError> {
        let _io = self.inner.io.lock();
        self.disarm();
        self.inner.state.write().clear();
        self.inner.store.remove(&self.inner.key)
    }

    fn disarm(&self) -> bool {
        let mut pending = self.inner.pending.lock();
        pending.generation += 1;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        std::mem::replace(&mut pending.armed, false)
    }
}
