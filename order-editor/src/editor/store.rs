//! Snapshot store — owned state container with atomic replacement
//!
//! Holds exactly one "order being edited" at a time (single editing
//! focus) and notifies observers with the new order value on every
//! replacement. Created at application start and injected where it is
//! needed instead of living as ambient global state.

use parking_lot::RwLock;
use shared::order::{EditEvent, OrderSnapshot};
use tokio::sync::broadcast;

use super::state::{EditPhase, EditorState};

/// Event channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 256;

pub struct SnapshotStore {
    state: RwLock<EditorState>,
    event_tx: broadcast::Sender<EditEvent>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(EditorState::default()),
            event_tx,
        }
    }

    /// Current snapshot, if an order is selected.
    pub fn current(&self) -> Option<OrderSnapshot> {
        self.state.read().snapshot.clone()
    }

    /// Current phase.
    pub fn phase(&self) -> EditPhase {
        self.state.read().phase
    }

    /// Unsaved edits pending.
    pub fn is_dirty(&self) -> bool {
        self.state.read().dirty
    }

    /// Subscribe to edit events (the UI notification surface).
    pub fn subscribe(&self) -> broadcast::Receiver<EditEvent> {
        self.event_tx.subscribe()
    }

    /// Run one transition under the write lock: the read-modify-write
    /// is atomic with respect to interleaved transitions.
    pub(crate) fn transition<T>(&self, f: impl FnOnce(&mut EditorState) -> T) -> T {
        let mut state = self.state.write();
        f(&mut state)
    }

    /// Broadcast an event to all observers.
    pub(crate) fn notify(&self, event: EditEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("edit event dropped: no active observers");
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
