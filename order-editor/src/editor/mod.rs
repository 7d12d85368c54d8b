//! OrderEditor — the edit transition dispatcher
//!
//! Accepts a user intent, applies it against the current snapshot using
//! the totals and validation engines, and produces the next snapshot
//! (or a save request). Transitions run one at a time against the
//! single editing focus; the store's write lock makes each
//! clone-then-replace atomic with respect to interleaved transitions.
//!
//! # Command Flow
//!
//! ```text
//! dispatch(cmd)
//!     ├─ 1. Check phase precondition
//!     ├─ 2. Apply pure transition (actions) to a clone
//!     ├─ 3. Swap the snapshot atomically
//!     └─ 4. Broadcast EditEvent to observers
//! ```
//!
//! Saves suspend on the gateway call with the lock released, so
//! editing continues while an upsert is in flight. The save result
//! never refreshes the snapshot; the gateway change notification does.

mod error;
mod state;
mod store;

pub use error::EditError;
pub use state::{EditPhase, EditorState};
pub use store::SnapshotStore;

use std::sync::Arc;

use serde_json::Value;
use shared::order::{EditCommand, EditEvent, FieldChange, OrderSnapshot, ProductRef};
use tokio::sync::broadcast;

use crate::actions;
use crate::gateway::{CollectionChange, GatewayError, OrderGateway};
use crate::validation::{Schema, validate_order_deep};

/// Outcome of the pre-save gate, decided under the state lock.
enum SaveGate {
    /// Validation errors found; the checked snapshot was swapped in
    Blocked { order: OrderSnapshot, errors: usize },
    /// Clean; the upsert may proceed
    Ready {
        order: OrderSnapshot,
        order_id: String,
        revision: u64,
    },
}

/// The edit state machine over one order at a time.
///
/// Owns the snapshot store, talks to persistence through the injected
/// [`OrderGateway`], and validates against the injected schema
/// descriptors.
pub struct OrderEditor {
    store: Arc<SnapshotStore>,
    gateway: Arc<dyn OrderGateway>,
    order_schema: Schema,
    line_schema: Schema,
}

impl std::fmt::Debug for OrderEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEditor")
            .field("phase", &self.store.phase())
            .field("dirty", &self.store.is_dirty())
            .finish()
    }
}

impl OrderEditor {
    /// Create an editor over a gateway with injected schemas.
    pub fn new(gateway: Arc<dyn OrderGateway>, order_schema: Schema, line_schema: Schema) -> Self {
        Self {
            store: Arc::new(SnapshotStore::new()),
            gateway,
            order_schema,
            line_schema,
        }
    }

    /// Create an editor with the default schema descriptors.
    pub fn with_default_schemas(gateway: Arc<dyn OrderGateway>) -> Self {
        Self::new(
            gateway,
            crate::validation::order_schema(),
            crate::validation::order_line_schema(),
        )
    }

    /// The snapshot store (read access and event subscription).
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Current snapshot, if an order is selected.
    pub fn current(&self) -> Option<OrderSnapshot> {
        self.store.current()
    }

    /// Subscribe to edit events (the UI notification surface).
    pub fn subscribe(&self) -> broadcast::Receiver<EditEvent> {
        self.store.subscribe()
    }

    /// Route one command to its transition.
    pub async fn dispatch(&self, command: EditCommand) -> Result<(), EditError> {
        match command {
            EditCommand::SelectOrder { order_id } => {
                self.select_order(&order_id).await.map(drop)
            }
            EditCommand::SelectNewOrder => {
                self.select_new_order();
                Ok(())
            }
            EditCommand::EditOrder { changes } => self.edit_order(&changes).map(drop),
            EditCommand::EditOrderLine {
                line_id,
                field,
                value,
            } => self.edit_order_line(&line_id, &field, &value).map(drop),
            EditCommand::EditOrderLineProduct { line_id, product } => {
                self.edit_order_line_product(&line_id, &product).map(drop)
            }
            EditCommand::AddOrderLine => self.add_order_line().map(drop),
            EditCommand::DeleteOrderLine { line_id } => self.delete_order_line(&line_id).map(drop),
            EditCommand::SaveOrder => self.save_order().await.map(drop),
        }
    }

    /// Load an order for editing, replacing any current focus.
    ///
    /// The loaded order gets initial validation over the header and
    /// every line before it becomes the snapshot.
    pub async fn select_order(&self, order_id: &str) -> Result<OrderSnapshot, EditError> {
        tracing::debug!(order_id, "select order");

        let fetched = match self.gateway.fetch_by_id(order_id).await {
            Ok(order) => order,
            Err(GatewayError::NotFound(id)) => return Err(EditError::NotFound(id)),
            Err(cause) => return Err(EditError::FetchFailed(cause)),
        };

        let prepared = actions::prepare_loaded_order(&fetched, &self.order_schema, &self.line_schema);

        self.store.transition(|state| {
            state.phase = EditPhase::Editing;
            state.snapshot = Some(prepared.clone());
            state.dirty = false;
            state.revision += 1;
            state.pending_refresh = None;
        });
        self.store.notify(EditEvent::OrderSelected {
            order: prepared.clone(),
        });

        Ok(prepared)
    }

    /// Start a brand-new draft order (no id until first save).
    pub fn select_new_order(&self) -> OrderSnapshot {
        tracing::debug!("select new order");
        let draft = OrderSnapshot::new_draft();

        self.store.transition(|state| {
            state.phase = EditPhase::Editing;
            state.snapshot = Some(draft.clone());
            state.dirty = false;
            state.revision += 1;
            state.pending_refresh = None;
        });
        self.store.notify(EditEvent::OrderSelected {
            order: draft.clone(),
        });

        draft
    }

    /// Apply header field changes and re-validate the header.
    pub fn edit_order(&self, changes: &[FieldChange]) -> Result<OrderSnapshot, EditError> {
        tracing::debug!(count = changes.len(), "edit order header");
        self.apply_edit(|snapshot| actions::edit_order(snapshot, changes, &self.order_schema))
    }

    /// Set one field on one line, recompute totals and re-validate the
    /// line.
    pub fn edit_order_line(
        &self,
        line_id: &str,
        field: &str,
        value: &Value,
    ) -> Result<OrderSnapshot, EditError> {
        tracing::debug!(line_id, field, "edit order line");
        self.apply_edit(|snapshot| {
            actions::edit_order_line(snapshot, line_id, field, value, &self.line_schema)
        })
    }

    /// Fill a line from a catalog product pick.
    pub fn edit_order_line_product(
        &self,
        line_id: &str,
        product: &ProductRef,
    ) -> Result<OrderSnapshot, EditError> {
        tracing::debug!(line_id, product_id = product.product_id, "edit order line product");
        self.apply_edit(|snapshot| {
            actions::edit_order_line_product(snapshot, line_id, product, &self.line_schema)
        })
    }

    /// Append a fresh empty line.
    pub fn add_order_line(&self) -> Result<OrderSnapshot, EditError> {
        tracing::debug!("add order line");
        self.apply_edit(|snapshot| Ok(actions::add_order_line(snapshot)))
    }

    /// Remove a line by id and recompute totals.
    pub fn delete_order_line(&self, line_id: &str) -> Result<OrderSnapshot, EditError> {
        tracing::debug!(line_id, "delete order line");
        self.apply_edit(|snapshot| actions::delete_order_line(snapshot, line_id))
    }

    /// Persist the current snapshot.
    ///
    /// The full order is re-validated first; any error blocks the
    /// gateway call (no save-with-warnings) and the fresh error maps
    /// are attached so the UI can render them. On success the snapshot
    /// is not refreshed here — the gateway change notification does
    /// that — and `dirty` clears only if no edit raced in during the
    /// upsert. On failure the snapshot and its unsaved edits stay
    /// intact and the cause is surfaced.
    pub async fn save_order(&self) -> Result<String, EditError> {
        let gate = self.store.transition(|state| {
            if !state.can_edit() {
                return Err(EditError::NoOrderSelected);
            }
            let Some(snapshot) = state.snapshot.clone() else {
                return Err(EditError::NoOrderSelected);
            };

            let mut checked =
                validate_order_deep(&snapshot, &self.order_schema, &self.line_schema);
            let errors = checked.error_count();
            if errors > 0 {
                state.snapshot = Some(checked.clone());
                state.revision += 1;
                return Ok(SaveGate::Blocked {
                    order: checked,
                    errors,
                });
            }

            let order_id = match &checked.order_id {
                Some(id) => id.clone(),
                None => {
                    // First save of a draft: assign the identity now so
                    // the upsert has a stable key
                    let id = shared::util::new_entity_id();
                    checked.order_id = Some(id.clone());
                    id
                }
            };
            state.snapshot = Some(checked.clone());
            state.revision += 1;
            state.phase = EditPhase::Saving;
            Ok(SaveGate::Ready {
                order: checked,
                order_id,
                revision: state.revision,
            })
        })?;

        let (order, order_id, saved_revision) = match gate {
            SaveGate::Blocked { order, errors } => {
                tracing::debug!(errors, "save blocked by validation");
                self.store.notify(EditEvent::OrderEdited { order });
                return Err(EditError::ValidationFailed(errors));
            }
            SaveGate::Ready {
                order,
                order_id,
                revision,
            } => (order, order_id, revision),
        };

        tracing::info!(order_id = %order_id, total = order.order_total, "saving order");
        self.store.notify(EditEvent::SaveStarted {
            order_id: order_id.clone(),
        });

        match self.gateway.upsert(&order_id, &order).await {
            Ok(()) => {
                self.store.transition(|state| {
                    state.phase = EditPhase::Editing;
                    if state.revision == saved_revision {
                        state.dirty = false;
                    } else {
                        tracing::debug!(order_id = %order_id, "edits raced in during save; keeping dirty");
                    }
                });
                self.store.notify(EditEvent::SaveCompleted {
                    order_id: order_id.clone(),
                });
                self.apply_pending_refresh();
                Ok(order_id)
            }
            Err(cause) => {
                tracing::error!(order_id = %order_id, error = %cause, "save failed");
                self.store.transition(|state| {
                    state.phase = EditPhase::Editing;
                });
                self.store.notify(EditEvent::SaveFailed {
                    order_id,
                    message: cause.to_string(),
                });
                Err(EditError::SaveFailed(cause))
            }
        }
    }

    /// Drop the editing focus.
    pub fn clear(&self) {
        self.store.transition(|state| {
            *state = EditorState::default();
        });
        self.store.notify(EditEvent::EditorCleared);
    }

    /// Reconcile a pushed collection snapshot with the editing focus.
    ///
    /// The notification never blindly overwrites an in-progress edit: a
    /// clean focus is refreshed in place, a dirty focus defers the
    /// fresh copy until its edits are saved, and a draft with no id is
    /// left alone. A focused order absent from the pushed collection is
    /// also left alone (treated like a not-yet-persisted draft).
    pub fn handle_collection_changed(&self, change: CollectionChange) {
        let event = self.store.transition(|state| {
            let snapshot = state.snapshot.as_ref()?;
            let order_id = snapshot.order_id.clone()?;
            let fresh = change
                .orders
                .into_iter()
                .find(|order| order.order_id.as_deref() == Some(order_id.as_str()))?;

            let prepared =
                actions::prepare_loaded_order(&fresh, &self.order_schema, &self.line_schema);
            if state.dirty {
                tracing::debug!(order_id = %order_id, "deferring refresh: unsaved edits pending");
                state.pending_refresh = Some(prepared);
                None
            } else {
                state.snapshot = Some(prepared.clone());
                state.revision += 1;
                Some(EditEvent::SnapshotRefreshed { order: prepared })
            }
        });

        if let Some(event) = event {
            self.store.notify(event);
        }
    }

    /// Pump gateway change notifications into the reconciler. Each push
    /// carries the full collection, so a lagged receiver just picks up
    /// the next push.
    pub fn spawn_change_listener(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let editor = Arc::clone(self);
        let mut changes = editor.gateway.subscribe_to_changes();
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => editor.handle_collection_changed(change),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "change feed lagged; waiting for next push");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Apply a deferred persisted copy once no unsaved edits remain.
    fn apply_pending_refresh(&self) {
        let applied = self.store.transition(|state| {
            if state.dirty {
                return None;
            }
            let fresh = state.pending_refresh.take()?;
            state.snapshot = Some(fresh.clone());
            state.revision += 1;
            Some(fresh)
        });

        if let Some(order) = applied {
            self.store.notify(EditEvent::SnapshotRefreshed { order });
        }
    }

    /// Apply a pure transition to the current snapshot and swap the
    /// result in. Precondition: an order is selected; editing continues
    /// while a save is in flight.
    fn apply_edit(
        &self,
        f: impl FnOnce(&OrderSnapshot) -> Result<OrderSnapshot, EditError>,
    ) -> Result<OrderSnapshot, EditError> {
        let updated = self.store.transition(|state| {
            if !state.can_edit() {
                return Err(EditError::NoOrderSelected);
            }
            let Some(snapshot) = state.snapshot.as_ref() else {
                return Err(EditError::NoOrderSelected);
            };

            let updated = f(snapshot)?;
            state.snapshot = Some(updated.clone());
            state.dirty = true;
            state.revision += 1;
            Ok(updated)
        })?;

        self.store.notify(EditEvent::OrderEdited {
            order: updated.clone(),
        });
        Ok(updated)
    }
}
