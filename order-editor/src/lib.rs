//! Order edit engine
//!
//! State machine for editing a commercial order (header + line items):
//! load an order, apply field and line edits without touching the
//! persisted copy, recompute derived totals after every edit, validate
//! against injected schemas, and gate saves on the result.
//!
//! - **money**: totals engine (line values and order total)
//! - **validation**: schema-descriptor validation engine
//! - **actions**: pure per-command snapshot transitions
//! - **editor**: dispatcher, snapshot store and error taxonomy
//! - **gateway**: persistence boundary (fetch/upsert/change feed)
//!
//! # Architecture
//!
//! ```text
//! EditCommand → OrderEditor → actions (pure) → new OrderSnapshot
//!                   ↓                               ↓
//!             OrderGateway                    SnapshotStore
//!             (fetch/upsert)                        ↓
//!                   ↓                       EditEvent broadcast
//!          change notifications ──────────→ reconciliation
//! ```
//!
//! # Data Flow
//!
//! 1. The UI dispatches an [`EditCommand`]
//! 2. The [`OrderEditor`] checks the phase precondition
//! 3. A pure transition clones the snapshot and applies the edit
//! 4. Totals are recomputed and validation re-run
//! 5. The new snapshot is swapped in atomically
//! 6. An [`EditEvent`] with the new order value is broadcast
//! 7. Saves go through the [`OrderGateway`]; the snapshot is refreshed
//!    by the gateway's change notification, not by the save result

pub mod actions;
pub mod editor;
pub mod gateway;
pub mod logger;
pub mod money;
pub mod validation;

// Re-exports
pub use editor::{EditError, EditPhase, EditorState, OrderEditor, SnapshotStore};
pub use gateway::{CollectionChange, GatewayError, MemoryGateway, OrderGateway};
pub use validation::{Rule, Schema, order_line_schema, order_schema};

// Re-export shared types for convenience
pub use shared::order::{
    EditCommand, EditEvent, FieldChange, FieldError, FieldErrors, OrderLine, OrderSnapshot,
    ProductRef,
};
