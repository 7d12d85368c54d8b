//! Edit events - notifications emitted on every snapshot replacement

use serde::{Deserialize, Serialize};

use super::snapshot::OrderSnapshot;

/// Notification broadcast to observers (the UI re-render surface).
///
/// Every variant that replaces the snapshot carries the new order value
/// under the single canonical name `order`, validation-error maps
/// included, so observers can render inline errors directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditEvent {
    /// An order was loaded (or a new draft started)
    OrderSelected { order: OrderSnapshot },
    /// An edit transition replaced the snapshot
    OrderEdited { order: OrderSnapshot },
    /// An upsert is in flight
    SaveStarted { order_id: String },
    /// The upsert was accepted; the snapshot itself is refreshed by the
    /// persistence change notification, not by this event
    SaveCompleted { order_id: String },
    /// The upsert was rejected; the snapshot and its unsaved edits are
    /// preserved
    SaveFailed { order_id: String, message: String },
    /// A fresher persisted copy replaced the snapshot
    SnapshotRefreshed { order: OrderSnapshot },
    /// The editing focus was dropped
    EditorCleared,
}
