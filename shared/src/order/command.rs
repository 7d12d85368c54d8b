//! Edit commands - one variant per user intent from the UI surface

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{FieldChange, ProductRef};

/// User intent consumed by the edit dispatcher.
///
/// This is the full command surface of the editor: selection, field and
/// line edits, and save. Each command produces a typed [`EditEvent`]
/// (or an error) when dispatched.
///
/// [`EditEvent`]: super::event::EditEvent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditCommand {
    /// Load an existing order for editing
    SelectOrder { order_id: String },
    /// Start a brand-new draft order
    SelectNewOrder,
    /// Apply header field changes
    EditOrder { changes: Vec<FieldChange> },
    /// Set one field on one line
    EditOrderLine {
        line_id: String,
        field: String,
        value: Value,
    },
    /// Fill a line from a catalog product pick
    EditOrderLineProduct {
        line_id: String,
        product: ProductRef,
    },
    /// Append a fresh empty line
    AddOrderLine,
    /// Remove a line by id
    DeleteOrderLine { line_id: String },
    /// Persist the current snapshot
    SaveOrder,
}
