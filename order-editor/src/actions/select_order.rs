//! SelectOrder post-fetch preparation

use shared::order::OrderSnapshot;

use crate::validation::{Schema, validate_order_deep};

/// Prepare a freshly loaded order for editing: run initial validation
/// over the header and every line, with totals recomputed so stored
/// values are never trusted as input. Also used when a pushed persisted
/// copy replaces the snapshot.
pub fn prepare_loaded_order(
    order: &OrderSnapshot,
    order_schema: &Schema,
    line_schema: &Schema,
) -> OrderSnapshot {
    validate_order_deep(order, order_schema, line_schema)
}
