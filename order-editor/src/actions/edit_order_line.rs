//! EditOrderLine transition — set one field on one line

use serde_json::Value;
use shared::order::OrderSnapshot;

use crate::editor::EditError;
use crate::money::recalculate_totals;
use crate::validation::{Schema, line_errors};

/// Set one field on the line identified by `line_id`, recompute totals
/// and re-validate that line against the line schema.
///
/// A line id absent from the snapshot is a contract violation: the
/// transition fails with [`EditError::LineNotFound`] and the input is
/// untouched.
pub fn edit_order_line(
    snapshot: &OrderSnapshot,
    line_id: &str,
    field: &str,
    value: &Value,
    schema: &Schema,
) -> Result<OrderSnapshot, EditError> {
    let position = snapshot
        .line_position(line_id)
        .ok_or_else(|| EditError::LineNotFound(line_id.to_string()))?;

    let mut updated = snapshot.clone();
    updated.lines[position].set_field(field, value)?;

    let mut updated = recalculate_totals(&updated);
    let errors = line_errors(&updated.lines[position], schema);
    updated.lines[position].errors = errors;
    updated.touch();

    Ok(updated)
}
