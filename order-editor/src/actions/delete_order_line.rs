//! DeleteOrderLine transition — remove a line by id

use shared::order::OrderSnapshot;

use crate::editor::EditError;
use crate::money::recalculate_totals;

/// Remove the line identified by `line_id` and recompute totals.
/// Deleting the last line leaves an empty sequence and a zero total.
pub fn delete_order_line(
    snapshot: &OrderSnapshot,
    line_id: &str,
) -> Result<OrderSnapshot, EditError> {
    if snapshot.line_position(line_id).is_none() {
        return Err(EditError::LineNotFound(line_id.to_string()));
    }

    let mut updated = snapshot.clone();
    updated.lines.retain(|line| line.line_id != line_id);

    let mut updated = recalculate_totals(&updated);
    updated.touch();

    Ok(updated)
}
