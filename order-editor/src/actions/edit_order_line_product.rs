//! EditOrderLineProduct transition — fill a line from a catalog pick

use shared::order::{OrderSnapshot, ProductRef};

use crate::editor::EditError;
use crate::money::recalculate_totals;
use crate::validation::{Schema, line_errors};

/// Copy product id, description and unit price from a catalog pick onto
/// the line identified by `line_id`, recompute totals and re-validate
/// that line.
pub fn edit_order_line_product(
    snapshot: &OrderSnapshot,
    line_id: &str,
    product: &ProductRef,
    schema: &Schema,
) -> Result<OrderSnapshot, EditError> {
    let position = snapshot
        .line_position(line_id)
        .ok_or_else(|| EditError::LineNotFound(line_id.to_string()))?;

    let mut updated = snapshot.clone();
    updated.lines[position].apply_product(product);

    let mut updated = recalculate_totals(&updated);
    let errors = line_errors(&updated.lines[position], schema);
    updated.lines[position].errors = errors;
    updated.touch();

    Ok(updated)
}
