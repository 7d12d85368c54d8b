//! EditOrder transition — apply header field changes

use shared::order::{FieldChange, OrderSnapshot};

use crate::editor::EditError;
use crate::validation::{Schema, order_errors};

/// Apply each `{name, value}` change to a clone of the snapshot, then
/// re-validate the header against the order schema. An unknown field or
/// type-mismatched value fails the whole transition; the input snapshot
/// is untouched either way.
pub fn edit_order(
    snapshot: &OrderSnapshot,
    changes: &[FieldChange],
    schema: &Schema,
) -> Result<OrderSnapshot, EditError> {
    let mut updated = snapshot.clone();

    for change in changes {
        updated.set_field(&change.name, &change.value)?;
    }

    let errors = order_errors(&updated, schema);
    updated.errors = errors;
    updated.touch();

    Ok(updated)
}
