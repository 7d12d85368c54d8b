//! AddOrderLine transition — append a fresh empty line

use shared::order::{OrderLine, OrderSnapshot};

use crate::money::recalculate_totals;

/// Append a new empty line (fresh local id, zero quantity, price and
/// value, creation timestamp). The new line is not validated until it
/// is first edited; totals are recomputed to keep the sum invariant
/// mechanical.
pub fn add_order_line(snapshot: &OrderSnapshot) -> OrderSnapshot {
    let mut updated = snapshot.clone();
    updated.lines.push(OrderLine::empty());

    let mut updated = recalculate_totals(&updated);
    updated.touch();
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_line_to_empty_order() {
        let order = OrderSnapshot::new_draft();

        let updated = add_order_line(&order);

        assert_eq!(updated.lines.len(), 1);
        let line = &updated.lines[0];
        assert_eq!(line.quantity, 0);
        assert_eq!(line.unit_price, 0.0);
        assert_eq!(line.line_value, 0.0);
        assert!(line.errors.is_clean());
        assert_eq!(updated.order_total, 0.0);
    }

    #[test]
    fn test_new_line_appends_after_existing_lines() {
        let order = add_order_line(&OrderSnapshot::new_draft());
        let first_id = order.lines[0].line_id.clone();

        let updated = add_order_line(&order);

        assert_eq!(updated.lines.len(), 2);
        assert_eq!(updated.lines[0].line_id, first_id);
        assert_ne!(updated.lines[1].line_id, first_id);
    }

    #[test]
    fn test_input_snapshot_never_mutated() {
        let order = OrderSnapshot::new_draft();
        let before = order.clone();

        add_order_line(&order);

        assert_eq!(order, before);
    }
}
