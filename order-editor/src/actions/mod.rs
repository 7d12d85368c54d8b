//! Pure snapshot transitions
//!
//! One module per edit command. Each transition takes the current
//! snapshot by reference and returns a fresh value; the input is never
//! mutated, even when the transition fails. All gateway I/O stays in
//! the editor — these functions are the pure core of the state machine.

mod add_order_line;
mod delete_order_line;
mod edit_order;
mod edit_order_line;
mod edit_order_line_product;
mod select_order;

pub use add_order_line::add_order_line;
pub use delete_order_line::delete_order_line;
pub use edit_order::edit_order;
pub use edit_order_line::edit_order_line;
pub use edit_order_line_product::edit_order_line_product;
pub use select_order::prepare_loaded_order;
