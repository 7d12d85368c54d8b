//! Order domain types
//!
//! - **snapshot**: the order under edit (header + lines + derived totals)
//! - **types**: line items, product references, field changes and errors
//! - **command**: the `EditCommand` sum type consumed by the dispatcher
//! - **event**: notifications emitted on every snapshot replacement

pub mod command;
pub mod event;
pub mod snapshot;
pub mod types;

pub use command::EditCommand;
pub use event::EditEvent;
pub use snapshot::OrderSnapshot;
pub use types::{FieldChange, FieldError, FieldErrors, OrderLine, ProductRef};
