//! Shared types for the order edit engine
//!
//! Serializable domain types used by both the editor engine and any
//! front end: order snapshots, line items, the edit command surface and
//! the notification events emitted on every snapshot replacement.

pub mod order;
pub mod util;

// Re-exports
pub use order::{
    EditCommand, EditEvent, FieldChange, FieldError, FieldErrors, OrderLine, OrderSnapshot,
    ProductRef,
};
