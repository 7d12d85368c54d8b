use shared::order::FieldError;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Edit transition errors
#[derive(Debug, Error)]
pub enum EditError {
    /// Fetch by id missed
    #[error("order not found: {0}")]
    NotFound(String),

    /// Edit targeted a line id absent from the snapshot. This is a
    /// contract violation on the caller's side: the transition aborts
    /// and the snapshot stays untouched.
    #[error("order line not found: {0}")]
    LineNotFound(String),

    /// Edit or save issued with no order selected
    #[error("no order is being edited")]
    NoOrderSelected,

    /// Unknown field or type-mismatched value in a field change
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Soft failure: blocks save only, never editing. Carries the
    /// number of messages attached across the header and lines.
    #[error("order has {0} validation error(s)")]
    ValidationFailed(usize),

    /// The gateway rejected a fetch for a reason other than a miss
    #[error("fetch failed: {0}")]
    FetchFailed(#[source] GatewayError),

    /// Persistence rejected the save; the snapshot and its unsaved
    /// edits are preserved
    #[error("save failed: {0}")]
    SaveFailed(#[source] GatewayError),
}
