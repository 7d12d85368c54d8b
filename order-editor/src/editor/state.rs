//! Editor state — the single editing focus

use shared::order::OrderSnapshot;

/// Dispatcher phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditPhase {
    /// No order selected
    #[default]
    Idle,
    /// A snapshot is loaded; zero or more unsaved edits applied
    Editing,
    /// An upsert is in flight (editing continues meanwhile)
    Saving,
}

/// The single "order being edited" slot plus transition bookkeeping.
///
/// `revision` bumps on every snapshot replacement; a save records the
/// revision it captured and only clears `dirty` if no edit raced in
/// while the upsert was in flight.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub phase: EditPhase,
    pub snapshot: Option<OrderSnapshot>,
    /// Unsaved local edits pending
    pub dirty: bool,
    pub revision: u64,
    /// Fresh persisted copy deferred while local edits are unsaved
    pub pending_refresh: Option<OrderSnapshot>,
}

impl EditorState {
    pub fn is_idle(&self) -> bool {
        self.phase == EditPhase::Idle
    }

    /// Edits are accepted while Editing and while a save is in flight.
    pub fn can_edit(&self) -> bool {
        matches!(self.phase, EditPhase::Editing | EditPhase::Saving)
    }
}
