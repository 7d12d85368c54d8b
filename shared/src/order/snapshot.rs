//! Order snapshot - the order under edit
//!
//! Snapshots are values: every transition clones the current snapshot,
//! mutates the clone and swaps it in atomically, so no two snapshots
//! ever share structure with each other or with the persisted copy.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{self, FieldError, FieldErrors, OrderLine};

/// The order currently under edit: header fields, ordered line items
/// and derived totals, plus field-level validation errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    /// Order id; assigned at first save (a draft has none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Line items in sequence order
    pub lines: Vec<OrderLine>,
    /// Derived: sum of line values in sequence order
    pub order_total: f64,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Last edit timestamp
    pub updated_at: i64,
    /// Header field validation errors
    #[serde(default, skip_serializing_if = "FieldErrors::is_clean")]
    pub errors: FieldErrors,
}

impl OrderSnapshot {
    /// Empty skeleton for a brand-new order: no id, no lines, zero
    /// total, creation timestamp set.
    pub fn new_draft() -> Self {
        let now = crate::util::now_millis();
        Self {
            order_id: None,
            customer_name: None,
            reference: None,
            note: None,
            lines: Vec::new(),
            order_total: 0.0,
            created_at: now,
            updated_at: now,
            errors: FieldErrors::new(),
        }
    }

    /// Apply one dynamic header change.
    ///
    /// Identity, timestamps and derived totals are not settable.
    pub fn set_field(&mut self, field: &str, value: &Value) -> Result<(), FieldError> {
        match field {
            "customer_name" => self.customer_name = types::as_optional_text(field, value)?,
            "reference" => self.reference = types::as_optional_text(field, value)?,
            "note" => self.note = types::as_optional_text(field, value)?,
            "order_id" | "order_total" | "created_at" | "updated_at" => {
                return Err(FieldError::InvalidValue {
                    field: field.to_string(),
                    reason: "not editable".to_string(),
                });
            }
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }

    /// Locate a line by id.
    pub fn line(&self, line_id: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|line| line.line_id == line_id)
    }

    /// Position of a line in the sequence.
    pub fn line_position(&self, line_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.line_id == line_id)
    }

    /// Total validation messages across the header and every line.
    pub fn error_count(&self) -> usize {
        self.errors.total()
            + self
                .lines
                .iter()
                .map(|line| line.errors.total())
                .sum::<usize>()
    }

    /// Header and all lines currently valid.
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// Record an edit on the header clock.
    pub fn touch(&mut self) {
        self.updated_at = crate::util::now_millis();
    }
}
