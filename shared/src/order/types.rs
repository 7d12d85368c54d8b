//! Line items, field changes and validation error maps

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation errors, attached to the entity they describe.
///
/// Keys are field names, values the ordered list of human-readable
/// messages. An absent key (or an empty list) means the field is
/// currently valid. A validation run fully replaces the previous map.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message under a field key.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages for one field (empty slice when valid).
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// No field currently carries an error.
    pub fn is_clean(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Total number of messages across all fields.
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Fields that currently carry at least one error.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, msgs)| !msgs.is_empty())
            .map(|(field, _)| field.as_str())
    }
}

/// Rejected dynamic field application.
///
/// Unknown fields and type-mismatched values are contract violations on
/// the command surface: the transition aborts and the snapshot stays
/// untouched. Soft constraint failures go through validation instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> FieldError {
    FieldError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

pub(crate) fn as_optional_text(field: &str, value: &Value) -> Result<Option<String>, FieldError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(invalid(field, "expected a string")),
    }
}

pub(crate) fn as_integer(field: &str, value: &Value) -> Result<i64, FieldError> {
    value
        .as_i64()
        .ok_or_else(|| invalid(field, "expected an integer"))
}

pub(crate) fn as_quantity(field: &str, value: &Value) -> Result<i32, FieldError> {
    let n = as_integer(field, value)?;
    i32::try_from(n).map_err(|_| invalid(field, "out of range"))
}

pub(crate) fn as_money(field: &str, value: &Value) -> Result<f64, FieldError> {
    let n = value
        .as_f64()
        .ok_or_else(|| invalid(field, "expected a number"))?;
    if !n.is_finite() {
        return Err(invalid(field, "must be a finite number"));
    }
    Ok(n)
}

/// Catalog projection handed over when the user picks a product for a
/// line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRef {
    pub product_id: i64,
    pub name: String,
    pub price: f64,
}

/// One `{name, value}` header change from the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub name: String,
    pub value: Value,
}

impl FieldChange {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One line item within an order.
///
/// `line_value` is derived from `quantity` and `unit_price` by the
/// totals engine and is never trusted as authoritative input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Line id: generated locally for new lines, stable once persisted
    pub line_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: f64,
    /// Derived: quantity × unit_price
    pub line_value: f64,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Field-level validation errors
    #[serde(default, skip_serializing_if = "FieldErrors::is_clean")]
    pub errors: FieldErrors,
}

impl OrderLine {
    /// Fresh empty line: no product, zero quantity, price and value.
    pub fn empty() -> Self {
        Self {
            line_id: crate::util::new_entity_id(),
            product_id: None,
            description: None,
            quantity: 0,
            unit_price: 0.0,
            line_value: 0.0,
            created_at: crate::util::now_millis(),
            errors: FieldErrors::new(),
        }
    }

    /// Apply one dynamic field change.
    ///
    /// `line_value` is derived and not directly editable.
    pub fn set_field(&mut self, field: &str, value: &Value) -> Result<(), FieldError> {
        match field {
            "product_id" => self.product_id = Some(as_integer(field, value)?),
            "description" => self.description = as_optional_text(field, value)?,
            "quantity" => self.quantity = as_quantity(field, value)?,
            "unit_price" => self.unit_price = as_money(field, value)?,
            "line_value" => {
                return Err(invalid(field, "derived from quantity and unit_price"));
            }
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }

    /// Copy product identity, description and unit price from a catalog
    /// pick.
    pub fn apply_product(&mut self, product: &ProductRef) {
        self.product_id = Some(product.product_id);
        self.description = Some(product.name.clone());
        self.unit_price = product.price;
    }
}
