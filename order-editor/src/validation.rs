//! Schema-driven field validation
//!
//! The schema descriptor is injected data, not owned: a list of
//! per-field constraints evaluated against the entity's current values.
//! Failures append human-readable messages under the field key, and a
//! validation run fully replaces the entity's previous error map, so
//! errors clear as soon as the offending field is edited back to a
//! valid value. Line errors live on the line; they never roll up into
//! the order's own map.

use serde_json::Value;
use shared::order::{FieldErrors, OrderLine, OrderSnapshot};

use crate::money::{MAX_QUANTITY, MAX_UNIT_PRICE};

// ── Text length limits ──────────────────────────────────────────────

/// Names: customer, product description, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: order reference, etc.
pub const MAX_REFERENCE_LEN: usize = 100;

/// Notes and other free text
pub const MAX_NOTE_LEN: usize = 500;

/// One constraint on a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Present, non-null and (for text) non-blank
    Required,
    /// Maximum text length in characters
    MaxLen(usize),
    /// Minimum numeric value (inclusive)
    Min(f64),
    /// Maximum numeric value (inclusive)
    Max(f64),
    /// Numeric value must not be negative
    NonNegative,
}

/// Constraint list for one field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field: String,
    pub rules: Vec<Rule>,
}

/// Ordered set of field constraints for one entity kind.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field with its constraints (builder style).
    pub fn field(mut self, name: &str, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldSpec {
            field: name.to_string(),
            rules,
        });
        self
    }
}

fn check_rule(rule: &Rule, field: &str, value: Option<&Value>, errors: &mut FieldErrors) {
    match rule {
        Rule::Required => {
            let missing = match value {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if missing {
                errors.add(field, format!("{field} must not be empty"));
            }
        }
        Rule::MaxLen(max) => {
            if let Some(Value::String(s)) = value
                && s.len() > *max
            {
                errors.add(
                    field,
                    format!("{field} is too long ({} chars, max {max})", s.len()),
                );
            }
        }
        Rule::Min(min) => {
            if let Some(n) = value.and_then(Value::as_f64)
                && n < *min
            {
                errors.add(field, format!("{field} must be at least {min}"));
            }
        }
        Rule::Max(max) => {
            if let Some(n) = value.and_then(Value::as_f64)
                && n > *max
            {
                errors.add(field, format!("{field} must be at most {max}"));
            }
        }
        Rule::NonNegative => {
            if let Some(n) = value.and_then(Value::as_f64)
                && n < 0.0
            {
                errors.add(field, format!("{field} must be non-negative"));
            }
        }
    }
}

fn validate_doc(doc: &serde_json::Map<String, Value>, schema: &Schema) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for spec in &schema.fields {
        let value = doc.get(&spec.field);
        for rule in &spec.rules {
            check_rule(rule, &spec.field, value, &mut errors);
        }
    }
    errors
}

fn project(entity: &impl serde::Serialize) -> serde_json::Map<String, Value> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(doc)) => doc,
        _ => serde_json::Map::new(),
    }
}

/// Errors for an order header against a schema.
pub fn order_errors(snapshot: &OrderSnapshot, schema: &Schema) -> FieldErrors {
    validate_doc(&project(snapshot), schema)
}

/// Errors for one line against a schema.
pub fn line_errors(line: &OrderLine, schema: &Schema) -> FieldErrors {
    validate_doc(&project(line), schema)
}

/// Validate an order header, returning a new snapshot with the header
/// error map replaced. Lines are not touched here.
pub fn validate_order(snapshot: &OrderSnapshot, schema: &Schema) -> OrderSnapshot {
    let mut updated = snapshot.clone();
    updated.errors = order_errors(&updated, schema);
    updated
}

/// Validate one line, returning a new line with its error map replaced.
pub fn validate_line(line: &OrderLine, schema: &Schema) -> OrderLine {
    let mut updated = line.clone();
    updated.errors = line_errors(&updated, schema);
    updated
}

/// Validate an order and every line, with totals recomputed first so
/// stored line values are never trusted as input.
pub fn validate_order_deep(
    snapshot: &OrderSnapshot,
    order_schema: &Schema,
    line_schema: &Schema,
) -> OrderSnapshot {
    let mut updated = crate::money::recalculate_totals(snapshot);
    updated.errors = order_errors(&updated, order_schema);
    let line_error_maps: Vec<FieldErrors> = updated
        .lines
        .iter()
        .map(|line| line_errors(line, line_schema))
        .collect();
    for (line, errors) in updated.lines.iter_mut().zip(line_error_maps) {
        line.errors = errors;
    }
    updated
}

/// Default order header schema, used when the application does not
/// inject its own descriptor.
pub fn order_schema() -> Schema {
    Schema::new()
        .field(
            "customer_name",
            vec![Rule::Required, Rule::MaxLen(MAX_NAME_LEN)],
        )
        .field("reference", vec![Rule::MaxLen(MAX_REFERENCE_LEN)])
        .field("note", vec![Rule::MaxLen(MAX_NOTE_LEN)])
}

/// Default order line schema.
pub fn order_line_schema() -> Schema {
    Schema::new()
        .field("product_id", vec![Rule::Required])
        .field(
            "description",
            vec![Rule::Required, Rule::MaxLen(MAX_NAME_LEN)],
        )
        .field(
            "quantity",
            vec![Rule::Min(1.0), Rule::Max(MAX_QUANTITY as f64)],
        )
        .field(
            "unit_price",
            vec![Rule::NonNegative, Rule::Max(MAX_UNIT_PRICE)],
        )
}
