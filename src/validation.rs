//! Query boundary: turns user-supplied text into a well-formed [`QueryKey`]

use crate::error::{AppError, Result};
use crate::models::{Dataset, FieldKind, QueryKey, ScalarValue};
use serde_json::Value;
use std::str::FromStr;

/// Parse a dataset name
pub fn parse_dataset(name: &str) -> Result<Dataset> {
    Dataset::from_str(name.trim()).map_err(|_| {
        AppError::Validation(format!(
            "unknown dataset '{}', expected one of: {}",
            name,
            Dataset::ALL.map(|d| d.to_string()).join(", ")
        ))
    })
}

/// Check that `field` is searchable in `dataset`, returning its catalogue name and type
pub fn validate_field(dataset: Dataset, field: &str) -> Result<(&'static str, FieldKind)> {
    dataset
        .canonical_field(field)
        .and_then(|name| dataset.field_kind(name).map(|kind| (name, kind)))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "unknown field '{}' for {}, expected one of: {}",
                field,
                dataset,
                dataset.fields().join(", ")
            ))
        })
}

/// Decode raw text as a JSON scalar, falling back to the text itself.
///
/// Whole-valued numbers become integers (`1.0` equals `1`); other numbers,
/// `null`, arrays and objects are kept as their raw text.
pub fn parse_value(raw: &str) -> ScalarValue {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Bool(b)) => ScalarValue::Bool(b),
        Ok(Value::String(s)) => ScalarValue::Str(s),
        Ok(Value::Number(n)) => match n.as_i64() {
            Some(i) => ScalarValue::Int(i),
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    ScalarValue::Int(f as i64)
                }
                _ => ScalarValue::Str(raw.to_string()),
            },
        },
        _ => ScalarValue::Str(raw.to_string()),
    }
}

/// Convert a parsed value to the type the field is indexed under.
///
/// Text fields take the input verbatim unless it is a JSON string literal.
/// `null` and the empty string both select unset integer fields.
fn coerce(value: ScalarValue, kind: FieldKind, raw: &str) -> Result<ScalarValue> {
    match (kind, value) {
        (FieldKind::Text, ScalarValue::Str(s)) => Ok(ScalarValue::Str(s)),
        (FieldKind::Text, _) => Ok(ScalarValue::Str(raw.to_string())),

        (FieldKind::Integer, _) if raw.trim() == "null" => Ok(ScalarValue::empty()),
        (FieldKind::Integer, ScalarValue::Int(n)) => Ok(ScalarValue::Int(n)),
        (FieldKind::Integer, ScalarValue::Str(s)) if s.trim().is_empty() => Ok(ScalarValue::empty()),
        (FieldKind::Integer, ScalarValue::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(ScalarValue::Int)
            .map_err(|_| AppError::Validation(format!("'{}' is not an integer", raw))),

        (FieldKind::Boolean, ScalarValue::Bool(b)) => Ok(ScalarValue::Bool(b)),
        (FieldKind::Boolean, ScalarValue::Str(s)) => match s.trim() {
            "true" => Ok(ScalarValue::Bool(true)),
            "false" => Ok(ScalarValue::Bool(false)),
            _ => Err(AppError::Validation(format!(
                "'{}' is not a boolean, expected true or false",
                raw
            ))),
        },

        (kind, _) => Err(AppError::Validation(format!(
            "'{}' does not match field type {}",
            raw, kind
        ))),
    }
}

/// Validate a (dataset, field, value) triple from user input and build its key
pub fn build_query(dataset: &str, field: &str, raw_value: &str) -> Result<QueryKey> {
    let dataset = parse_dataset(dataset)?;
    let (field, kind) = validate_field(dataset, field.trim())?;
    let value = coerce(parse_value(raw_value), kind, raw_value)?;

    Ok(QueryKey::new(dataset, field, value))
}
