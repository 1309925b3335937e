//! Payload field extraction and validation helpers.
//!
//! Payloads are sparse JSON objects. These helpers turn the loose shapes
//! into typed values and translate failures into field-level validation
//! errors before any action logic runs.

use crate::error::LogicError;
use opencatalog_core::validate_name;
use serde_json::Value;

/// A required, non-empty string field.
pub(crate) fn required_str(payload: &Value, field: &str) -> Result<String, LogicError> {
    match payload.get(field) {
        None | Some(Value::Null) => Err(LogicError::missing_value(field)),
        Some(Value::String(s)) if s.is_empty() => Err(LogicError::missing_value(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(LogicError::validation(field, "Must be a string")),
    }
}

/// An optional string field; present-but-not-a-string is an error.
pub(crate) fn optional_str(payload: &Value, field: &str) -> Result<Option<String>, LogicError> {
    match payload.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(LogicError::validation(field, "Must be a string")),
    }
}

/// An optional natural-key name field, checked against the naming rules.
pub(crate) fn optional_name(payload: &Value, field: &str) -> Result<Option<String>, LogicError> {
    match payload.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => {
            validate_name(s).map_err(|e| LogicError::validation(field, e.to_string()))?;
            Ok(Some(s.clone()))
        }
        Some(_) => Err(LogicError::validation(field, "Must be a string")),
    }
}

/// A required natural-key name field.
pub(crate) fn required_name(payload: &Value, field: &str) -> Result<String, LogicError> {
    optional_name(payload, field)?.ok_or_else(|| LogicError::missing_value(field))
}

/// A required list of non-empty strings.
pub(crate) fn required_str_list(payload: &Value, field: &str) -> Result<Vec<String>, LogicError> {
    let raw = match payload.get(field) {
        None | Some(Value::Null) => return Err(LogicError::missing_value(field)),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(LogicError::validation(field, "Must be a list of strings")),
    };
    raw.iter()
        .map(|item| match item {
            Value::String(s) if !s.is_empty() => Ok(s.clone()),
            _ => Err(LogicError::validation(field, "Must be a list of strings")),
        })
        .collect()
}
