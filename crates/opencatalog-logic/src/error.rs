use opencatalog_storage::StorageError;
use std::fmt;
use thiserror::Error;

/// One failed field in a validation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors surfaced at the action dispatch boundary.
///
/// Every failure aborts the whole action; nothing is persisted on error.
#[derive(Debug, Error)]
pub enum LogicError {
    /// A referenced entity could not be resolved by id or natural key.
    #[error("Not found: {what} {id}")]
    NotFound { what: String, id: String },

    /// The payload failed validation before any state was touched.
    #[error("Validation failed: {}", format_field_errors(.errors))]
    Validation { errors: Vec<FieldError> },

    /// The acting user may not perform this action.
    #[error("Action not authorized")]
    NotAuthorized,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LogicError {
    pub fn not_found(what: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            id: id.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![FieldError {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    pub fn missing_value(field: impl Into<String>) -> Self {
        Self::validation(field, "Missing value")
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    #[must_use]
    pub fn is_not_authorized(&self) -> bool {
        matches!(self, Self::NotAuthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencatalog_core::EntityType;

    #[test]
    fn test_not_found_display() {
        let err = LogicError::not_found("user", "fred");
        assert_eq!(err.to_string(), "Not found: user fred");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_display_joins_fields() {
        let err = LogicError::Validation {
            errors: vec![
                FieldError {
                    field: "name".into(),
                    message: "Missing value".into(),
                },
                FieldError {
                    field: "email".into(),
                    message: "Missing value".into(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Validation failed: name: Missing value; email: Missing value"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_storage_error_passthrough() {
        let err: LogicError = StorageError::not_found(EntityType::Group, "g1").into();
        assert_eq!(err.to_string(), "Entity not found: group/g1");
        assert!(!err.is_not_found());
    }
}
