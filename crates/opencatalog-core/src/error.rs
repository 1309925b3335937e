use thiserror::Error;

/// Errors raised while parsing the core entity types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    #[error("Invalid timestamp: {0}")]
    InvalidDateTime(String),
}

impl CoreError {
    pub fn invalid_entity_type(entity_type: impl Into<String>) -> Self {
        Self::InvalidEntityType(entity_type.into())
    }

    pub fn invalid_date_time(datetime: impl Into<String>) -> Self {
        Self::InvalidDateTime(datetime.into())
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
