use crate::fields::Field;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatastoreError {
    #[error("Unknown datastore resource: {resource_id}")]
    UnknownResource { resource_id: String },

    #[error("Invalid identifier: {identifier}")]
    InvalidIdentifier { identifier: String },

    #[error("Statement execution failed: {message}")]
    Execution { message: String },
}

impl DatastoreError {
    pub fn unknown_resource(resource_id: impl Into<String>) -> Self {
        Self::UnknownResource {
            resource_id: resource_id.into(),
        }
    }

    pub fn invalid_identifier(identifier: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
        }
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}

/// A DDL statement with named bind parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<(String, String)>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Execution boundary towards the actual datastore database.
///
/// `fields` reports the columns of the table backing a resource so index
/// generation can pick the textual ones; `execute` runs one statement.
pub trait DatastoreConnection {
    fn fields(&self, resource_id: &str) -> Result<Vec<Field>, DatastoreError>;

    fn execute(&mut self, statement: &Statement) -> Result<(), DatastoreError>;
}
