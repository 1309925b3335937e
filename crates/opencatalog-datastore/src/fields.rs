use serde::{Deserialize, Serialize};

/// Column types supported by datastore tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Timestamp,
    Bool,
    Json,
}

impl FieldType {
    /// Only textual columns get their own full-text index.
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::Text)
    }
}

/// A column of a datastore table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            field_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_text_is_textual() {
        assert!(FieldType::Text.is_textual());
        assert!(!FieldType::Number.is_textual());
        assert!(!FieldType::Json.is_textual());
    }

    #[test]
    fn test_field_serde_uses_type_key() {
        let field = Field::new("foo", FieldType::Text);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["id"], "foo");
        assert_eq!(json["type"], "text");
    }
}
