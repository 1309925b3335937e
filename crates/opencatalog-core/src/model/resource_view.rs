use crate::generate_id;
use serde::{Deserialize, Serialize};

/// A configured rendering of a resource (table, chart, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceView {
    pub id: String,
    pub resource_id: String,
    pub view_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ResourceView {
    pub fn new(resource_id: impl Into<String>, view_type: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            resource_id: resource_id.into(),
            view_type: view_type.into(),
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
