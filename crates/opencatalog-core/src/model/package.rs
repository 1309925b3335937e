use crate::generate_id;
use crate::time::{CatalogDateTime, now_utc};
use serde::{Deserialize, Serialize};

/// A file or endpoint attached to a package. Order within the owning
/// package is meaningful and controlled by `package_resource_reorder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            url: url.into(),
            format: None,
            description: None,
        }
    }
}

/// A dataset: the unit of publication in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    pub created: CatalogDateTime,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            title: None,
            resources: Vec::new(),
            created: now_utc(),
        }
    }

    pub fn with_resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = resources;
        self
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }
}
