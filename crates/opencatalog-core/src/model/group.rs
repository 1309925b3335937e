use crate::generate_id;
use crate::time::{CatalogDateTime, now_utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single key/value pair as it appears in group payloads and dictized
/// output. Stored on the aggregate as an ordered mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    pub key: String,
    pub value: String,
}

/// The group aggregate: a named collection of member users, owned
/// packages, nested sub-groups and free-form extras.
///
/// Relations hold ids of the related entities. `users` is ordered
/// (membership order is meaningful in dictized output); `packages` and
/// `groups` carry set semantics but keep insertion order for stable
/// output. `extras` is an insertion-ordered mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub extras: IndexMap<String, String>,
    pub created: CatalogDateTime,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            title: None,
            description: None,
            users: Vec::new(),
            packages: Vec::new(),
            groups: Vec::new(),
            extras: IndexMap::new(),
            created: now_utc(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Extras in insertion order as `{key, value}` pairs.
    pub fn extras_list(&self) -> Vec<Extra> {
        self.extras
            .iter()
            .map(|(key, value)| Extra {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_has_empty_relations() {
        let group = Group::new("science");
        assert!(group.users.is_empty());
        assert!(group.packages.is_empty());
        assert!(group.groups.is_empty());
        assert!(group.extras.is_empty());
    }

    #[test]
    fn test_extras_list_preserves_insertion_order() {
        let mut group = Group::new("science");
        group.extras.insert("key_2".into(), "b".into());
        group.extras.insert("key_1".into(), "a".into());

        let keys: Vec<_> = group.extras_list().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["key_2", "key_1"]);
    }
}
