//! Activity-stream records emitted alongside mutating actions.
//!
//! Every successful update action appends one `Activity` describing who
//! changed what and when. Listing order (newest first) is a storage query
//! concern, not encoded here.

use crate::generate_id;
use crate::time::{CatalogDateTime, now_utc};
use serde::{Deserialize, Serialize};

/// One entry in the activity stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    /// The user the change is attributed to.
    pub user_id: String,
    /// The entity that was changed.
    pub object_id: String,
    /// Well-known activity kind, e.g. "changed user".
    pub activity_type: String,
    pub timestamp: CatalogDateTime,
    /// Optional snapshot of the changed entity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Activity {
    pub fn new(
        activity_type: impl Into<String>,
        user_id: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_id(),
            user_id: user_id.into(),
            object_id: object_id.into(),
            activity_type: activity_type.into(),
            timestamp: now_utc(),
            data: None,
        }
    }

    pub fn changed_user(user_id: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self::new("changed user", user_id, object_id)
    }

    pub fn changed_group(user_id: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self::new("changed group", user_id, object_id)
    }

    pub fn new_group(user_id: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self::new("new group", user_id, object_id)
    }

    pub fn new_package(user_id: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self::new("new package", user_id, object_id)
    }

    pub fn changed_package(user_id: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self::new("changed package", user_id, object_id)
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_activity_type() {
        assert_eq!(Activity::changed_user("u", "o").activity_type, "changed user");
        assert_eq!(
            Activity::changed_group("u", "o").activity_type,
            "changed group"
        );
        assert_eq!(Activity::new_package("u", "o").activity_type, "new package");
    }

    #[test]
    fn test_serialization_omits_empty_data() {
        let activity = Activity::changed_user("u1", "u1");
        let json = serde_json::to_value(&activity).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["activity_type"], "changed user");
        assert!(json["timestamp"].is_string());
    }
}
