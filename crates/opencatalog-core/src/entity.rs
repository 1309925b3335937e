use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity kinds managed by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    Group,
    Package,
    Resource,
    ResourceView,
    Activity,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::User => "user",
            EntityType::Group => "group",
            EntityType::Package => "package",
            EntityType::Resource => "resource",
            EntityType::ResourceView => "resource_view",
            EntityType::Activity => "activity",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(EntityType::User),
            "group" => Ok(EntityType::Group),
            "package" | "dataset" => Ok(EntityType::Package),
            "resource" => Ok(EntityType::Resource),
            "resource_view" => Ok(EntityType::ResourceView),
            "activity" => Ok(EntityType::Activity),
            _ => Err(CoreError::invalid_entity_type(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_roundtrip() {
        for ty in [
            EntityType::User,
            EntityType::Group,
            EntityType::Package,
            EntityType::Resource,
            EntityType::ResourceView,
            EntityType::Activity,
        ] {
            assert_eq!(ty.as_str().parse::<EntityType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_dataset_alias() {
        assert_eq!("dataset".parse::<EntityType>().unwrap(), EntityType::Package);
    }

    #[test]
    fn test_unknown_entity_type() {
        let err = "widget".parse::<EntityType>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidEntityType(_)));
    }

    #[test]
    fn test_serde_representation() {
        let json = serde_json::to_string(&EntityType::ResourceView).unwrap();
        assert_eq!(json, "\"resource_view\"");
    }
}
