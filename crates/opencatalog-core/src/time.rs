use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// RFC 3339 timestamp used throughout catalog records and activity entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CatalogDateTime(pub OffsetDateTime);

impl CatalogDateTime {
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }

    pub fn inner(&self) -> &OffsetDateTime {
        &self.0
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }
}

impl fmt::Display for CatalogDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for CatalogDateTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let datetime = OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339)
            .map_err(|e| {
                CoreError::invalid_date_time(format!("Failed to parse timestamp '{s}': {e}"))
            })?;
        Ok(CatalogDateTime(datetime))
    }
}

impl Serialize for CatalogDateTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self
            .0
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for CatalogDateTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CatalogDateTime::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub fn now_utc() -> CatalogDateTime {
    CatalogDateTime(OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_display() {
        let dt = CatalogDateTime::new(datetime!(2023-05-15 14:30:00 UTC));
        assert_eq!(dt.to_string(), "2023-05-15T14:30:00Z");
    }

    #[test]
    fn test_from_str() {
        let dt = CatalogDateTime::from_str("2023-05-15T14:30:00Z").unwrap();
        assert_eq!(dt.0, datetime!(2023-05-15 14:30:00 UTC));
    }

    #[test]
    fn test_from_str_with_offset() {
        let dt = CatalogDateTime::from_str("2023-05-15T14:30:00+02:00").unwrap();
        assert_eq!(
            dt.0.to_offset(time::UtcOffset::UTC),
            datetime!(2023-05-15 12:30:00 UTC)
        );
    }

    #[test]
    fn test_from_str_invalid() {
        assert!(CatalogDateTime::from_str("not-a-date").is_err());
        assert!(CatalogDateTime::from_str("2023-13-01T00:00:00Z").is_err());
        assert!(CatalogDateTime::from_str("").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let dt = CatalogDateTime::new(datetime!(2023-05-15 14:30:00 UTC));
        let json = serde_json::to_string(&dt).unwrap();
        assert_eq!(json, "\"2023-05-15T14:30:00Z\"");
        let back: CatalogDateTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dt);
    }

    #[test]
    fn test_ordering() {
        let a = CatalogDateTime::new(datetime!(2023-05-15 14:30:00 UTC));
        let b = CatalogDateTime::new(datetime!(2023-05-15 14:30:01 UTC));
        assert!(a < b);
    }

    #[test]
    fn test_now_utc_monotonic_enough() {
        let a = now_utc();
        let b = now_utc();
        assert!((b.0 - a.0).whole_seconds() < 1);
    }
}
