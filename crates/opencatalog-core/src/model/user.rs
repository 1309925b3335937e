use crate::generate_id;
use crate::time::{CatalogDateTime, now_utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque account secret.
///
/// Hashing is delegated to the surrounding platform; this type only
/// guarantees the secret never leaks through `Debug` output or into
/// serialized user representations.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(plain: impl Into<String>) -> Self {
        Self(plain.into())
    }

    /// Checks a candidate secret against the stored one.
    pub fn matches(&self, candidate: &str) -> bool {
        !self.0.is_empty() && self.0 == candidate
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// A registered catalog user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    pub email: String,
    #[serde(skip, default)]
    pub password: Password,
    #[serde(skip, default)]
    pub apikey: String,
    #[serde(skip, default)]
    pub reset_key: Option<String>,
    #[serde(default)]
    pub sysadmin: bool,
    pub created: CatalogDateTime,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: Password) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            fullname: None,
            about: None,
            email: email.into(),
            password,
            apikey: generate_id(),
            reset_key: None,
            sysadmin: false,
            created: now_utc(),
        }
    }

    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = Some(fullname.into());
        self
    }

    pub fn as_sysadmin(mut self) -> Self {
        self.sysadmin = true;
        self
    }

    /// Replaces the API key and returns the new value.
    pub fn regenerate_apikey(&mut self) -> &str {
        self.apikey = generate_id();
        &self.apikey
    }
}
