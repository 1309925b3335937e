use crate::error::LogicError;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Extra payload validation plugged in through the call context.
///
/// Runs before the action's own schema checks; callers use this to layer
/// site-specific rules onto the default validation.
pub trait PayloadValidator: Send + Sync {
    fn validate(&self, payload: &Value) -> Result<(), LogicError>;
}

impl<F> PayloadValidator for F
where
    F: Fn(&Value) -> Result<(), LogicError> + Send + Sync,
{
    fn validate(&self, payload: &Value) -> Result<(), LogicError> {
        self(payload)
    }
}

/// Per-call execution context for actions.
#[derive(Clone)]
pub struct Context {
    /// Name of the acting user, if any.
    pub user: Option<String>,
    /// Skip authorization checks. Defaults to true, matching direct
    /// (trusted, in-process) invocation; API plumbing sets it to false.
    pub ignore_auth: bool,
    /// Set for system-initiated invocations (CLI, scheduled jobs).
    pub internal: bool,
    /// Optional custom payload validation.
    pub validator: Option<Arc<dyn PayloadValidator>>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            user: None,
            ignore_auth: true,
            internal: false,
            validator: None,
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_ignore_auth(mut self, ignore_auth: bool) -> Self {
        self.ignore_auth = ignore_auth;
        self
    }

    pub fn as_internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn PayloadValidator>) -> Self {
        self.validator = Some(validator);
        self
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("user", &self.user)
            .field("ignore_auth", &self.ignore_auth)
            .field("internal", &self.internal)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}
