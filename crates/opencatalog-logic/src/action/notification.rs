use crate::context::Context;
use crate::dispatch::CatalogActions;
use crate::error::LogicError;
use async_trait::async_trait;
use opencatalog_storage::CatalogStorage;
use serde_json::{Value, json};

/// Delivery backend for activity-stream email notifications.
///
/// The action layer decides *whether* notifications may be sent (auth and
/// configuration gates); the sender decides *how*. The default sender
/// delivers nothing, which keeps tests and deployments without a mail
/// relay working.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Sends whatever notifications are pending and returns how many
    /// went out.
    async fn dispatch_pending(&self, storage: &dyn CatalogStorage) -> Result<u64, LogicError>;
}

/// A sender that delivers nothing.
#[derive(Debug, Default)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn dispatch_pending(&self, _storage: &dyn CatalogStorage) -> Result<u64, LogicError> {
        Ok(0)
    }
}

impl CatalogActions {
    /// Flushes pending activity email notifications.
    ///
    /// Only callable by the system itself (an internal context or one
    /// bypassing auth). Fails validation when email notifications are
    /// disabled in the configuration.
    pub async fn send_email_notifications(
        &self,
        ctx: &Context,
        _payload: Value,
    ) -> Result<Value, LogicError> {
        if !(ctx.ignore_auth || ctx.internal) {
            return Err(LogicError::NotAuthorized);
        }
        if !self.config.activity.email_notifications {
            return Err(LogicError::validation(
                "activity",
                "Email notifications are not enabled in the configuration",
            ));
        }

        let sent = self
            .notifier
            .dispatch_pending(self.storage.as_ref())
            .await?;
        tracing::info!(sent, "dispatched email notifications");
        Ok(json!({ "sent": sent }))
    }
}
