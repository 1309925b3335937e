use crate::action::{NoopNotificationSender, NotificationSender};
use crate::context::Context;
use crate::error::LogicError;
use opencatalog_config::CatalogConfig;
use opencatalog_storage::CatalogStorage;
use serde_json::Value;
use std::sync::Arc;

/// The action layer: every update operation of the catalog, callable both
/// as typed methods and through the string-keyed [`CatalogActions::call`]
/// boundary.
pub struct CatalogActions {
    pub(crate) storage: Arc<dyn CatalogStorage>,
    pub(crate) config: CatalogConfig,
    pub(crate) notifier: Arc<dyn NotificationSender>,
}

impl CatalogActions {
    pub fn new(storage: Arc<dyn CatalogStorage>, config: CatalogConfig) -> Self {
        Self {
            storage,
            config,
            notifier: Arc::new(NoopNotificationSender),
        }
    }

    pub fn with_notification_sender(mut self, notifier: Arc<dyn NotificationSender>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn storage(&self) -> &Arc<dyn CatalogStorage> {
        &self.storage
    }

    /// Dispatches an action by name.
    ///
    /// Runs the context's custom payload validator (if any) first, then
    /// routes to the typed handler. Unknown action names fail with
    /// `NotFound`.
    pub async fn call(
        &self,
        name: &str,
        ctx: &Context,
        payload: Value,
    ) -> Result<Value, LogicError> {
        if let Some(validator) = &ctx.validator {
            validator.validate(&payload)?;
        }
        tracing::debug!(action = name, "dispatching action");
        match name {
            "user_create" => self.user_create(ctx, payload).await,
            "user_show" => self.user_show(ctx, payload).await,
            "user_update" => self.user_update(ctx, payload).await,
            "user_generate_apikey" => self.user_generate_apikey(ctx, payload).await,
            "user_activity_list" => self.user_activity_list(ctx, payload).await,
            "get_site_user" => self.get_site_user(ctx, payload).await,
            "group_create" => self.group_create(ctx, payload).await,
            "group_show" => self.group_show(ctx, payload).await,
            "group_update" => self.group_update(ctx, payload).await,
            "group_activity_list" => self.group_activity_list(ctx, payload).await,
            "package_create" => self.package_create(ctx, payload).await,
            "package_show" => self.package_show(ctx, payload).await,
            "package_resource_reorder" => self.package_resource_reorder(ctx, payload).await,
            "resource_view_create" => self.resource_view_create(ctx, payload).await,
            "resource_view_update" => self.resource_view_update(ctx, payload).await,
            "send_email_notifications" => self.send_email_notifications(ctx, payload).await,
            _ => Err(LogicError::not_found("action", name)),
        }
    }
}
