//! Action handlers, grouped by the entity they operate on.

mod group;
mod notification;
mod package;
mod resource_view;
mod user;

pub use notification::{NoopNotificationSender, NotificationSender};

use crate::context::Context;
use crate::dispatch::CatalogActions;
use crate::error::LogicError;
use opencatalog_core::{Group, Package, Password, User};

impl CatalogActions {
    /// Resolves a user by surrogate id first, then by name.
    pub(crate) async fn user_by_id_or_name(&self, id: &str) -> Result<Option<User>, LogicError> {
        if let Some(user) = self.storage.get_user(id).await? {
            return Ok(Some(user));
        }
        Ok(self.storage.get_user_by_name(id).await?)
    }

    pub(crate) async fn group_by_id_or_name(&self, id: &str) -> Result<Option<Group>, LogicError> {
        if let Some(group) = self.storage.get_group(id).await? {
            return Ok(Some(group));
        }
        Ok(self.storage.get_group_by_name(id).await?)
    }

    pub(crate) async fn package_by_id_or_name(
        &self,
        id: &str,
    ) -> Result<Option<Package>, LogicError> {
        if let Some(package) = self.storage.get_package(id).await? {
            return Ok(Some(package));
        }
        Ok(self.storage.get_package_by_name(id).await?)
    }

    /// The configured site user, created on first use. System-initiated
    /// changes are attributed to this account.
    pub(crate) async fn site_user(&self) -> Result<User, LogicError> {
        let name = self.config.site_id.clone();
        if let Some(user) = self.storage.get_user_by_name(&name).await? {
            return Ok(user);
        }
        let email = format!("{name}@localhost");
        let user = User::new(name, email, Password::default()).as_sysadmin();
        self.storage.create_user(&user).await?;
        Ok(user)
    }

    /// The id the current change is attributed to: the context's user if
    /// it resolves, the site user otherwise.
    pub(crate) async fn actor_id(&self, ctx: &Context) -> Result<String, LogicError> {
        if let Some(name) = &ctx.user
            && let Some(user) = self.user_by_id_or_name(name).await?
        {
            return Ok(user.id);
        }
        Ok(self.site_user().await?.id)
    }
}
