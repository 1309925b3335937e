use crate::context::Context;
use crate::dispatch::CatalogActions;
use crate::error::LogicError;
use crate::reconcile::{MembershipUpdate, Reconciler};
use crate::schema::{optional_str, required_name, required_str};
use opencatalog_core::{Activity, Group};
use serde_json::{Value, json};

impl CatalogActions {
    pub async fn group_create(&self, ctx: &Context, payload: Value) -> Result<Value, LogicError> {
        let name = required_name(&payload, "name")?;
        if self.storage.get_group_by_name(&name).await?.is_some() {
            return Err(LogicError::validation(
                "name",
                "Group name already exists in database",
            ));
        }

        let mut group = Group::new(name);
        group.title = optional_str(&payload, "title")?;
        group.description = optional_str(&payload, "description")?;

        let update = MembershipUpdate::from_payload(&payload)?;
        Reconciler::new(self.storage.as_ref())
            .reconcile(&mut group, update)
            .await?;

        self.storage.create_group(&group).await?;

        let actor_id = self.actor_id(ctx).await?;
        self.storage
            .append_activity(&Activity::new_group(actor_id, &group.id))
            .await?;

        tracing::info!(id = %group.id, name = %group.name, "created group");
        self.dictize_group(&group).await
    }

    pub async fn group_show(&self, _ctx: &Context, payload: Value) -> Result<Value, LogicError> {
        let id = required_str(&payload, "id")?;
        let group = self
            .group_by_id_or_name(&id)
            .await?
            .ok_or_else(|| LogicError::not_found("group", &id))?;
        self.dictize_group(&group).await
    }

    /// Updates a group, including its member relations.
    ///
    /// Each relation key (`users`, `packages`, `groups`, `extras`) follows
    /// tri-state semantics: an absent key leaves the relation alone, an
    /// empty list clears it, and a non-empty list replaces it wholesale.
    /// All references are resolved before the group is touched, so a bad
    /// reference leaves the stored group unchanged.
    pub async fn group_update(&self, ctx: &Context, payload: Value) -> Result<Value, LogicError> {
        let id = required_str(&payload, "id")?;
        let mut group = self
            .group_by_id_or_name(&id)
            .await?
            .ok_or_else(|| LogicError::not_found("group", &id))?;

        if payload.get("name").is_some() {
            let name = required_name(&payload, "name")?;
            if name != group.name {
                if let Some(existing) = self.storage.get_group_by_name(&name).await?
                    && existing.id != group.id
                {
                    return Err(LogicError::validation(
                        "name",
                        "Group name already exists in database",
                    ));
                }
                group.name = name;
            }
        }
        if let Some(title) = optional_str(&payload, "title")? {
            group.title = Some(title);
        }
        if let Some(description) = optional_str(&payload, "description")? {
            group.description = Some(description);
        }

        let update = MembershipUpdate::from_payload(&payload)?;
        Reconciler::new(self.storage.as_ref())
            .reconcile(&mut group, update)
            .await?;

        self.storage.update_group(&group).await?;

        let actor_id = self.actor_id(ctx).await?;
        self.storage
            .append_activity(&Activity::changed_group(actor_id, &group.id))
            .await?;

        tracing::info!(id = %group.id, name = %group.name, "updated group");
        self.dictize_group(&group).await
    }

    /// Activities about a group, newest first.
    pub async fn group_activity_list(
        &self,
        _ctx: &Context,
        payload: Value,
    ) -> Result<Value, LogicError> {
        let id = required_str(&payload, "id")?;
        let group = self
            .group_by_id_or_name(&id)
            .await?
            .ok_or_else(|| LogicError::not_found("group", &id))?;
        let activities = self.storage.activity_list(&group.id).await?;
        Ok(serde_json::to_value(activities)
            .map_err(|e| opencatalog_storage::StorageError::internal(e.to_string()))?)
    }

    /// Dictizes a group, resolving stored member ids back to `{id, name}`
    /// references in stored order. A dangling member id is an internal
    /// inconsistency, not a caller error.
    async fn dictize_group(&self, group: &Group) -> Result<Value, LogicError> {
        let mut users = Vec::with_capacity(group.users.len());
        for user_id in &group.users {
            let user = self.storage.get_user(user_id).await?.ok_or_else(|| {
                opencatalog_storage::StorageError::internal(format!(
                    "group {} references missing user {user_id}",
                    group.id
                ))
            })?;
            users.push(json!({"id": user.id, "name": user.name}));
        }
        let mut packages = Vec::with_capacity(group.packages.len());
        for package_id in &group.packages {
            let package = self.storage.get_package(package_id).await?.ok_or_else(|| {
                opencatalog_storage::StorageError::internal(format!(
                    "group {} references missing package {package_id}",
                    group.id
                ))
            })?;
            packages.push(json!({"id": package.id, "name": package.name}));
        }
        let mut groups = Vec::with_capacity(group.groups.len());
        for group_id in &group.groups {
            let sub = self.storage.get_group(group_id).await?.ok_or_else(|| {
                opencatalog_storage::StorageError::internal(format!(
                    "group {} references missing group {group_id}",
                    group.id
                ))
            })?;
            groups.push(json!({"id": sub.id, "name": sub.name}));
        }

        Ok(json!({
            "id": group.id,
            "name": group.name,
            "title": group.title,
            "description": group.description,
            "users": users,
            "packages": packages,
            "groups": groups,
            "extras": group.extras_list(),
            "created": group.created.to_string(),
        }))
    }
}
