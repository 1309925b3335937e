use crate::context::Context;
use crate::dispatch::CatalogActions;
use crate::error::LogicError;
use crate::schema::{optional_str, required_name, required_str, required_str_list};
use opencatalog_core::{Activity, Package, Resource};
use serde_json::Value;

/// Builds the resource list from a create payload. Each entry needs a
/// `url`; `format` and `description` are optional.
fn resources_from_payload(payload: &Value) -> Result<Vec<Resource>, LogicError> {
    let entries = match payload.get("resources") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(LogicError::validation("resources", "Must be a list")),
    };
    let mut resources = Vec::with_capacity(entries.len());
    for entry in entries {
        let url = required_str(entry, "url")
            .map_err(|_| LogicError::missing_value("resources.url"))?;
        let mut resource = Resource::new(url);
        resource.format = optional_str(entry, "format")?;
        resource.description = optional_str(entry, "description")?;
        resources.push(resource);
    }
    Ok(resources)
}

impl CatalogActions {
    pub async fn package_create(&self, ctx: &Context, payload: Value) -> Result<Value, LogicError> {
        let name = required_name(&payload, "name")?;
        if self.storage.get_package_by_name(&name).await?.is_some() {
            return Err(LogicError::validation(
                "name",
                "That URL is already in use",
            ));
        }

        let mut package = Package::new(name);
        package.title = optional_str(&payload, "title")?;
        package.resources = resources_from_payload(&payload)?;

        self.storage.create_package(&package).await?;

        let actor_id = self.actor_id(ctx).await?;
        self.storage
            .append_activity(&Activity::new_package(actor_id, &package.id))
            .await?;

        tracing::info!(id = %package.id, name = %package.name, "created package");
        Ok(serde_json::to_value(&package)
            .map_err(|e| opencatalog_storage::StorageError::internal(e.to_string()))?)
    }

    pub async fn package_show(&self, _ctx: &Context, payload: Value) -> Result<Value, LogicError> {
        let id = required_str(&payload, "id")?;
        let package = self
            .package_by_id_or_name(&id)
            .await?
            .ok_or_else(|| LogicError::not_found("package", &id))?;
        Ok(serde_json::to_value(&package)
            .map_err(|e| opencatalog_storage::StorageError::internal(e.to_string()))?)
    }

    /// Reorders a package's resources.
    ///
    /// `order` is a list of resource ids. The listed resources move to the
    /// front in the given order; unlisted resources follow, keeping their
    /// relative order. Duplicate or unknown ids fail validation and leave
    /// the package unchanged.
    pub async fn package_resource_reorder(
        &self,
        ctx: &Context,
        payload: Value,
    ) -> Result<Value, LogicError> {
        let id = required_str(&payload, "id")?;
        let order = required_str_list(&payload, "order")?;
        let mut package = self
            .package_by_id_or_name(&id)
            .await?
            .ok_or_else(|| LogicError::not_found("package", &id))?;

        let mut reordered = Vec::with_capacity(package.resources.len());
        for resource_id in &order {
            if reordered.iter().any(|r: &Resource| r.id == *resource_id) {
                return Err(LogicError::validation(
                    "order",
                    format!("Duplicate resource id in order: {resource_id}"),
                ));
            }
            let position = package
                .resources
                .iter()
                .position(|r| r.id == *resource_id)
                .ok_or_else(|| {
                    LogicError::validation(
                        "order",
                        format!("Resource id not in package: {resource_id}"),
                    )
                })?;
            reordered.push(package.resources.remove(position));
        }
        reordered.append(&mut package.resources);
        package.resources = reordered;

        self.storage.update_package(&package).await?;

        let actor_id = self.actor_id(ctx).await?;
        self.storage
            .append_activity(&Activity::changed_package(actor_id, &package.id))
            .await?;

        tracing::info!(id = %package.id, "reordered package resources");
        Ok(serde_json::to_value(&package)
            .map_err(|e| opencatalog_storage::StorageError::internal(e.to_string()))?)
    }
}
