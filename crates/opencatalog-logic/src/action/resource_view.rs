use crate::context::Context;
use crate::dispatch::CatalogActions;
use crate::error::LogicError;
use crate::schema::{optional_str, required_str};
use opencatalog_core::ResourceView;
use serde_json::Value;

impl CatalogActions {
    /// Creates a view on an existing resource. An unknown `resource_id`
    /// fails validation, not lookup: the view is the thing being created
    /// and the resource id is one of its fields.
    pub async fn resource_view_create(
        &self,
        _ctx: &Context,
        payload: Value,
    ) -> Result<Value, LogicError> {
        let resource_id = required_str(&payload, "resource_id")?;
        let view_type = required_str(&payload, "view_type")?;
        if self.storage.get_resource(&resource_id).await?.is_none() {
            return Err(LogicError::validation(
                "resource_id",
                "Resource not found",
            ));
        }

        let mut view = ResourceView::new(resource_id, view_type);
        view.title = optional_str(&payload, "title")?;
        view.description = optional_str(&payload, "description")?;

        self.storage.create_resource_view(&view).await?;
        tracing::info!(id = %view.id, resource_id = %view.resource_id, "created resource view");
        Ok(serde_json::to_value(&view)
            .map_err(|e| opencatalog_storage::StorageError::internal(e.to_string()))?)
    }

    /// Updates an existing view. A missing `id` key is a validation
    /// failure; an id that resolves to nothing is `NotFound`. The
    /// resource the view belongs to cannot be changed here.
    pub async fn resource_view_update(
        &self,
        _ctx: &Context,
        payload: Value,
    ) -> Result<Value, LogicError> {
        let id = required_str(&payload, "id")?;
        let mut view = self
            .storage
            .get_resource_view(&id)
            .await?
            .ok_or_else(|| LogicError::not_found("resource view", &id))?;

        if let Some(view_type) = optional_str(&payload, "view_type")? {
            view.view_type = view_type;
        }
        if let Some(title) = optional_str(&payload, "title")? {
            view.title = Some(title);
        }
        if let Some(description) = optional_str(&payload, "description")? {
            view.description = Some(description);
        }

        self.storage.update_resource_view(&view).await?;
        tracing::info!(id = %view.id, "updated resource view");
        Ok(serde_json::to_value(&view)
            .map_err(|e| opencatalog_storage::StorageError::internal(e.to_string()))?)
    }
}
