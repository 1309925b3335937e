//! Storage traits for the catalog storage abstraction layer.

use async_trait::async_trait;
use opencatalog_core::{Activity, Group, Package, Resource, ResourceView, User};

use crate::error::StorageError;

/// The main storage trait that all catalog backends must implement.
///
/// Each entity kind gets typed CRUD methods plus a lookup by natural key
/// (name) where the entity has one. Implementations must be thread-safe
/// (`Send + Sync`) and the trait is object safe so it can be passed
/// around as `Arc<dyn CatalogStorage>`.
///
/// `get_*` methods return `Ok(None)` for missing entities; errors are
/// reserved for infrastructure problems. `create_*` methods fail with
/// `StorageError::AlreadyExists` when the id or name is taken, `update_*`
/// and `delete_*` with `StorageError::NotFound` when the entity is gone.
/// `list_*` methods return entities sorted by natural key for stable
/// output.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    // ==================== Users ====================

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError>;

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, StorageError>;

    async fn list_users(&self) -> Result<Vec<User>, StorageError>;

    async fn create_user(&self, user: &User) -> Result<(), StorageError>;

    async fn update_user(&self, user: &User) -> Result<(), StorageError>;

    async fn delete_user(&self, id: &str) -> Result<(), StorageError>;

    // ==================== Groups ====================

    async fn get_group(&self, id: &str) -> Result<Option<Group>, StorageError>;

    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>, StorageError>;

    async fn list_groups(&self) -> Result<Vec<Group>, StorageError>;

    async fn create_group(&self, group: &Group) -> Result<(), StorageError>;

    /// Persists the full aggregate (relations included) in one step.
    async fn update_group(&self, group: &Group) -> Result<(), StorageError>;

    async fn delete_group(&self, id: &str) -> Result<(), StorageError>;

    // ==================== Packages ====================

    async fn get_package(&self, id: &str) -> Result<Option<Package>, StorageError>;

    async fn get_package_by_name(&self, name: &str) -> Result<Option<Package>, StorageError>;

    async fn list_packages(&self) -> Result<Vec<Package>, StorageError>;

    async fn create_package(&self, package: &Package) -> Result<(), StorageError>;

    async fn update_package(&self, package: &Package) -> Result<(), StorageError>;

    /// Deleting a package drops its resources with it.
    async fn delete_package(&self, id: &str) -> Result<(), StorageError>;

    /// Looks up a resource across all packages by its id.
    async fn get_resource(&self, id: &str) -> Result<Option<Resource>, StorageError>;

    // ==================== Resource views ====================

    async fn get_resource_view(&self, id: &str) -> Result<Option<ResourceView>, StorageError>;

    /// Views configured on one resource, sorted by id.
    async fn list_resource_views(
        &self,
        resource_id: &str,
    ) -> Result<Vec<ResourceView>, StorageError>;

    async fn create_resource_view(&self, view: &ResourceView) -> Result<(), StorageError>;

    async fn update_resource_view(&self, view: &ResourceView) -> Result<(), StorageError>;

    async fn delete_resource_view(&self, id: &str) -> Result<(), StorageError>;

    // ==================== Activity stream ====================

    async fn append_activity(&self, activity: &Activity) -> Result<(), StorageError>;

    /// Activities about the given object, newest first.
    async fn activity_list(&self, object_id: &str) -> Result<Vec<Activity>, StorageError>;

    // ==================== Metadata ====================

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that CatalogStorage is object-safe
    fn _assert_storage_object_safe(_: &dyn CatalogStorage) {}
}
