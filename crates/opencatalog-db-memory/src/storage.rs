use async_trait::async_trait;
use opencatalog_core::{Activity, EntityType, Group, Package, Resource, ResourceView, User};
use opencatalog_storage::{CatalogStorage, StorageError};
use papaya::HashMap as PapayaHashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory catalog storage using papaya lock-free HashMaps.
///
/// Entities are keyed by surrogate id; a secondary map per named entity
/// kind resolves natural keys (names) to ids. A flat resource index maps
/// resource ids to their owning package so cross-package lookup stays
/// O(1). The activity log is an append-only Vec behind an async RwLock.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    users: Arc<PapayaHashMap<String, User>>,
    user_names: Arc<PapayaHashMap<String, String>>,
    groups: Arc<PapayaHashMap<String, Group>>,
    group_names: Arc<PapayaHashMap<String, String>>,
    packages: Arc<PapayaHashMap<String, Package>>,
    package_names: Arc<PapayaHashMap<String, String>>,
    /// resource id -> owning package id
    resource_index: Arc<PapayaHashMap<String, String>>,
    resource_views: Arc<PapayaHashMap<String, ResourceView>>,
    activities: Arc<RwLock<Vec<Activity>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guards create/rename against stealing another entity's name.
    fn claim_name(
        names: &PapayaHashMap<String, String>,
        entity_type: EntityType,
        name: &str,
        id: &str,
    ) -> Result<(), StorageError> {
        let guard = names.pin();
        match guard.get(name) {
            Some(existing) if existing != id => {
                Err(StorageError::already_exists(entity_type, name))
            }
            _ => {
                guard.insert(name.to_string(), id.to_string());
                Ok(())
            }
        }
    }

    fn release_name(names: &PapayaHashMap<String, String>, name: &str, id: &str) {
        let guard = names.pin();
        if guard.get(name).is_some_and(|owner| owner == id) {
            guard.remove(name);
        }
    }

    fn reindex_resources(&self, old: Option<&Package>, new: &Package) {
        let guard = self.resource_index.pin();
        if let Some(old) = old {
            for resource in &old.resources {
                guard.remove(&resource.id);
            }
        }
        for resource in &new.resources {
            guard.insert(resource.id.clone(), new.id.clone());
        }
    }
}

#[async_trait]
impl CatalogStorage for InMemoryStorage {
    // ==================== Users ====================

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        Ok(self.users.pin().get(id).cloned())
    }

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, StorageError> {
        let id = match self.user_names.pin().get(name) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        Ok(self.users.pin().get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let guard = self.users.pin();
        let mut users: Vec<User> = guard.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn create_user(&self, user: &User) -> Result<(), StorageError> {
        if self.users.pin().get(&user.id).is_some() {
            return Err(StorageError::already_exists(EntityType::User, &user.id));
        }
        Self::claim_name(&self.user_names, EntityType::User, &user.name, &user.id)?;
        self.users.pin().insert(user.id.clone(), user.clone());
        tracing::debug!(id = %user.id, name = %user.name, "created user");
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), StorageError> {
        let old_name = {
            let guard = self.users.pin();
            guard
                .get(&user.id)
                .map(|existing| existing.name.clone())
                .ok_or_else(|| StorageError::not_found(EntityType::User, &user.id))?
        };
        if old_name != user.name {
            Self::claim_name(&self.user_names, EntityType::User, &user.name, &user.id)?;
            Self::release_name(&self.user_names, &old_name, &user.id);
        }
        self.users.pin().insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<(), StorageError> {
        let guard = self.users.pin();
        let user = guard
            .get(id)
            .ok_or_else(|| StorageError::not_found(EntityType::User, id))?;
        Self::release_name(&self.user_names, &user.name, id);
        guard.remove(id);
        Ok(())
    }

    // ==================== Groups ====================

    async fn get_group(&self, id: &str) -> Result<Option<Group>, StorageError> {
        Ok(self.groups.pin().get(id).cloned())
    }

    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>, StorageError> {
        let id = match self.group_names.pin().get(name) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        Ok(self.groups.pin().get(&id).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, StorageError> {
        let guard = self.groups.pin();
        let mut groups: Vec<Group> = guard.values().cloned().collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn create_group(&self, group: &Group) -> Result<(), StorageError> {
        if self.groups.pin().get(&group.id).is_some() {
            return Err(StorageError::already_exists(EntityType::Group, &group.id));
        }
        Self::claim_name(&self.group_names, EntityType::Group, &group.name, &group.id)?;
        self.groups.pin().insert(group.id.clone(), group.clone());
        tracing::debug!(id = %group.id, name = %group.name, "created group");
        Ok(())
    }

    async fn update_group(&self, group: &Group) -> Result<(), StorageError> {
        let old_name = {
            let guard = self.groups.pin();
            guard
                .get(&group.id)
                .map(|existing| existing.name.clone())
                .ok_or_else(|| StorageError::not_found(EntityType::Group, &group.id))?
        };
        if old_name != group.name {
            Self::claim_name(&self.group_names, EntityType::Group, &group.name, &group.id)?;
            Self::release_name(&self.group_names, &old_name, &group.id);
        }
        self.groups.pin().insert(group.id.clone(), group.clone());
        Ok(())
    }

    async fn delete_group(&self, id: &str) -> Result<(), StorageError> {
        let guard = self.groups.pin();
        let group = guard
            .get(id)
            .ok_or_else(|| StorageError::not_found(EntityType::Group, id))?;
        Self::release_name(&self.group_names, &group.name, id);
        guard.remove(id);
        Ok(())
    }

    // ==================== Packages ====================

    async fn get_package(&self, id: &str) -> Result<Option<Package>, StorageError> {
        Ok(self.packages.pin().get(id).cloned())
    }

    async fn get_package_by_name(&self, name: &str) -> Result<Option<Package>, StorageError> {
        let id = match self.package_names.pin().get(name) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        Ok(self.packages.pin().get(&id).cloned())
    }

    async fn list_packages(&self) -> Result<Vec<Package>, StorageError> {
        let guard = self.packages.pin();
        let mut packages: Vec<Package> = guard.values().cloned().collect();
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(packages)
    }

    async fn create_package(&self, package: &Package) -> Result<(), StorageError> {
        if self.packages.pin().get(&package.id).is_some() {
            return Err(StorageError::already_exists(
                EntityType::Package,
                &package.id,
            ));
        }
        Self::claim_name(
            &self.package_names,
            EntityType::Package,
            &package.name,
            &package.id,
        )?;
        self.reindex_resources(None, package);
        self.packages
            .pin()
            .insert(package.id.clone(), package.clone());
        tracing::debug!(id = %package.id, name = %package.name, "created package");
        Ok(())
    }

    async fn update_package(&self, package: &Package) -> Result<(), StorageError> {
        let old = {
            let guard = self.packages.pin();
            guard
                .get(&package.id)
                .cloned()
                .ok_or_else(|| StorageError::not_found(EntityType::Package, &package.id))?
        };
        if old.name != package.name {
            Self::claim_name(
                &self.package_names,
                EntityType::Package,
                &package.name,
                &package.id,
            )?;
            Self::release_name(&self.package_names, &old.name, &package.id);
        }
        self.reindex_resources(Some(&old), package);
        self.packages
            .pin()
            .insert(package.id.clone(), package.clone());
        Ok(())
    }

    async fn delete_package(&self, id: &str) -> Result<(), StorageError> {
        let package = {
            let guard = self.packages.pin();
            guard
                .get(id)
                .cloned()
                .ok_or_else(|| StorageError::not_found(EntityType::Package, id))?
        };
        Self::release_name(&self.package_names, &package.name, id);
        {
            let guard = self.resource_index.pin();
            for resource in &package.resources {
                guard.remove(&resource.id);
            }
        }
        self.packages.pin().remove(id);
        Ok(())
    }

    async fn get_resource(&self, id: &str) -> Result<Option<Resource>, StorageError> {
        let package_id = match self.resource_index.pin().get(id) {
            Some(package_id) => package_id.clone(),
            None => return Ok(None),
        };
        let guard = self.packages.pin();
        Ok(guard
            .get(&package_id)
            .and_then(|package| package.resource(id))
            .cloned())
    }

    // ==================== Resource views ====================

    async fn get_resource_view(&self, id: &str) -> Result<Option<ResourceView>, StorageError> {
        Ok(self.resource_views.pin().get(id).cloned())
    }

    async fn list_resource_views(
        &self,
        resource_id: &str,
    ) -> Result<Vec<ResourceView>, StorageError> {
        let guard = self.resource_views.pin();
        let mut views: Vec<ResourceView> = guard
            .values()
            .filter(|view| view.resource_id == resource_id)
            .cloned()
            .collect();
        views.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(views)
    }

    async fn create_resource_view(&self, view: &ResourceView) -> Result<(), StorageError> {
        let guard = self.resource_views.pin();
        if guard.get(&view.id).is_some() {
            return Err(StorageError::already_exists(
                EntityType::ResourceView,
                &view.id,
            ));
        }
        guard.insert(view.id.clone(), view.clone());
        Ok(())
    }

    async fn update_resource_view(&self, view: &ResourceView) -> Result<(), StorageError> {
        let guard = self.resource_views.pin();
        if guard.get(&view.id).is_none() {
            return Err(StorageError::not_found(EntityType::ResourceView, &view.id));
        }
        guard.insert(view.id.clone(), view.clone());
        Ok(())
    }

    async fn delete_resource_view(&self, id: &str) -> Result<(), StorageError> {
        let guard = self.resource_views.pin();
        if guard.remove(id).is_none() {
            return Err(StorageError::not_found(EntityType::ResourceView, id));
        }
        Ok(())
    }

    // ==================== Activity stream ====================

    async fn append_activity(&self, activity: &Activity) -> Result<(), StorageError> {
        let mut log = self.activities.write().await;
        log.push(activity.clone());
        Ok(())
    }

    async fn activity_list(&self, object_id: &str) -> Result<Vec<Activity>, StorageError> {
        let log = self.activities.read().await;
        Ok(log
            .iter()
            .rev()
            .filter(|activity| activity.object_id == object_id)
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencatalog_core::Password;

    fn user(name: &str) -> User {
        User::new(name, format!("{name}@example.com"), Password::new("pass1234"))
    }

    #[tokio::test]
    async fn test_user_roundtrip_by_id_and_name() {
        let storage = InMemoryStorage::new();
        let fred = user("fred");
        storage.create_user(&fred).await.unwrap();

        assert_eq!(storage.get_user(&fred.id).await.unwrap().unwrap().id, fred.id);
        assert_eq!(
            storage.get_user_by_name("fred").await.unwrap().unwrap().id,
            fred.id
        );
        assert!(storage.get_user_by_name("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_name_conflicts() {
        let storage = InMemoryStorage::new();
        storage.create_user(&user("fred")).await.unwrap();

        let err = storage.create_user(&user("fred")).await.unwrap_err();
        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn test_rename_updates_name_index() {
        let storage = InMemoryStorage::new();
        let mut fred = user("fred");
        storage.create_user(&fred).await.unwrap();

        fred.name = "freddy".to_string();
        storage.update_user(&fred).await.unwrap();

        assert!(storage.get_user_by_name("fred").await.unwrap().is_none());
        assert_eq!(
            storage.get_user_by_name("freddy").await.unwrap().unwrap().id,
            fred.id
        );
    }

    #[tokio::test]
    async fn test_rename_onto_taken_name_conflicts() {
        let storage = InMemoryStorage::new();
        let mut fred = user("fred");
        storage.create_user(&fred).await.unwrap();
        storage.create_user(&user("bob")).await.unwrap();

        fred.name = "bob".to_string();
        let err = storage.update_user(&fred).await.unwrap_err();
        assert!(err.is_already_exists());
        // fred's original name mapping is untouched
        assert!(storage.get_user_by_name("fred").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let storage = InMemoryStorage::new();
        let err = storage.update_user(&user("ghost")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_resource_index_follows_package_updates() {
        let storage = InMemoryStorage::new();
        let resources = vec![Resource::new("http://a.html"), Resource::new("http://b.html")];
        let dropped = resources[1].id.clone();
        let kept = resources[0].id.clone();
        let mut package = Package::new("basic").with_resources(resources);
        storage.create_package(&package).await.unwrap();

        assert!(storage.get_resource(&dropped).await.unwrap().is_some());

        package.resources.retain(|r| r.id == kept);
        storage.update_package(&package).await.unwrap();

        assert!(storage.get_resource(&dropped).await.unwrap().is_none());
        assert_eq!(
            storage.get_resource(&kept).await.unwrap().unwrap().url,
            "http://a.html"
        );
    }

    #[tokio::test]
    async fn test_list_users_sorted_by_name() {
        let storage = InMemoryStorage::new();
        for name in ["carol", "alice", "bob"] {
            storage.create_user(&user(name)).await.unwrap();
        }

        let names: Vec<_> = storage
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_list_groups_and_packages_sorted_by_name() {
        let storage = InMemoryStorage::new();
        for name in ["zoology", "archives"] {
            storage.create_group(&Group::new(name)).await.unwrap();
            storage.create_package(&Package::new(name)).await.unwrap();
        }

        let groups: Vec<_> = storage
            .list_groups()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(groups, vec!["archives", "zoology"]);
        let packages: Vec<_> = storage
            .list_packages()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(packages, vec!["archives", "zoology"]);
    }

    #[tokio::test]
    async fn test_delete_user_frees_name() {
        let storage = InMemoryStorage::new();
        let fred = user("fred");
        storage.create_user(&fred).await.unwrap();

        storage.delete_user(&fred.id).await.unwrap();
        assert!(storage.get_user(&fred.id).await.unwrap().is_none());
        assert!(storage.get_user_by_name("fred").await.unwrap().is_none());

        // the name is reusable afterwards
        storage.create_user(&user("fred")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_entities_is_not_found() {
        let storage = InMemoryStorage::new();
        assert!(storage.delete_user("ghost").await.unwrap_err().is_not_found());
        assert!(storage.delete_group("ghost").await.unwrap_err().is_not_found());
        assert!(
            storage
                .delete_package("ghost")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            storage
                .delete_resource_view("ghost")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_delete_package_clears_resource_index() {
        let storage = InMemoryStorage::new();
        let resources = vec![Resource::new("http://a.html")];
        let resource_id = resources[0].id.clone();
        let package = Package::new("basic").with_resources(resources);
        storage.create_package(&package).await.unwrap();

        storage.delete_package(&package.id).await.unwrap();
        assert!(storage.get_package(&package.id).await.unwrap().is_none());
        assert!(storage.get_package_by_name("basic").await.unwrap().is_none());
        assert!(storage.get_resource(&resource_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_resource_views_filters_by_resource() {
        let storage = InMemoryStorage::new();
        let wanted = ResourceView::new("res-1", "data_table");
        let other = ResourceView::new("res-2", "chart");
        storage.create_resource_view(&wanted).await.unwrap();
        storage.create_resource_view(&other).await.unwrap();

        let views = storage.list_resource_views("res-1").await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, wanted.id);

        storage.delete_resource_view(&wanted.id).await.unwrap();
        assert!(storage.list_resource_views("res-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_activity_list_newest_first() {
        let storage = InMemoryStorage::new();
        let first = Activity::changed_user("u1", "obj");
        let second = Activity::changed_user("u2", "obj");
        let other = Activity::changed_user("u1", "elsewhere");
        storage.append_activity(&first).await.unwrap();
        storage.append_activity(&second).await.unwrap();
        storage.append_activity(&other).await.unwrap();

        let listed = storage.activity_list("obj").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }
}
