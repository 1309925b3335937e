//! Membership reconciliation for group aggregates.
//!
//! A group update payload may name each relation (member users, owned
//! packages, sub-groups, extras) in one of three states, and the resulting
//! relation depends on that state alone:
//!
//! | payload state for a relation | result                      |
//! |------------------------------|-----------------------------|
//! | key absent                   | unchanged                   |
//! | present, empty list          | cleared                     |
//! | present, non-empty list      | replaced with the payload   |
//!
//! There is no implicit merging. Entries are references by natural key
//! (`{"name": ...}`); every reference is resolved through storage before
//! the aggregate is touched, so an unresolvable reference aborts the whole
//! update with the aggregate unchanged.

use crate::error::LogicError;
use indexmap::IndexMap;
use opencatalog_core::Group;
use opencatalog_storage::CatalogStorage;
use serde::Deserialize;
use serde_json::Value;

/// A reference to a related entity by its natural key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityRef {
    pub name: String,
}

/// One key/value entry in an extras payload list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtraItem {
    pub key: String,
    pub value: String,
}

/// The relation part of a group update payload.
///
/// `None` means the key was absent; `Some(vec![])` means it was present
/// and empty. Unknown payload keys (id, name, title, ...) are ignored
/// here; the owning action handles them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MembershipUpdate {
    pub users: Option<Vec<EntityRef>>,
    pub packages: Option<Vec<EntityRef>>,
    pub groups: Option<Vec<EntityRef>>,
    pub extras: Option<Vec<ExtraItem>>,
}

impl MembershipUpdate {
    /// Extracts the relation keys from a raw payload. Malformed entries
    /// (a non-list value, a reference without `name`) fail validation
    /// before reconciliation begins.
    pub fn from_payload(payload: &Value) -> Result<Self, LogicError> {
        serde_json::from_value(payload.clone())
            .map_err(|e| LogicError::validation("payload", e.to_string()))
    }
}

/// Tri-state application for an id-list relation: absent preserves,
/// present replaces (an empty list therefore clears).
pub(crate) fn apply_relation(current: &mut Vec<String>, update: Option<Vec<String>>) {
    if let Some(next) = update {
        *current = next;
    }
}

/// Tri-state application for extras. Replacement is keyed: a later entry
/// with a duplicate key overwrites an earlier one (last occurrence wins).
pub(crate) fn apply_extras(current: &mut IndexMap<String, String>, update: Option<Vec<ExtraItem>>) {
    if let Some(items) = update {
        let mut next = IndexMap::with_capacity(items.len());
        for item in items {
            next.insert(item.key, item.value);
        }
        *current = next;
    }
}

/// Applies a [`MembershipUpdate`] to a group aggregate.
///
/// Resolution happens first: every reference in the payload is looked up
/// by name, and a missing entity fails with `NotFound` before any relation
/// is modified. Persisting the mutated aggregate is the caller's job.
pub struct Reconciler<'a> {
    storage: &'a dyn CatalogStorage,
}

impl<'a> Reconciler<'a> {
    pub fn new(storage: &'a dyn CatalogStorage) -> Self {
        Self { storage }
    }

    pub async fn reconcile(
        &self,
        group: &mut Group,
        update: MembershipUpdate,
    ) -> Result<(), LogicError> {
        // Resolve everything up front; nothing is mutated on failure.
        let users = self.resolve_users(update.users).await?;
        let packages = self.resolve_packages(update.packages).await?;
        let groups = self.resolve_groups(update.groups).await?;

        apply_relation(&mut group.users, users);
        apply_relation(&mut group.packages, packages);
        apply_relation(&mut group.groups, groups);
        apply_extras(&mut group.extras, update.extras);
        Ok(())
    }

    async fn resolve_users(
        &self,
        refs: Option<Vec<EntityRef>>,
    ) -> Result<Option<Vec<String>>, LogicError> {
        let Some(refs) = refs else { return Ok(None) };
        let mut ids = Vec::with_capacity(refs.len());
        for entity_ref in refs {
            let user = self
                .storage
                .get_user_by_name(&entity_ref.name)
                .await?
                .ok_or_else(|| LogicError::not_found("user", &entity_ref.name))?;
            ids.push(user.id);
        }
        Ok(Some(ids))
    }

    async fn resolve_packages(
        &self,
        refs: Option<Vec<EntityRef>>,
    ) -> Result<Option<Vec<String>>, LogicError> {
        let Some(refs) = refs else { return Ok(None) };
        let mut ids = Vec::with_capacity(refs.len());
        for entity_ref in refs {
            let package = self
                .storage
                .get_package_by_name(&entity_ref.name)
                .await?
                .ok_or_else(|| LogicError::not_found("package", &entity_ref.name))?;
            ids.push(package.id);
        }
        Ok(Some(ids))
    }

    async fn resolve_groups(
        &self,
        refs: Option<Vec<EntityRef>>,
    ) -> Result<Option<Vec<String>>, LogicError> {
        let Some(refs) = refs else { return Ok(None) };
        let mut ids = Vec::with_capacity(refs.len());
        for entity_ref in refs {
            let group = self
                .storage
                .get_group_by_name(&entity_ref.name)
                .await?
                .ok_or_else(|| LogicError::not_found("group", &entity_ref.name))?;
            ids.push(group.id);
        }
        Ok(Some(ids))
    }
}
