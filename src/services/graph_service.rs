use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::ServiceError;
use crate::stores::{ActivityStore, PermissionStore, RoleStore};
use crate::types::db::{permission, role};
use crate::types::parse_string_set;

/// Maintains the bidirectional role↔permission graph
///
/// Roles and permissions are independent records with no foreign keys; the
/// invariant `P.key ∈ R.permissions ⟺ R.name ∈ P.roles` (for pairs where
/// both records exist) is enforced procedurally here. Every mutation is a
/// compute-diff-then-dual-write sequence. The store provides no
/// multi-record atomicity, so all graph mutations are serialized behind one
/// mutex and a partial dual-write failure is surfaced as an internal error
/// rather than reported as success.
pub struct GraphService {
    roles: Arc<RoleStore>,
    permissions: Arc<PermissionStore>,
    activities: Arc<ActivityStore>,
    write_lock: Mutex<()>,
}

/// Drop duplicate entries, keeping first-occurrence order
fn dedupe(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect()
}

/// Set difference in both directions: (new − old, old − new)
///
/// Inputs must already be deduplicated; the two outputs are disjoint by
/// construction.
fn diff(old: &[String], new: &[String]) -> (Vec<String>, Vec<String>) {
    let old_set: HashSet<&str> = old.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new.iter().map(String::as_str).collect();

    let added = new
        .iter()
        .filter(|k| !old_set.contains(k.as_str()))
        .cloned()
        .collect();
    let removed = old
        .iter()
        .filter(|k| !new_set.contains(k.as_str()))
        .cloned()
        .collect();
    (added, removed)
}

impl GraphService {
    pub fn new(
        roles: Arc<RoleStore>,
        permissions: Arc<PermissionStore>,
        activities: Arc<ActivityStore>,
    ) -> Self {
        Self {
            roles,
            permissions,
            activities,
            write_lock: Mutex::new(()),
        }
    }

    /// Append an activity record after a successful mutation
    ///
    /// Best-effort: a log failure is traced but never rolls back or fails
    /// the mutation it describes.
    async fn log_activity(&self, actor: &str, action: &str, target: &str) {
        if let Err(e) = self.activities.record(actor, action, target).await {
            tracing::warn!(action, target, "activity log write failed: {}", e);
        }
    }

    pub async fn list_roles(&self) -> Result<Vec<role::Model>, ServiceError> {
        self.roles.all().await
    }

    pub async fn list_permissions(&self) -> Result<Vec<permission::Model>, ServiceError> {
        self.permissions.all().await
    }

    /// Create a role and link its name into every listed permission
    ///
    /// Keys that resolve to no Permission record are silently skipped: a
    /// role may hold keys that do not (yet) exist as records, and later
    /// creating such a permission does not backfill the link.
    pub async fn create_role(
        &self,
        actor: &str,
        name: &str,
        permission_keys: &[String],
        status: &str,
        created_by: &str,
    ) -> Result<role::Model, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let keys = dedupe(permission_keys);
        let created = self.roles.insert(name, &keys, status, created_by).await?;

        for key in &keys {
            self.permissions
                .add_role_name(key, &created.name)
                .await
                .map_err(|e| {
                    tracing::error!(
                        role = %created.name,
                        %key,
                        "dual-write failed after role insert, graph is inconsistent"
                    );
                    ServiceError::internal("create_role dual-write", e)
                })?;
        }

        self.log_activity(actor, "Created Role", &format!("Role: {}", created.name))
            .await;
        Ok(created)
    }

    /// Update a role, propagating the key-set diff to the permission side
    ///
    /// An unchanged key set produces an empty diff and therefore no
    /// permission-side writes.
    pub async fn update_role(
        &self,
        actor: &str,
        id: &str,
        name: &str,
        permission_keys: &[String],
        status: &str,
    ) -> Result<role::Model, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let existing = self
            .roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role"))?;

        if name != existing.name && self.roles.find_by_name(name).await?.is_some() {
            return Err(ServiceError::conflict("Role name"));
        }

        let old_keys = parse_string_set(&existing.permissions);
        let new_keys = dedupe(permission_keys);
        let (added, removed) = diff(&old_keys, &new_keys);

        let updated = self
            .roles
            .update_definition(id, name, &new_keys, status)
            .await?;

        for key in &added {
            self.permissions
                .add_role_name(key, &updated.name)
                .await
                .map_err(|e| {
                    tracing::error!(
                        role = %updated.name,
                        %key,
                        "dual-write failed after role update, graph is inconsistent"
                    );
                    ServiceError::internal("update_role dual-write", e)
                })?;
        }
        for key in &removed {
            self.permissions
                .remove_role_name(key, &updated.name)
                .await
                .map_err(|e| {
                    tracing::error!(
                        role = %updated.name,
                        %key,
                        "dual-write failed after role update, graph is inconsistent"
                    );
                    ServiceError::internal("update_role dual-write", e)
                })?;
        }

        self.log_activity(actor, "Updated Role", &format!("Role: {}", updated.name))
            .await;
        Ok(updated)
    }

    /// Delete a role and strip its name from every permission it held
    pub async fn delete_role(&self, actor: &str, id: &str) -> Result<role::Model, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let removed = self.roles.delete_by_id(id).await?;

        for key in parse_string_set(&removed.permissions) {
            self.permissions
                .remove_role_name(&key, &removed.name)
                .await
                .map_err(|e| {
                    tracing::error!(
                        role = %removed.name,
                        %key,
                        "dual-write failed after role delete, graph is inconsistent"
                    );
                    ServiceError::internal("delete_role dual-write", e)
                })?;
        }

        self.log_activity(actor, "Deleted Role", &format!("Role: {}", removed.name))
            .await;
        Ok(removed)
    }

    /// Create a permission and link its key into every listed role
    ///
    /// Only the roles named in the request are touched: pre-existing roles
    /// that already reference this key are not backfilled into the new
    /// record's role set.
    pub async fn create_permission(
        &self,
        actor: &str,
        key: &str,
        description: &str,
        role_names: &[String],
    ) -> Result<permission::Model, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let names = dedupe(role_names);
        let created = self.permissions.insert(key, description, &names).await?;

        for role_name in &names {
            self.roles
                .add_permission_key(role_name, &created.key)
                .await
                .map_err(|e| {
                    tracing::error!(
                        key = %created.key,
                        role = %role_name,
                        "dual-write failed after permission insert, graph is inconsistent"
                    );
                    ServiceError::internal("create_permission dual-write", e)
                })?;
        }

        self.log_activity(
            actor,
            "Created Permission",
            &format!("Permission: {}", created.key),
        )
        .await;
        Ok(created)
    }

    /// Update a permission, propagating the role-set diff to the role side
    pub async fn update_permission(
        &self,
        actor: &str,
        id: &str,
        key: &str,
        description: &str,
        role_names: &[String],
    ) -> Result<permission::Model, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let existing = self
            .permissions
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Permission"))?;

        if key != existing.key && self.permissions.find_by_key(key).await?.is_some() {
            return Err(ServiceError::conflict("Permission key"));
        }

        let old_names = parse_string_set(&existing.roles);
        let new_names = dedupe(role_names);
        let (added, removed) = diff(&old_names, &new_names);

        let updated = self
            .permissions
            .update_definition(id, key, description, &new_names)
            .await?;

        for role_name in &added {
            self.roles
                .add_permission_key(role_name, &updated.key)
                .await
                .map_err(|e| {
                    tracing::error!(
                        key = %updated.key,
                        role = %role_name,
                        "dual-write failed after permission update, graph is inconsistent"
                    );
                    ServiceError::internal("update_permission dual-write", e)
                })?;
        }
        for role_name in &removed {
            self.roles
                .remove_permission_key(role_name, &updated.key)
                .await
                .map_err(|e| {
                    tracing::error!(
                        key = %updated.key,
                        role = %role_name,
                        "dual-write failed after permission update, graph is inconsistent"
                    );
                    ServiceError::internal("update_permission dual-write", e)
                })?;
        }

        self.log_activity(
            actor,
            "Updated Permission",
            &format!("Permission: {}", updated.key),
        )
        .await;
        Ok(updated)
    }

    /// Delete a permission and strip its key from every role holding it
    pub async fn delete_permission(
        &self,
        actor: &str,
        id: &str,
    ) -> Result<permission::Model, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let removed = self.permissions.delete_by_id(id).await?;

        for role_name in parse_string_set(&removed.roles) {
            self.roles
                .remove_permission_key(&role_name, &removed.key)
                .await
                .map_err(|e| {
                    tracing::error!(
                        key = %removed.key,
                        role = %role_name,
                        "dual-write failed after permission delete, graph is inconsistent"
                    );
                    ServiceError::internal("delete_permission dual-write", e)
                })?;
        }

        self.log_activity(
            actor,
            "Deleted Permission",
            &format!("Permission: {}", removed.key),
        )
        .await;
        Ok(removed)
    }

    /// Rebuild every permission's role set from the role side as ground truth
    ///
    /// Repair pass bounding the inconsistency window a failed dual-write can
    /// leave behind. Run at startup and callable on demand. Returns the
    /// number of permissions rewritten.
    pub async fn reconcile_permission_index(&self) -> Result<usize, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let roles = self.roles.all().await?;
        let permissions = self.permissions.all().await?;
        let mut repaired = 0;

        for perm in &permissions {
            let mut derived: Vec<String> = roles
                .iter()
                .filter(|r| parse_string_set(&r.permissions).iter().any(|k| k == &perm.key))
                .map(|r| r.name.clone())
                .collect();
            derived.sort();

            let mut stored = parse_string_set(&perm.roles);
            stored.sort();

            if stored != derived {
                tracing::info!(key = %perm.key, "reconciling stale permission role set");
                self.permissions
                    .replace_role_names(&perm.id, &derived)
                    .await?;
                repaired += 1;
            }
        }

        Ok(repaired)
    }

    /// Report every violated pair of the bidirectional invariant
    ///
    /// Diagnostic companion to `reconcile_permission_index`: checks, for all
    /// role/permission pairs where both records exist, that each side lists
    /// the other consistently.
    pub async fn audit_consistency(&self) -> Result<Vec<String>, ServiceError> {
        let roles = self.roles.all().await?;
        let permissions = self.permissions.all().await?;
        let mut violations = Vec::new();

        for r in &roles {
            let keys = parse_string_set(&r.permissions);
            for p in &permissions {
                let names = parse_string_set(&p.roles);
                let role_lists_key = keys.iter().any(|k| k == &p.key);
                let perm_lists_role = names.iter().any(|n| n == &r.name);
                if role_lists_key != perm_lists_role {
                    violations.push(format!(
                        "role '{}' / permission '{}': role side {}, permission side {}",
                        r.name, p.key, role_lists_key, perm_lists_role
                    ));
                }
            }
        }

        Ok(violations)
    }
}

impl std::fmt::Debug for GraphService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphService").finish_non_exhaustive()
    }
}
