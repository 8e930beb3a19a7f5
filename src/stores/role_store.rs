use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::types::db::role::{self, ActiveModel, Entity as Role};
use crate::types::{encode_string_set, parse_string_set};

/// RoleStore manages Role records, one side of the access graph
///
/// The permission-key set lives in a JSON text column. The link-maintenance
/// primitives (`add_permission_key` / `remove_permission_key`) are set
/// operations: adds are deduplicated, removes of absent keys are no-ops.
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        name: &str,
        permission_keys: &[String],
        status: &str,
        created_by: &str,
    ) -> Result<role::Model, ServiceError> {
        let record = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            permissions: Set(encode_string_set(permission_keys)),
            status: Set(status.to_string()),
            created_by: Set(created_by.to_string()),
            users: Set(0),
            last_updated: Set(Utc::now().timestamp()),
        };

        record.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ServiceError::conflict("Role name")
            } else {
                ServiceError::internal("insert_role", e)
            }
        })
    }

    pub async fn all(&self) -> Result<Vec<role::Model>, ServiceError> {
        Role::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::internal("list_roles", e))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<role::Model>, ServiceError> {
        Role::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::internal("find_role", e))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<role::Model>, ServiceError> {
        Role::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::internal("find_role", e))
    }

    /// Replace a role's definition (name, permission keys, status)
    ///
    /// `last_updated` is refreshed; the user count is left alone.
    pub async fn update_definition(
        &self,
        id: &str,
        name: &str,
        permission_keys: &[String],
        status: &str,
    ) -> Result<role::Model, ServiceError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role"))?;

        let mut record: ActiveModel = existing.into();
        record.name = Set(name.to_string());
        record.permissions = Set(encode_string_set(permission_keys));
        record.status = Set(status.to_string());
        record.last_updated = Set(Utc::now().timestamp());

        record.update(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ServiceError::conflict("Role name")
            } else {
                ServiceError::internal("update_role", e)
            }
        })
    }

    /// Delete a role, returning the removed record
    pub async fn delete_by_id(&self, id: &str) -> Result<role::Model, ServiceError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role"))?;

        Role::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::internal("delete_role", e))?;

        Ok(existing)
    }

    /// Add a permission key to the named role's key set
    ///
    /// Returns `false` when no role with that name exists - the caller treats
    /// a missing role as a no-op, not an error.
    pub async fn add_permission_key(
        &self,
        role_name: &str,
        key: &str,
    ) -> Result<bool, ServiceError> {
        let Some(existing) = self.find_by_name(role_name).await? else {
            return Ok(false);
        };

        let mut keys = parse_string_set(&existing.permissions);
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
            let mut record: ActiveModel = existing.into();
            record.permissions = Set(encode_string_set(&keys));
            record
                .update(&self.db)
                .await
                .map_err(|e| ServiceError::internal("add_permission_key", e))?;
        }
        Ok(true)
    }

    /// Remove a permission key from the named role's key set
    pub async fn remove_permission_key(
        &self,
        role_name: &str,
        key: &str,
    ) -> Result<bool, ServiceError> {
        let Some(existing) = self.find_by_name(role_name).await? else {
            return Ok(false);
        };

        let mut keys = parse_string_set(&existing.permissions);
        let before = keys.len();
        keys.retain(|k| k != key);
        if keys.len() != before {
            let mut record: ActiveModel = existing.into();
            record.permissions = Set(encode_string_set(&keys));
            record
                .update(&self.db)
                .await
                .map_err(|e| ServiceError::internal("remove_permission_key", e))?;
        }
        Ok(true)
    }
}

impl std::fmt::Debug for RoleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleStore").field("db", &"<connection>").finish()
    }
}
