use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::types::db::permission::{self, ActiveModel, Entity as Permission};
use crate::types::{encode_string_set, parse_string_set};

/// PermissionStore manages Permission records, the mirror side of the access graph
///
/// Each record carries the names of the roles holding it in a JSON text
/// column, maintained by the graph sync service as the role side changes.
pub struct PermissionStore {
    db: DatabaseConnection,
}

impl PermissionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        key: &str,
        description: &str,
        role_names: &[String],
    ) -> Result<permission::Model, ServiceError> {
        let record = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            key: Set(key.to_string()),
            description: Set(description.to_string()),
            roles: Set(encode_string_set(role_names)),
        };

        record.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ServiceError::conflict("Permission key")
            } else {
                ServiceError::internal("insert_permission", e)
            }
        })
    }

    pub async fn all(&self) -> Result<Vec<permission::Model>, ServiceError> {
        Permission::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::internal("list_permissions", e))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<permission::Model>, ServiceError> {
        Permission::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::internal("find_permission", e))
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<permission::Model>, ServiceError> {
        Permission::find()
            .filter(permission::Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::internal("find_permission", e))
    }

    /// Replace a permission's definition (key, description, role-name set)
    pub async fn update_definition(
        &self,
        id: &str,
        key: &str,
        description: &str,
        role_names: &[String],
    ) -> Result<permission::Model, ServiceError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Permission"))?;

        let mut record: ActiveModel = existing.into();
        record.key = Set(key.to_string());
        record.description = Set(description.to_string());
        record.roles = Set(encode_string_set(role_names));

        record.update(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ServiceError::conflict("Permission key")
            } else {
                ServiceError::internal("update_permission", e)
            }
        })
    }

    /// Delete a permission, returning the removed record
    pub async fn delete_by_id(&self, id: &str) -> Result<permission::Model, ServiceError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Permission"))?;

        Permission::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::internal("delete_permission", e))?;

        Ok(existing)
    }

    /// Add a role name to the keyed permission's role set
    ///
    /// Returns `false` when no permission with that key exists - a role may
    /// reference keys that do not (yet) resolve to Permission records.
    pub async fn add_role_name(&self, key: &str, role_name: &str) -> Result<bool, ServiceError> {
        let Some(existing) = self.find_by_key(key).await? else {
            return Ok(false);
        };

        let mut names = parse_string_set(&existing.roles);
        if !names.iter().any(|n| n == role_name) {
            names.push(role_name.to_string());
            let mut record: ActiveModel = existing.into();
            record.roles = Set(encode_string_set(&names));
            record
                .update(&self.db)
                .await
                .map_err(|e| ServiceError::internal("add_role_name", e))?;
        }
        Ok(true)
    }

    /// Remove a role name from the keyed permission's role set
    pub async fn remove_role_name(&self, key: &str, role_name: &str) -> Result<bool, ServiceError> {
        let Some(existing) = self.find_by_key(key).await? else {
            return Ok(false);
        };

        let mut names = parse_string_set(&existing.roles);
        let before = names.len();
        names.retain(|n| n != role_name);
        if names.len() != before {
            let mut record: ActiveModel = existing.into();
            record.roles = Set(encode_string_set(&names));
            record
                .update(&self.db)
                .await
                .map_err(|e| ServiceError::internal("remove_role_name", e))?;
        }
        Ok(true)
    }

    /// Overwrite the stored role-name set, used by the reconciliation pass
    pub async fn replace_role_names(
        &self,
        id: &str,
        role_names: &[String],
    ) -> Result<(), ServiceError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Permission"))?;

        let mut record: ActiveModel = existing.into();
        record.roles = Set(encode_string_set(role_names));
        record
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::internal("replace_role_names", e))?;
        Ok(())
    }
}

impl std::fmt::Debug for PermissionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionStore")
            .field("db", &"<connection>")
            .finish()
    }
}
