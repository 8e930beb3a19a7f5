use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::types::db::identity::{self, ActiveModel, Entity as Identity};

/// Allow-listed profile fields for update; `None` leaves the field unchanged
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// Fields supplied when creating an identity; ids and timestamps are store-assigned
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub role: String,
    pub status: String,
}

/// IdentityStore manages user profile records
pub struct IdentityStore {
    db: DatabaseConnection,
}

impl IdentityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new identity record
    ///
    /// The internal id is a fresh UUID; `created` is set to now.
    pub async fn insert(&self, new: NewIdentity) -> Result<identity::Model, ServiceError> {
        let record = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(new.user_id),
            name: Set(new.name),
            email: Set(new.email),
            username: Set(new.username),
            phone: Set(new.phone),
            role: Set(new.role),
            status: Set(new.status),
            created: Set(Utc::now().timestamp()),
            last_login: Set(None),
        };

        record.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ServiceError::conflict("UserId")
            } else {
                ServiceError::internal("insert_identity", e)
            }
        })
    }

    pub async fn all(&self) -> Result<Vec<identity::Model>, ServiceError> {
        Identity::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::internal("list_identities", e))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<identity::Model>, ServiceError> {
        Identity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::internal("find_identity", e))
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<identity::Model>, ServiceError> {
        Identity::find()
            .filter(identity::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::internal("find_identity", e))
    }

    /// All display ids currently allocated, for max-scan allocation
    pub async fn display_ids(&self) -> Result<Vec<String>, ServiceError> {
        let identities = self.all().await?;
        Ok(identities.into_iter().map(|m| m.user_id).collect())
    }

    /// Apply an allow-listed profile update
    ///
    /// # Returns
    /// * `Ok(Model)` - The updated identity
    /// * `Err(ServiceError::NotFound)` - No identity with that id
    pub async fn update_profile(
        &self,
        id: &str,
        updates: ProfileUpdate,
    ) -> Result<identity::Model, ServiceError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;

        let mut record: ActiveModel = existing.into();
        if let Some(name) = updates.name {
            record.name = Set(name);
        }
        if let Some(email) = updates.email {
            record.email = Set(email);
        }
        if let Some(phone) = updates.phone {
            record.phone = Set(phone);
        }
        if let Some(role) = updates.role {
            record.role = Set(role);
        }
        if let Some(status) = updates.status {
            record.status = Set(status);
        }

        record
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::internal("update_identity", e))
    }

    /// Record a successful login timestamp
    pub async fn set_last_login(&self, id: &str, timestamp: i64) -> Result<(), ServiceError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;

        let mut record: ActiveModel = existing.into();
        record.last_login = Set(Some(timestamp));
        record
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::internal("set_last_login", e))?;
        Ok(())
    }

    /// Delete an identity, returning the removed record
    pub async fn delete_by_id(&self, id: &str) -> Result<identity::Model, ServiceError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;

        Identity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::internal("delete_identity", e))?;

        Ok(existing)
    }
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityStore")
            .field("db", &"<connection>")
            .finish()
    }
}
