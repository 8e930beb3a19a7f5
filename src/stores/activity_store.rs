use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};

use crate::errors::ServiceError;
use crate::types::db::activity::{self, ActiveModel, Entity as Activity};

/// ActivityStore appends and reads the audit feed
///
/// Append-only: records are never updated or deleted, and growth is
/// unbounded by design.
pub struct ActivityStore {
    db: DatabaseConnection,
}

impl ActivityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one activity record, timestamped now
    pub async fn record(
        &self,
        identity_id: &str,
        action: &str,
        target: &str,
    ) -> Result<(), ServiceError> {
        let record = ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            identity_id: Set(identity_id.to_string()),
            action: Set(action.to_string()),
            target: Set(target.to_string()),
            timestamp: Set(Utc::now().timestamp()),
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::internal("record_activity", e))?;
        Ok(())
    }

    /// The newest `limit` records, newest-first
    pub async fn recent(&self, limit: u64) -> Result<Vec<activity::Model>, ServiceError> {
        Activity::find()
            .order_by_desc(activity::Column::Timestamp)
            .order_by_desc(activity::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::internal("list_activities", e))
    }
}

impl std::fmt::Debug for ActivityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityStore")
            .field("db", &"<connection>")
            .finish()
    }
}
