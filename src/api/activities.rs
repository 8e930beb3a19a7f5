use poem_openapi::{payload::Json, OpenApi, Tags};
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{authenticate, SessionAuth};
use crate::errors::ApiError;
use crate::services::SessionService;
use crate::stores::{ActivityStore, IdentityStore};
use crate::types::dto::activity::{ActivityActor, ActivityDto};
use crate::types::dto::common::format_timestamp;

/// How many activities the dashboard feed shows
const FEED_LIMIT: u64 = 10;

/// Activity feed API endpoints
pub struct ActivityApi {
    activities: Arc<ActivityStore>,
    identities: Arc<IdentityStore>,
    sessions: Arc<SessionService>,
}

impl ActivityApi {
    pub fn new(
        activities: Arc<ActivityStore>,
        identities: Arc<IdentityStore>,
        sessions: Arc<SessionService>,
    ) -> Self {
        Self {
            activities,
            identities,
            sessions,
        }
    }
}

/// API tags for activity endpoints
#[derive(Tags)]
enum ActivityTags {
    /// Activity feed endpoints
    Activities,
}

#[OpenApi(prefix_path = "/activities")]
impl ActivityApi {
    /// The newest 10 activities, newest-first, with actor usernames resolved
    ///
    /// An actor whose identity has since been deleted renders as "unknown";
    /// the entry itself is kept.
    #[oai(path = "/", method = "get", tag = "ActivityTags::Activities")]
    async fn list(&self, auth: SessionAuth) -> Result<Json<Vec<ActivityDto>>, ApiError> {
        authenticate(&self.sessions, &auth)?;

        let records = self.activities.recent(FEED_LIMIT).await?;
        let usernames: HashMap<String, String> = self
            .identities
            .all()
            .await?
            .into_iter()
            .map(|m| (m.id, m.username))
            .collect();

        Ok(Json(
            records
                .into_iter()
                .map(|record| ActivityDto {
                    user_id: ActivityActor {
                        username: usernames
                            .get(&record.identity_id)
                            .cloned()
                            .unwrap_or_else(|| "unknown".to_string()),
                    },
                    action: record.action,
                    target: record.target,
                    timestamp: format_timestamp(record.timestamp),
                })
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::NewIdentity;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::ApiKey;
    use sea_orm::Database;

    async fn setup_api() -> ActivityApi {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        ActivityApi::new(
            Arc::new(ActivityStore::new(db.clone())),
            Arc::new(IdentityStore::new(db)),
            Arc::new(SessionService::new(
                "test-session-secret-minimum-32-chars".to_string(),
            )),
        )
    }

    fn auth(api: &ActivityApi) -> SessionAuth {
        SessionAuth(ApiKey {
            key: api.sessions.issue("actor").unwrap(),
        })
    }

    #[tokio::test]
    async fn test_feed_is_capped_at_ten_newest_first() {
        let api = setup_api().await;
        for i in 0..12 {
            api.activities
                .record("actor", "Created Role", &format!("Role: r{}", i))
                .await
                .unwrap();
        }

        let feed = api.list(auth(&api)).await.unwrap();
        assert_eq!(feed.0.len(), 10);
        assert_eq!(feed.0[0].target, "Role: r11");
    }

    #[tokio::test]
    async fn test_actor_username_is_populated() {
        let api = setup_api().await;
        let identity = api
            .identities
            .insert(NewIdentity {
                user_id: "user001".to_string(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                username: "alice".to_string(),
                phone: "".to_string(),
                role: "Admin".to_string(),
                status: "Active".to_string(),
            })
            .await
            .unwrap();
        api.activities
            .record(&identity.id, "Created Role", "Role: Editor")
            .await
            .unwrap();

        let feed = api.list(auth(&api)).await.unwrap();
        assert_eq!(feed.0[0].user_id.username, "alice");
    }

    #[tokio::test]
    async fn test_vanished_actor_renders_unknown() {
        let api = setup_api().await;
        api.activities
            .record("gone-identity", "Deleted Role", "Role: Editor")
            .await
            .unwrap();

        let feed = api.list(auth(&api)).await.unwrap();
        assert_eq!(feed.0[0].user_id.username, "unknown");
        assert_eq!(feed.0[0].action, "Deleted Role");
    }
}
