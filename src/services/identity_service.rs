use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::ServiceError;
use crate::stores::{ActivityStore, CredentialStore, IdentityStore, NewIdentity, ProfileUpdate};
use crate::types::db::identity;
use crate::types::dto::user::{CreateUserRequest, UpdateUserRequest};

const DISPLAY_ID_PREFIX: &str = "user";

/// Parse the numeric sequence out of a `userNNN` display id
///
/// Only exact three-digit ids count; anything else is ignored by the
/// max-scan so a hand-edited row cannot poison allocation.
fn parse_display_seq(display_id: &str) -> Option<u32> {
    let digits = display_id.strip_prefix(DISPLAY_ID_PREFIX)?;
    if digits.len() != 3 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Next display id given every id currently allocated
fn next_display_id(existing: &[String]) -> String {
    let max = existing
        .iter()
        .filter_map(|id| parse_display_seq(id))
        .max()
        .unwrap_or(0);
    format!("{}{:03}", DISPLAY_ID_PREFIX, max + 1)
}

/// Manages the identity lifecycle: creation with credential, profile
/// updates, and deletion
///
/// Display-id allocation scans existing ids for the maximum sequence and
/// is serialized behind a mutex so concurrent creates cannot race to the
/// same number.
pub struct IdentityService {
    identities: Arc<IdentityStore>,
    credentials: Arc<CredentialStore>,
    activities: Arc<ActivityStore>,
    allocation_lock: Mutex<()>,
}

impl IdentityService {
    pub fn new(
        identities: Arc<IdentityStore>,
        credentials: Arc<CredentialStore>,
        activities: Arc<ActivityStore>,
    ) -> Self {
        Self {
            identities,
            credentials,
            activities,
            allocation_lock: Mutex::new(()),
        }
    }

    async fn log_activity(&self, actor_id: &str, action: &str, target: &str) {
        if let Err(e) = self.activities.record(actor_id, action, target).await {
            tracing::warn!(action, target, "activity log write failed: {}", e);
        }
    }

    pub async fn list_users(&self) -> Result<Vec<identity::Model>, ServiceError> {
        self.identities.all().await
    }

    /// Create an identity together with its login credential
    ///
    /// Rejects a username already held by an identity or a credential.
    /// The identity row is written first; if the credential write then
    /// fails the orphaned profile is logged and surfaced as an internal
    /// error rather than rolled back.
    pub async fn create_user(
        &self,
        actor_id: &str,
        request: CreateUserRequest,
    ) -> Result<identity::Model, ServiceError> {
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(ServiceError::validation(
                "Username and password are required",
            ));
        }

        let _guard = self.allocation_lock.lock().await;

        if self
            .identities
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(ServiceError::conflict("Username"));
        }

        let user_id = next_display_id(&self.identities.display_ids().await?);

        let created = self
            .identities
            .insert(NewIdentity {
                user_id,
                name: request.name,
                email: request.email,
                username: request.username.clone(),
                phone: request.phone,
                role: request.role,
                status: request.status,
            })
            .await?;

        if let Err(e) = self
            .credentials
            .create(&request.username, &request.password, &created.id)
            .await
        {
            tracing::error!(
                username = %created.username,
                identity_id = %created.id,
                "credential write failed, identity is orphaned: {}",
                e
            );
            return Err(match e {
                ServiceError::Conflict(_) => e,
                other => ServiceError::internal("create_user", other),
            });
        }

        tracing::info!(user_id = %created.user_id, username = %created.username, "Created user");
        self.log_activity(
            actor_id,
            "Created User",
            &format!("User: {} ({})", created.user_id, created.username),
        )
        .await;

        Ok(created)
    }

    /// Apply an allow-listed profile update
    pub async fn update_user(
        &self,
        actor_id: &str,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<identity::Model, ServiceError> {
        let updated = self
            .identities
            .update_profile(
                id,
                ProfileUpdate {
                    name: request.name,
                    email: request.email,
                    phone: request.phone,
                    role: request.role,
                    status: request.status,
                },
            )
            .await?;

        self.log_activity(
            actor_id,
            "Updated User",
            &format!("User: {} ({})", updated.user_id, updated.username),
        )
        .await;

        Ok(updated)
    }

    /// Delete an identity and its credential
    pub async fn delete_user(
        &self,
        actor_id: &str,
        id: &str,
    ) -> Result<identity::Model, ServiceError> {
        let removed = self.identities.delete_by_id(id).await?;
        self.credentials.delete_by_identity(&removed.id).await?;

        tracing::info!(user_id = %removed.user_id, username = %removed.username, "Deleted user");
        self.log_activity(
            actor_id,
            "Deleted User",
            &format!("User: {} ({})", removed.user_id, removed.username),
        )
        .await;

        Ok(removed)
    }

    /// Seed the bootstrap administrator account on first boot
    ///
    /// Self-attributed in the activity feed since no operator exists yet.
    pub async fn register_admin(
        &self,
        username: &str,
        password: &str,
        name: &str,
        email: &str,
    ) -> Result<identity::Model, ServiceError> {
        let created = self
            .create_user(
                "system",
                CreateUserRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                    name: name.to_string(),
                    email: email.to_string(),
                    phone: String::new(),
                    role: "Admin".to_string(),
                    status: "Active".to_string(),
                },
            )
            .await?;
        Ok(created)
    }
}

impl std::fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityService").finish_non_exhaustive()
    }
}
