use chrono::Utc;
use std::sync::Arc;

use crate::errors::ServiceError;
use crate::services::SessionService;
use crate::stores::{ActivityStore, CredentialStore, IdentityStore, RoleStore};
use crate::types::dto::auth::{CurrentUserResponse, LoginUser};
use crate::types::internal::Claims;
use crate::types::parse_string_set;

/// Authenticates operators and resolves their capability sets
///
/// `current_user` is the composite the client calls after login and after
/// any `needsRefresh` signal to rebuild its local permission cache.
pub struct AuthService {
    credentials: Arc<CredentialStore>,
    identities: Arc<IdentityStore>,
    roles: Arc<RoleStore>,
    activities: Arc<ActivityStore>,
    sessions: Arc<SessionService>,
}

impl AuthService {
    pub fn new(
        credentials: Arc<CredentialStore>,
        identities: Arc<IdentityStore>,
        roles: Arc<RoleStore>,
        activities: Arc<ActivityStore>,
        sessions: Arc<SessionService>,
    ) -> Self {
        Self {
            credentials,
            identities,
            roles,
            activities,
            sessions,
        }
    }

    /// Verify credentials and issue a session token
    ///
    /// Distinguishes unknown username from wrong password in the error; the
    /// dashboard's login dialog shows each message. Records the login
    /// timestamp and appends a "Logged In" activity, both best-effort.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(LoginUser, String), ServiceError> {
        let cred = self.credentials.verify(username, password).await?;

        let identity = self
            .identities
            .find_by_id(&cred.identity_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;

        let token = self.sessions.issue(&identity.id)?;

        if let Err(e) = self
            .identities
            .set_last_login(&identity.id, Utc::now().timestamp())
            .await
        {
            tracing::warn!(username = %identity.username, "failed to record last login: {}", e);
        }
        if let Err(e) = self
            .activities
            .record(
                &identity.id,
                "Logged In",
                &format!("User: {}", identity.username),
            )
            .await
        {
            tracing::warn!(username = %identity.username, "activity log write failed: {}", e);
        }

        Ok((
            LoginUser {
                name: identity.name,
                username: identity.username,
                role: identity.role,
                email: identity.email,
                user_id: identity.id,
            },
            token,
        ))
    }

    /// Resolve the profile and permission set for a verified session
    ///
    /// Dereferences the identity's role by name; an identity whose role
    /// record no longer exists resolves to an empty permission set.
    pub async fn current_user(&self, claims: &Claims) -> Result<CurrentUserResponse, ServiceError> {
        let identity = self
            .identities
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;

        let permissions = match self.roles.find_by_name(&identity.role).await? {
            Some(role) => parse_string_set(&role.permissions),
            None => Vec::new(),
        };

        Ok(CurrentUserResponse {
            name: identity.name,
            username: identity.username,
            email: identity.email,
            role: identity.role,
            status: identity.status,
            user_id: identity.id,
            permissions,
        })
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}
