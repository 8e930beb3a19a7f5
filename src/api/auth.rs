use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::api::{authenticate, SessionAuth};
use crate::errors::ApiError;
use crate::services::{AuthService, IdentityService, SessionService};
use crate::types::dto::auth::{
    CurrentUserResponse, LoginRequest, LoginSuccess, RegisterAdminRequest,
};
use crate::types::dto::common::MessageResponse;

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
    identity_service: Arc<IdentityService>,
    sessions: Arc<SessionService>,
}

impl AuthApi {
    pub fn new(
        auth_service: Arc<AuthService>,
        identity_service: Arc<IdentityService>,
        sessions: Arc<SessionService>,
    ) -> Self {
        Self {
            auth_service,
            identity_service,
            sessions,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

/// Successful login, delivering the session cookie
#[derive(Debug, ApiResponse)]
pub enum LoginResponse {
    #[oai(status = 200)]
    Ok(Json<LoginSuccess>, #[oai(header = "Set-Cookie")] String),
}

/// Successful logout, clearing the session cookie
#[derive(ApiResponse)]
pub enum LogoutResponse {
    #[oai(status = 200)]
    Ok(Json<MessageResponse>, #[oai(header = "Set-Cookie")] String),
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with username and password to receive a session cookie
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<LoginResponse, ApiError> {
        let (user, token) = self.auth_service.login(&body.username, &body.password).await?;

        Ok(LoginResponse::Ok(
            Json(LoginSuccess {
                message: "Login successful".to_string(),
                user,
            }),
            self.sessions.session_cookie(&token),
        ))
    }

    /// Profile and resolved permission set for the active session
    #[oai(
        path = "/current-user",
        method = "get",
        tag = "AuthTags::Authentication"
    )]
    async fn current_user(
        &self,
        auth: SessionAuth,
    ) -> Result<Json<CurrentUserResponse>, ApiError> {
        let claims = authenticate(&self.sessions, &auth)?;
        let current = self.auth_service.current_user(&claims).await?;
        Ok(Json(current))
    }

    /// Logout by instructing the client to discard its session cookie
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self) -> Result<LogoutResponse, ApiError> {
        Ok(LogoutResponse::Ok(
            Json(MessageResponse {
                message: "Logged out successfully".to_string(),
            }),
            self.sessions.clear_cookie(),
        ))
    }

    /// Register the bootstrap administrator account
    #[oai(
        path = "/register-admin",
        method = "post",
        tag = "AuthTags::Authentication"
    )]
    async fn register_admin(
        &self,
        body: Json<RegisterAdminRequest>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        self.identity_service
            .register_admin(&body.username, &body.password, &body.name, &body.email)
            .await?;
        Ok(Json(MessageResponse {
            message: "Admin registered successfully".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SESSION_COOKIE;
    use crate::stores::{ActivityStore, CredentialStore, IdentityStore, RoleStore};
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::ApiKey;
    use sea_orm::Database;

    async fn setup_api() -> AuthApi {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let credentials = Arc::new(CredentialStore::new(db.clone(), "test-pepper".to_string()));
        let identities = Arc::new(IdentityStore::new(db.clone()));
        let roles = Arc::new(RoleStore::new(db.clone()));
        let activities = Arc::new(ActivityStore::new(db));
        let sessions = Arc::new(SessionService::new(
            "test-session-secret-minimum-32-chars".to_string(),
        ));

        AuthApi::new(
            Arc::new(AuthService::new(
                credentials.clone(),
                identities.clone(),
                roles,
                activities.clone(),
                sessions.clone(),
            )),
            Arc::new(IdentityService::new(identities, credentials, activities)),
            sessions,
        )
    }

    async fn register(api: &AuthApi) {
        api.register_admin(Json(RegisterAdminRequest {
            name: "Admin".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "secret123".to_string(),
        }))
        .await
        .expect("Failed to register admin");
    }

    fn cookie_token(cookie: &str) -> String {
        let pair = cookie.split(';').next().unwrap();
        pair.strip_prefix(&format!("{}=", SESSION_COOKIE))
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let api = setup_api().await;
        register(&api).await;

        let LoginResponse::Ok(body, cookie) = api
            .login(Json(LoginRequest {
                username: "admin".to_string(),
                password: "secret123".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(body.0.message, "Login successful");
        assert_eq!(body.0.user.username, "admin");
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_login_invalid_username_is_401() {
        let api = setup_api().await;
        register(&api).await;

        let result = api
            .login(Json(LoginRequest {
                username: "nobody".to_string(),
                password: "secret123".to_string(),
            }))
            .await;

        match result {
            Err(ApiError::Unauthorized(json)) => assert_eq!(json.0.error, "Invalid username"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_invalid_password_is_401() {
        let api = setup_api().await;
        register(&api).await;

        let result = api
            .login(Json(LoginRequest {
                username: "admin".to_string(),
                password: "wrong".to_string(),
            }))
            .await;

        match result {
            Err(ApiError::Unauthorized(json)) => assert_eq!(json.0.error, "Invalid password"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_current_user_round_trip() {
        let api = setup_api().await;
        register(&api).await;

        let LoginResponse::Ok(_, cookie) = api
            .login(Json(LoginRequest {
                username: "admin".to_string(),
                password: "secret123".to_string(),
            }))
            .await
            .unwrap();

        let auth = SessionAuth(ApiKey {
            key: cookie_token(&cookie),
        });
        let current = api.current_user(auth).await.unwrap();
        assert_eq!(current.0.username, "admin");
        assert_eq!(current.0.role, "Admin");
        // No Admin role record exists yet, so no permissions resolve
        assert!(current.0.permissions.is_empty());
    }

    #[tokio::test]
    async fn test_current_user_with_bad_token_is_403() {
        let api = setup_api().await;
        let auth = SessionAuth(ApiKey {
            key: "not-a-jwt".to_string(),
        });

        let result = api.current_user(auth).await;
        match result {
            Err(ApiError::Forbidden(json)) => assert_eq!(json.0.error, "Invalid token"),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let api = setup_api().await;
        let LogoutResponse::Ok(body, cookie) = api.logout().await.unwrap();
        assert_eq!(body.0.message, "Logged out successfully");
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_register_admin_duplicate_username_is_400() {
        let api = setup_api().await;
        register(&api).await;

        let result = api
            .register_admin(Json(RegisterAdminRequest {
                name: "Other".to_string(),
                username: "admin".to_string(),
                email: "other@example.com".to_string(),
                password: "secret456".to_string(),
            }))
            .await;

        match result {
            Err(ApiError::BadRequest(json)) => {
                assert_eq!(json.0.error, "Username already exists")
            }
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }
}
