use poem_openapi::{param::Path, payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::api::{authenticate, SessionAuth};
use crate::errors::ApiError;
use crate::services::{IdentityService, SessionService};
use crate::types::dto::common::DeleteResponse;
use crate::types::dto::user::{
    CreateUserRequest, CreateUserResult, UpdateUserRequest, UpdateUserResult, UserDto,
};

/// User management API endpoints
pub struct UserApi {
    identity_service: Arc<IdentityService>,
    sessions: Arc<SessionService>,
}

impl UserApi {
    pub fn new(identity_service: Arc<IdentityService>, sessions: Arc<SessionService>) -> Self {
        Self {
            identity_service,
            sessions,
        }
    }
}

/// API tags for user endpoints
#[derive(Tags)]
enum UserTags {
    /// User management endpoints
    Users,
}

#[derive(ApiResponse)]
pub enum UserCreatedResponse {
    #[oai(status = 201)]
    Created(Json<CreateUserResult>),
}

#[OpenApi(prefix_path = "/users")]
impl UserApi {
    /// List all user profiles
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list(&self, auth: SessionAuth) -> Result<Json<Vec<UserDto>>, ApiError> {
        authenticate(&self.sessions, &auth)?;
        let users = self.identity_service.list_users().await?;
        Ok(Json(users.into_iter().map(UserDto::from).collect()))
    }

    /// Create a user profile together with its login credential
    #[oai(path = "/", method = "post", tag = "UserTags::Users")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<UserCreatedResponse, ApiError> {
        let claims = authenticate(&self.sessions, &auth)?;
        let created = self.identity_service.create_user(&claims.sub, body.0).await?;

        Ok(UserCreatedResponse::Created(Json(CreateUserResult {
            message: "User created successfully".to_string(),
            user: created.into(),
            needs_refresh: true,
        })))
    }

    /// Update an allow-listed subset of a user's profile
    #[oai(path = "/:id", method = "put", tag = "UserTags::Users")]
    async fn update(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UpdateUserResult>, ApiError> {
        let claims = authenticate(&self.sessions, &auth)?;
        let updated = self
            .identity_service
            .update_user(&claims.sub, &id.0, body.0)
            .await?;

        Ok(Json(UpdateUserResult {
            user: updated.into(),
            needs_refresh: true,
        }))
    }

    /// Delete a user profile and its credential
    #[oai(path = "/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<DeleteResponse>, ApiError> {
        let claims = authenticate(&self.sessions, &auth)?;
        self.identity_service.delete_user(&claims.sub, &id.0).await?;

        Ok(Json(DeleteResponse {
            message: "User deleted successfully".to_string(),
            needs_refresh: true,
        }))
    }
}
