use poem_openapi::{param::Path, payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::api::{authenticate, SessionAuth};
use crate::errors::ApiError;
use crate::services::{GraphService, SessionService};
use crate::types::dto::common::DeleteResponse;
use crate::types::dto::permission::{
    CreatePermissionRequest, CreatePermissionResult, PermissionDto, UpdatePermissionRequest,
    UpdatePermissionResult,
};

/// Permission management API endpoints
pub struct PermissionApi {
    graph: Arc<GraphService>,
    sessions: Arc<SessionService>,
}

impl PermissionApi {
    pub fn new(graph: Arc<GraphService>, sessions: Arc<SessionService>) -> Self {
        Self { graph, sessions }
    }
}

/// API tags for permission endpoints
#[derive(Tags)]
enum PermissionTags {
    /// Permission management endpoints
    Permissions,
}

#[derive(Debug, ApiResponse)]
pub enum PermissionCreatedResponse {
    #[oai(status = 201)]
    Created(Json<CreatePermissionResult>),
}

#[OpenApi(prefix_path = "/permissions")]
impl PermissionApi {
    /// List all permissions
    #[oai(path = "/", method = "get", tag = "PermissionTags::Permissions")]
    async fn list(&self, auth: SessionAuth) -> Result<Json<Vec<PermissionDto>>, ApiError> {
        authenticate(&self.sessions, &auth)?;
        let permissions = self.graph.list_permissions().await?;
        Ok(Json(
            permissions.into_iter().map(PermissionDto::from).collect(),
        ))
    }

    /// Create a permission, linking its key into every listed role
    #[oai(path = "/", method = "post", tag = "PermissionTags::Permissions")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreatePermissionRequest>,
    ) -> Result<PermissionCreatedResponse, ApiError> {
        let claims = authenticate(&self.sessions, &auth)?;
        let created = self
            .graph
            .create_permission(&claims.sub, &body.key, &body.description, &body.roles)
            .await?;

        Ok(PermissionCreatedResponse::Created(Json(
            CreatePermissionResult {
                permission: created.into(),
                needs_refresh: true,
            },
        )))
    }

    /// Update a permission, propagating the role-set diff
    #[oai(path = "/:id", method = "put", tag = "PermissionTags::Permissions")]
    async fn update(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdatePermissionRequest>,
    ) -> Result<Json<UpdatePermissionResult>, ApiError> {
        let claims = authenticate(&self.sessions, &auth)?;
        let updated = self
            .graph
            .update_permission(&claims.sub, &id.0, &body.key, &body.description, &body.roles)
            .await?;

        Ok(Json(UpdatePermissionResult {
            updated_permission: updated.into(),
            needs_refresh: true,
        }))
    }

    /// Delete a permission, stripping it from every role holding it
    #[oai(path = "/:id", method = "delete", tag = "PermissionTags::Permissions")]
    async fn delete(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<DeleteResponse>, ApiError> {
        let claims = authenticate(&self.sessions, &auth)?;
        self.graph.delete_permission(&claims.sub, &id.0).await?;

        Ok(Json(DeleteResponse {
            message: "Permission deleted successfully".to_string(),
            needs_refresh: true,
        }))
    }
}
