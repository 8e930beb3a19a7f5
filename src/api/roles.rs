use poem_openapi::{param::Path, payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::api::{authenticate, SessionAuth};
use crate::errors::ApiError;
use crate::services::{GraphService, SessionService};
use crate::types::dto::common::DeleteResponse;
use crate::types::dto::role::{
    CreateRoleRequest, CreateRoleResult, RoleDto, UpdateRoleRequest, UpdateRoleResult,
};

/// Role management API endpoints
///
/// All mutations go through the sync service so the permission-side index
/// stays consistent, and all mutation responses carry `needsRefresh`.
pub struct RoleApi {
    graph: Arc<GraphService>,
    sessions: Arc<SessionService>,
}

impl RoleApi {
    pub fn new(graph: Arc<GraphService>, sessions: Arc<SessionService>) -> Self {
        Self { graph, sessions }
    }
}

/// API tags for role endpoints
#[derive(Tags)]
enum RoleTags {
    /// Role management endpoints
    Roles,
}

#[derive(Debug, ApiResponse)]
pub enum RoleCreatedResponse {
    #[oai(status = 201)]
    Created(Json<CreateRoleResult>),
}

#[OpenApi(prefix_path = "/roles")]
impl RoleApi {
    /// List all roles
    #[oai(path = "/", method = "get", tag = "RoleTags::Roles")]
    async fn list(&self, auth: SessionAuth) -> Result<Json<Vec<RoleDto>>, ApiError> {
        authenticate(&self.sessions, &auth)?;
        let roles = self.graph.list_roles().await?;
        Ok(Json(roles.into_iter().map(RoleDto::from).collect()))
    }

    /// Create a role, linking its name into every listed permission
    #[oai(path = "/", method = "post", tag = "RoleTags::Roles")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateRoleRequest>,
    ) -> Result<RoleCreatedResponse, ApiError> {
        let claims = authenticate(&self.sessions, &auth)?;
        let created = self
            .graph
            .create_role(
                &claims.sub,
                &body.name,
                &body.permissions,
                &body.status,
                &body.created_by,
            )
            .await?;

        Ok(RoleCreatedResponse::Created(Json(CreateRoleResult {
            role: created.into(),
            needs_refresh: true,
        })))
    }

    /// Update a role, propagating the permission-set diff
    #[oai(path = "/:id", method = "put", tag = "RoleTags::Roles")]
    async fn update(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdateRoleRequest>,
    ) -> Result<Json<UpdateRoleResult>, ApiError> {
        let claims = authenticate(&self.sessions, &auth)?;
        let updated = self
            .graph
            .update_role(&claims.sub, &id.0, &body.name, &body.permissions, &body.status)
            .await?;

        Ok(Json(UpdateRoleResult {
            updated_role: updated.into(),
            needs_refresh: true,
        }))
    }

    /// Delete a role, stripping it from every permission it held
    #[oai(path = "/:id", method = "delete", tag = "RoleTags::Roles")]
    async fn delete(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<DeleteResponse>, ApiError> {
        let claims = authenticate(&self.sessions, &auth)?;
        self.graph.delete_role(&claims.sub, &id.0).await?;

        Ok(Json(DeleteResponse {
            message: "Role deleted successfully".to_string(),
            needs_refresh: true,
        }))
    }
}
