use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::permission;
use crate::types::parse_string_set;

/// Permission record as rendered by the dashboard
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct PermissionDto {
    pub id: String,
    pub key: String,
    pub description: String,

    /// Names of roles holding this permission
    pub roles: Vec<String>,
}

impl From<permission::Model> for PermissionDto {
    fn from(m: permission::Model) -> Self {
        Self {
            id: m.id,
            key: m.key,
            description: m.description,
            roles: parse_string_set(&m.roles),
        }
    }
}

/// Request model for permission creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreatePermissionRequest {
    pub key: String,

    #[oai(default)]
    pub description: String,

    #[oai(default)]
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Request model for permission update
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdatePermissionRequest {
    pub key: String,

    #[oai(default)]
    pub description: String,

    #[oai(default)]
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Response for permission creation
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct CreatePermissionResult {
    pub permission: PermissionDto,
    pub needs_refresh: bool,
}

/// Response for permission update
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionResult {
    pub updated_permission: PermissionDto,
    pub needs_refresh: bool,
}
