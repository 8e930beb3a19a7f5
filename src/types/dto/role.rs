use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::role;
use crate::types::dto::common::format_timestamp;
use crate::types::parse_string_set;

/// Role record as rendered by the dashboard
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct RoleDto {
    pub id: String,
    pub name: String,

    /// Permission keys held by this role
    pub permissions: Vec<String>,

    pub status: String,
    pub created_by: String,

    /// Denormalized identity count
    pub users: i32,

    pub last_updated: String,
}

impl From<role::Model> for RoleDto {
    fn from(m: role::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            permissions: parse_string_set(&m.permissions),
            status: m.status,
            created_by: m.created_by,
            users: m.users,
            last_updated: format_timestamp(m.last_updated),
        }
    }
}

/// Request model for role creation
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub name: String,

    #[oai(default)]
    #[serde(default)]
    pub permissions: Vec<String>,

    pub status: String,

    #[oai(default)]
    #[serde(default)]
    pub created_by: String,
}

/// Request model for role update
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: String,

    #[oai(default)]
    #[serde(default)]
    pub permissions: Vec<String>,

    pub status: String,
}

/// Response for role creation
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleResult {
    pub role: RoleDto,
    pub needs_refresh: bool,
}

/// Response for role update
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleResult {
    pub updated_role: RoleDto,
    pub needs_refresh: bool,
}
