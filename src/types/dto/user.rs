use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::identity;
use crate::types::dto::common::format_timestamp;

/// Identity profile as rendered by the dashboard
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Internal identity id
    pub id: String,

    /// Human-facing display id (`user001`, `user002`, ...)
    pub user_id: String,

    pub name: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub role: String,
    pub status: String,
    pub created: String,
    pub last_login: Option<String>,
}

impl From<identity::Model> for UserDto {
    fn from(m: identity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            email: m.email,
            username: m.username,
            phone: m.phone,
            role: m.role,
            status: m.status,
            created: format_timestamp(m.created),
            last_login: m.last_login.map(format_timestamp),
        }
    }
}

/// Request model for creating an identity with its credential
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,

    #[oai(default)]
    pub name: String,

    #[oai(default)]
    pub email: String,

    #[oai(default)]
    pub phone: String,

    #[oai(default)]
    pub role: String,

    #[oai(default)]
    pub status: String,
}

/// Allow-listed profile fields; username and password never change here
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// Response for user creation
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResult {
    pub message: String,
    pub user: UserDto,
    pub needs_refresh: bool,
}

/// Response for user update
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserResult {
    pub user: UserDto,
    pub needs_refresh: bool,
}
