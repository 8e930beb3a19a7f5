use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for administrator login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Profile summary returned on successful login
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub name: String,
    pub username: String,
    pub role: String,
    pub email: String,

    /// Internal identity id
    pub user_id: String,
}

/// Response body for successful login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginSuccess {
    /// Success message
    pub message: String,

    /// Authenticated identity profile
    pub user: LoginUser,
}

/// Profile plus resolved permission set, the client's capability snapshot
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,

    /// Internal identity id
    pub user_id: String,

    /// Permission keys resolved by dereferencing the identity's role
    pub permissions: Vec<String>,
}

/// Request model for bootstrap admin registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterAdminRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}
