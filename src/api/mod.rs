// API layer - HTTP endpoints
pub mod activities;
pub mod auth;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod users;

pub use activities::ActivityApi;
pub use auth::AuthApi;
pub use health::HealthApi;
pub use permissions::PermissionApi;
pub use roles::RoleApi;
pub use users::UserApi;

use poem_openapi::auth::ApiKey;
use poem_openapi::SecurityScheme;

use crate::errors::ApiError;
use crate::services::SessionService;
use crate::types::internal::Claims;

/// Session cookie authentication
///
/// The scheme rejects requests with no `token` cookie before the handler
/// runs, producing the 401 case; a cookie that fails verification is the
/// handler's 403.
#[derive(SecurityScheme)]
#[oai(ty = "api_key", key_name = "token", key_in = "cookie")]
pub struct SessionAuth(pub ApiKey);

/// Verify the session cookie, yielding the bound claims
pub(crate) fn authenticate(
    sessions: &SessionService,
    auth: &SessionAuth,
) -> Result<Claims, ApiError> {
    Ok(sessions.verify(&auth.0.key)?)
}
