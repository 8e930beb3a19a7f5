use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::ServiceError;
use crate::types::dto::common::ErrorBody;

/// HTTP error responses shared by all endpoints
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Validation failure or uniqueness violation
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),

    /// No session credential, or bad login credentials
    #[oai(status = 401)]
    Unauthorized(Json<ErrorBody>),

    /// Session credential is malformed or expired
    #[oai(status = 403)]
    Forbidden(Json<ErrorBody>),

    /// Referenced entity is absent
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),

    /// Store failure or violated graph invariant
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

impl ApiError {
    fn body(error: impl Into<String>) -> Json<ErrorBody> {
        Json(ErrorBody {
            error: error.into(),
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(Self::body(message))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(Self::body(message))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(Self::body(message))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Self::body(message))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(Self::body(message))
    }

    /// Get the error message carried by this response
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(json) => &json.0.error,
            ApiError::Unauthorized(json) => &json.0.error,
            ApiError::Forbidden(json) => &json.0.error,
            ApiError::NotFound(json) => &json.0.error,
            ApiError::Internal(json) => &json.0.error,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Unauthorized => ApiError::unauthorized(err.to_string()),
            ServiceError::Forbidden => ApiError::forbidden(err.to_string()),
            ServiceError::InvalidUsername | ServiceError::InvalidPassword => {
                ApiError::unauthorized(err.to_string())
            }
            ServiceError::Conflict(_) | ServiceError::Validation(_) => {
                ApiError::bad_request(err.to_string())
            }
            ServiceError::NotFound(_) => ApiError::not_found(err.to_string()),
            ServiceError::Internal { .. } => {
                // Do not leak store internals to the client
                tracing::error!("internal failure: {}", err);
                ApiError::internal("Internal error")
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_bad_request() {
        let api: ApiError = ServiceError::conflict("Permission key").into();
        match api {
            ApiError::BadRequest(json) => {
                assert_eq!(json.0.error, "Permission key already exists")
            }
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let api: ApiError = ServiceError::Forbidden.into();
        assert!(matches!(api, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_internal_message_is_not_leaked() {
        let api: ApiError = ServiceError::internal("update_role", "UNIQUE constraint").into();
        assert_eq!(api.message(), "Internal error");
    }

    #[test]
    fn test_login_errors_map_to_unauthorized() {
        let user: ApiError = ServiceError::InvalidUsername.into();
        let pass: ApiError = ServiceError::InvalidPassword.into();
        assert_eq!(user.message(), "Invalid username");
        assert_eq!(pass.message(), "Invalid password");
        assert!(matches!(user, ApiError::Unauthorized(_)));
        assert!(matches!(pass, ApiError::Unauthorized(_)));
    }
}
