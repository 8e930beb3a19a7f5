use thiserror::Error;

/// Internal error taxonomy for store and service operations
///
/// Not exposed over HTTP directly - the API boundary converts each variant
/// to the matching `ApiError` response.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No session credential was presented
    #[error("Unauthorized - No token")]
    Unauthorized,

    /// The session credential is malformed, expired, or has a bad signature
    #[error("Invalid token")]
    Forbidden,

    /// Login failed because the username is unknown
    #[error("Invalid username")]
    InvalidUsername,

    /// Login failed because the password does not match
    #[error("Invalid password")]
    InvalidPassword,

    /// Uniqueness violation on a username, display id, role name, or permission key
    #[error("{0} already exists")]
    Conflict(String),

    /// A referenced entity is absent
    #[error("{0} not found")]
    NotFound(String),

    /// Required request fields are missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Store I/O failure, or a dual-write that left the graph inconsistent
    #[error("{operation} failed: {message}")]
    Internal { operation: String, message: String },
}

impl ServiceError {
    /// Wrap a store or infrastructure failure with its operation context
    pub fn internal(operation: &str, err: impl std::fmt::Display) -> Self {
        ServiceError::Internal {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }

    pub fn conflict(entity: &str) -> Self {
        ServiceError::Conflict(entity.to_string())
    }

    pub fn not_found(entity: &str) -> Self {
        ServiceError::NotFound(entity.to_string())
    }

    pub fn validation(message: &str) -> Self {
        ServiceError::Validation(message.to_string())
    }
}
