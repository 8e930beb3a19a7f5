use serde::{Deserialize, Serialize};

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (internal identity id)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}
