use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Standard error body: `{"error": "..."}`
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error description
    pub error: String,
}

/// Generic success message
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Success message
    pub message: String,
}

/// Response for delete operations on permission-relevant resources
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Success message
    pub message: String,

    /// Clients must re-resolve their cached permission set before trusting it
    pub needs_refresh: bool,
}

/// Response model for health check
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Current server time
    pub timestamp: String,
}

/// Render a unix timestamp as RFC 3339 for API payloads
pub fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
