use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Actor reference populated onto an activity entry
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct ActivityActor {
    /// Username of the acting identity, or "unknown" when it no longer exists
    pub username: String,
}

/// One entry of the dashboard audit feed
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub user_id: ActivityActor,
    pub action: String,
    pub target: String,
    pub timestamp: String,
}
