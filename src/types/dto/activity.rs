use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::activity;

/// Audit-log entry as returned to clients
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResponse {
    /// Numeric entry id
    pub id: i64,

    /// Id of the acting user
    pub user_id: i32,

    /// Action tag (e.g. "login", "user_block")
    pub action: String,

    /// Human-readable description of the action
    pub description: String,

    /// Unix timestamp set at creation
    pub timestamp: i64,
}

impl From<activity::Model> for ActivityResponse {
    fn from(entry: activity::Model) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            action: entry.action,
            description: entry.description,
            timestamp: entry.timestamp,
        }
    }
}
