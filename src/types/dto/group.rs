use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::group;

/// Group as returned to clients
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    /// Numeric group id
    pub id: i32,

    /// Unique group name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Display color (hex)
    pub color: String,

    /// Whether members of this group are administrators
    pub is_admin: bool,
}

impl From<group::Model> for GroupResponse {
    fn from(group: group::Model) -> Self {
        Self {
            id: group.id,
            name: group.name,
            description: group.description,
            color: group.color,
            is_admin: group.is_admin,
        }
    }
}

/// Request model for group creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    /// Unique group name
    #[oai(validator(min_length = 1, max_length = 64))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Display color (hex)
    #[oai(validator(min_length = 1))]
    pub color: String,
}

/// Partial update of a group. Absent fields are left unchanged.
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateGroupRequest {
    /// New group name (must remain unique)
    pub name: Option<String>,

    /// New description; an empty string removes the current one
    pub description: Option<String>,

    /// New display color
    pub color: Option<String>,
}
