use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::{group_permission, permission};

/// Permission as returned to clients
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct PermissionResponse {
    /// Numeric permission id
    pub id: i32,

    /// Unique permission name
    pub name: String,

    /// Human-readable description
    pub description: String,
}

impl From<permission::Model> for PermissionResponse {
    fn from(permission: permission::Model) -> Self {
        Self {
            id: permission.id,
            name: permission.name,
            description: permission.description,
        }
    }
}

/// Request model for permission creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreatePermissionRequest {
    /// Unique permission name
    #[oai(validator(min_length = 1, max_length = 64))]
    pub name: String,

    /// Human-readable description
    #[oai(validator(min_length = 1))]
    pub description: String,
}

/// Partial update of a permission. Absent fields are left unchanged.
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdatePermissionRequest {
    /// New permission name (must remain unique)
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

/// Grant linking one permission to one group
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct GroupPermissionResponse {
    /// Numeric grant id
    pub id: i32,

    /// Group receiving the permission
    pub group_id: i32,

    /// Granted permission
    pub permission_id: i32,
}

impl From<group_permission::Model> for GroupPermissionResponse {
    fn from(grant: group_permission::Model) -> Self {
        Self {
            id: grant.id,
            group_id: grant.group_id,
            permission_id: grant.permission_id,
        }
    }
}

/// Request model for assigning a permission to a group
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AssignPermissionRequest {
    /// Id of the permission to grant
    pub permission_id: i32,
}
