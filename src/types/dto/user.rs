use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;

/// User identity as returned to clients. Never carries the password hash.
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Numeric user id
    pub id: i32,

    /// Unique username
    pub username: String,

    /// Unique email address
    pub email: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Optional avatar image reference
    pub avatar_url: Option<String>,

    /// Whether the account is active
    pub is_active: bool,

    /// Whether the account is blocked from logging in
    pub is_blocked: bool,

    /// Id of the group the user belongs to
    pub group_id: i32,

    /// Unix timestamp of the last successful login, if any
    pub last_login: Option<i64>,

    /// Unix timestamp of account creation
    pub created_at: i64,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar_url: user.avatar_url,
            is_active: user.is_active,
            is_blocked: user.is_blocked,
            group_id: user.group_id,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

/// Partial update of a user record. Absent fields are left unchanged.
///
/// `is_active` and `group_id` are admin-only; non-admin requests carrying
/// them are rejected.
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// New first name
    pub first_name: Option<String>,

    /// New last name
    pub last_name: Option<String>,

    /// New email address (must remain unique)
    pub email: Option<String>,

    /// New avatar reference; an empty string removes the current avatar
    pub avatar_url: Option<String>,

    /// New active flag (admin only)
    pub is_active: Option<bool>,

    /// New group membership (admin only)
    pub group_id: Option<i32>,
}
