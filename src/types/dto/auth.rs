use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for account registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Username for the new account
    #[oai(validator(min_length = 3, max_length = 64))]
    pub username: String,

    /// Password (minimum 8 characters)
    #[oai(validator(min_length = 8))]
    pub password: String,

    /// Email address
    #[oai(validator(min_length = 3, max_length = 254))]
    pub email: String,

    /// First name
    #[oai(validator(min_length = 1))]
    pub first_name: String,

    /// Last name
    #[oai(validator(min_length = 1))]
    pub last_name: String,

    /// Optional avatar image reference
    pub avatar_url: Option<String>,

    /// Id of the group to join (must be a non-admin group)
    pub group_id: i32,
}

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    #[oai(validator(min_length = 1))]
    pub username: String,

    /// Password for authentication
    #[oai(validator(min_length = 1))]
    pub password: String,
}

/// Request model for password recovery
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RecoverPasswordRequest {
    /// Email address of the account to recover
    #[oai(validator(min_length = 1))]
    pub email: String,
}
