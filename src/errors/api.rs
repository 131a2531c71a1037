use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::store::StoreError;
use crate::types::dto::common::ErrorResponse;

/// HTTP-facing error taxonomy. Every handler failure is one of these; nothing
/// else escapes to the client.
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Malformed or missing input
    #[oai(status = 400)]
    Validation(Json<ErrorResponse>),

    /// Uniqueness violation
    #[oai(status = 400)]
    Conflict(Json<ErrorResponse>),

    /// No session, or the session has expired
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorResponse>),

    /// Login failure, deliberately undifferentiated between unknown user and
    /// wrong password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Login refused because the account is blocked
    #[oai(status = 401)]
    AccountBlocked(Json<ErrorResponse>),

    /// Authenticated but insufficient role, or a self-operation guard
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Referenced entity absent
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Unexpected store failure
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
        count: None,
    })
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(body("validation_error", message, 400))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(body("conflict", message, 400))
    }

    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated(body("unauthenticated", "Authentication required", 401))
    }

    pub fn invalid_credentials() -> Self {
        ApiError::InvalidCredentials(body(
            "invalid_credentials",
            "Invalid username or password",
            401,
        ))
    }

    pub fn account_blocked() -> Self {
        ApiError::AccountBlocked(body("account_blocked", "Account is blocked", 401))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(body("forbidden", message, 403))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(body("not_found", message, 404))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(body("internal_error", message, 500))
    }

    /// Conflict response for deleting a group that still has members; carries
    /// the member count so the client can surface it.
    pub fn group_not_empty(members: u64) -> Self {
        ApiError::Conflict(Json(ErrorResponse {
            error: "conflict".to_string(),
            message: format!("Cannot delete a group that still has {} member(s)", members),
            status_code: 400,
            count: Some(members),
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(json)
            | ApiError::Conflict(json)
            | ApiError::Unauthenticated(json)
            | ApiError::InvalidCredentials(json)
            | ApiError::AccountBlocked(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Internal(json) => &json.0.message,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => ApiError::not_found(format!("{} not found", entity)),
            StoreError::Conflict(message) => ApiError::conflict(message),
            StoreError::GroupReserved => {
                ApiError::validation("The administrators group cannot be deleted")
            }
            StoreError::GroupNotEmpty { members } => ApiError::group_not_empty(members),
            StoreError::Database(e) => {
                tracing::error!(error = %e, "database failure");
                ApiError::internal("Unexpected storage failure")
            }
            StoreError::Crypto(e) => {
                tracing::error!(error = %e, "crypto failure");
                ApiError::internal("Unexpected internal failure")
            }
        }
    }
}
