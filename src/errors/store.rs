use sea_orm::DbErr;

/// Errors raised by the store layer. The API layer maps these onto the HTTP
/// error taxonomy; stores never produce HTTP-shaped values themselves.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// Attempt to delete an admin group.
    #[error("the administrators group cannot be deleted")]
    GroupReserved,

    /// Attempt to delete a group that still has member users.
    #[error("group still has {members} member(s)")]
    GroupNotEmpty { members: u64 },

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("crypto error: {0}")]
    Crypto(String),
}

impl StoreError {
    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict(message.into())
    }
}
