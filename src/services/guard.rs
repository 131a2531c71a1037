use std::sync::Arc;

use crate::errors::ApiError;
use crate::stores::{CredentialStore, DirectoryStore, SessionStore};
use crate::types::db::user;

/// Authorization gate applied before handler logic.
///
/// Both predicates are pure reads: they resolve the session cookie to an
/// identity and (for admin routes) check the identity's group, mutating
/// nothing. Admin status is an attribute of the group, not a magic id.
pub struct Guard {
    sessions: Arc<SessionStore>,
    users: Arc<CredentialStore>,
    directory: Arc<DirectoryStore>,
}

impl Guard {
    pub fn new(
        sessions: Arc<SessionStore>,
        users: Arc<CredentialStore>,
        directory: Arc<DirectoryStore>,
    ) -> Self {
        Self {
            sessions,
            users,
            directory,
        }
    }

    /// Resolve a session token to its user. Missing, unknown, and expired
    /// sessions all fail the same way.
    pub async fn require_user(&self, token: &str) -> Result<user::Model, ApiError> {
        let user_id = self
            .sessions
            .resolve(token)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(ApiError::unauthenticated)?;

        // The session may outlive the account it was opened for
        self.users
            .get_user(user_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(ApiError::unauthenticated)
    }

    /// Like `require_user`, but additionally requires membership in an admin
    /// group.
    pub async fn require_admin(&self, token: &str) -> Result<user::Model, ApiError> {
        let user = self.require_user(token).await?;
        if !self.is_admin(&user).await? {
            return Err(ApiError::forbidden("Administrator role required"));
        }
        Ok(user)
    }

    /// Whether the user's group carries the admin attribute. A dangling
    /// group reference counts as non-admin rather than erroring.
    pub async fn is_admin(&self, user: &user::Model) -> Result<bool, ApiError> {
        let group = self
            .directory
            .get_group(user.group_id)
            .await
            .map_err(ApiError::from)?;
        Ok(group.map(|g| g.is_admin).unwrap_or(false))
    }
}
