use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::errors::StoreError;
use crate::services::crypto;
use crate::types::db::session::{self, Entity as Session};

/// Server-side session records behind the browser cookie.
///
/// Only the HMAC-SHA256 digest of a token is persisted; the plaintext token
/// exists solely in the cookie the client holds. Sessions carry a fixed
/// expiry; an expired session resolves to unauthenticated and is removed on
/// touch. A user may hold any number of concurrent sessions.
pub struct SessionStore {
    db: DatabaseConnection,
    secret: String,
    ttl_seconds: i64,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection, secret: String, ttl_hours: i64) -> Self {
        Self {
            db,
            secret,
            ttl_seconds: ttl_hours * 60 * 60,
        }
    }

    /// Session lifetime in seconds; also used for the cookie max-age.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Open a new session for a user and return the plaintext token to be
    /// placed in the cookie.
    pub async fn open(&self, user_id: i32) -> Result<String, StoreError> {
        let token = crypto::generate_session_token();
        let now = Utc::now().timestamp();

        let record = session::ActiveModel {
            token_hash: Set(crypto::hmac_sha256_token(&self.secret, &token)),
            user_id: Set(user_id),
            expires_at: Set(now + self.ttl_seconds),
            created_at: Set(now),
        };
        record.insert(&self.db).await?;

        Ok(token)
    }

    /// Resolve a cookie token back to a user id. Unknown and expired tokens
    /// both resolve to `None`; expired rows are deleted on the way out.
    pub async fn resolve(&self, token: &str) -> Result<Option<i32>, StoreError> {
        let token_hash = crypto::hmac_sha256_token(&self.secret, token);

        let record = Session::find_by_id(token_hash.clone()).one(&self.db).await?;
        let record = match record {
            Some(record) => record,
            None => return Ok(None),
        };

        if record.expires_at < Utc::now().timestamp() {
            Session::delete_by_id(token_hash).exec(&self.db).await?;
            return Ok(None);
        }

        Ok(Some(record.user_id))
    }

    /// Destroy a session server-side. Closing an unknown token is a no-op.
    pub async fn close(&self, token: &str) -> Result<(), StoreError> {
        let token_hash = crypto::hmac_sha256_token(&self.secret, token);
        Session::delete_by_id(token_hash).exec(&self.db).await?;
        Ok(())
    }

    /// Remove every expired session row. Returns the number removed.
    pub async fn sweep_expired(&self) -> Result<u64, StoreError> {
        let result = Session::delete_many()
            .filter(session::Column::ExpiresAt.lt(Utc::now().timestamp()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("db", &"<connection>")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}
