use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use crate::errors::StoreError;
use crate::types::db::user::{self, Entity as User};

/// Fields required to create a user. The password must already be hashed;
/// this store never sees plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub group_id: i32,
}

/// Partial update of a user record. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub group_id: Option<i32>,
}

/// Repository for user records and the uniqueness invariants on
/// username/email. Uniqueness is checked up front for friendly errors and
/// backstopped by the database unique constraints, so two concurrent creates
/// for the same username cannot both win.
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<user::Model>, StoreError> {
        Ok(User::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, StoreError> {
        Ok(User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, StoreError> {
        Ok(User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    pub async fn list_users(&self) -> Result<Vec<user::Model>, StoreError> {
        Ok(User::find().order_by_asc(user::Column::Id).all(&self.db).await?)
    }

    /// Insert a new user. New accounts start active and unblocked.
    ///
    /// # Errors
    /// `Conflict` when the username or email is already taken.
    pub async fn create_user(&self, new_user: NewUser) -> Result<user::Model, StoreError> {
        if self.find_by_username(&new_user.username).await?.is_some() {
            return Err(StoreError::conflict("Username already exists"));
        }
        if self.find_by_email(&new_user.email).await?.is_some() {
            return Err(StoreError::conflict("Email already in use"));
        }

        let model = user::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            avatar_url: Set(new_user.avatar_url),
            is_active: Set(true),
            is_blocked: Set(false),
            group_id: Set(new_user.group_id),
            last_login: Set(None),
            created_at: Set(Utc::now().timestamp()),
        };

        model.insert(&self.db).await.map_err(|e| {
            // The unique constraint is the authority under concurrency
            if e.to_string().contains("UNIQUE") {
                StoreError::conflict("Username or email already in use")
            } else {
                StoreError::Database(e)
            }
        })
    }

    /// Apply a partial update. An email change re-checks uniqueness against
    /// every other account.
    pub async fn update_user(&self, id: i32, patch: UserPatch) -> Result<user::Model, StoreError> {
        let existing = self
            .get_user(id)
            .await?
            .ok_or(StoreError::NotFound("user"))?;

        if let Some(email) = &patch.email {
            if let Some(other) = self.find_by_email(email).await? {
                if other.id != id {
                    return Err(StoreError::conflict("Email already in use"));
                }
            }
        }

        let mut model = existing.into_active_model();
        if let Some(first_name) = patch.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = patch.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(email) = patch.email {
            model.email = Set(email);
        }
        if let Some(avatar_url) = patch.avatar_url {
            model.avatar_url = Set(avatar_url);
        }
        if let Some(is_active) = patch.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(group_id) = patch.group_id {
            model.group_id = Set(group_id);
        }

        Ok(model.update(&self.db).await?)
    }

    /// Flip `is_blocked` on. Idempotent: blocking an already-blocked user
    /// succeeds and changes nothing.
    pub async fn block_user(&self, id: i32) -> Result<user::Model, StoreError> {
        self.set_blocked(id, true).await
    }

    /// Flip `is_blocked` off. Idempotent, like `block_user`.
    pub async fn unblock_user(&self, id: i32) -> Result<user::Model, StoreError> {
        self.set_blocked(id, false).await
    }

    async fn set_blocked(&self, id: i32, blocked: bool) -> Result<user::Model, StoreError> {
        let existing = self
            .get_user(id)
            .await?
            .ok_or(StoreError::NotFound("user"))?;
        let mut model = existing.into_active_model();
        model.is_blocked = Set(blocked);
        Ok(model.update(&self.db).await?)
    }

    /// Record a successful login time.
    pub async fn touch_last_login(&self, id: i32) -> Result<user::Model, StoreError> {
        let existing = self
            .get_user(id)
            .await?
            .ok_or(StoreError::NotFound("user"))?;
        let mut model = existing.into_active_model();
        model.last_login = Set(Some(Utc::now().timestamp()));
        Ok(model.update(&self.db).await?)
    }

    /// Remove a user. Their sessions cascade away with the row.
    pub async fn delete_user(&self, id: i32) -> Result<(), StoreError> {
        let result = User::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("user"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::crypto;
    use crate::stores::DirectoryStore;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> (CredentialStore, i32) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let directory = DirectoryStore::new(db.clone());
        let group = directory
            .create_group("Staff", None, "#3B82F6", false)
            .await
            .expect("Failed to create group");

        (CredentialStore::new(db), group.id)
    }

    fn sample_user(group_id: i32) -> NewUser {
        NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: crypto::hash_password("password123").unwrap(),
            first_name: "Alice".to_string(),
            last_name: "Almeida".to_string(),
            avatar_url: None,
            group_id,
        }
    }

    #[tokio::test]
    async fn test_create_user_assigns_id_and_defaults() {
        let (store, group_id) = setup().await;

        let user = store.create_user(sample_user(group_id)).await.unwrap();

        assert!(user.id >= 1);
        assert!(user.is_active);
        assert!(!user.is_blocked);
        assert!(user.last_login.is_none());
        assert!(user.created_at > 0);
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_username() {
        let (store, group_id) = setup().await;
        store.create_user(sample_user(group_id)).await.unwrap();

        let mut duplicate = sample_user(group_id);
        duplicate.email = "other@example.com".to_string();
        let result = store.create_user(duplicate).await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        // No second record was created
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let (store, group_id) = setup().await;
        store.create_user(sample_user(group_id)).await.unwrap();

        let mut duplicate = sample_user(group_id);
        duplicate.username = "alice2".to_string();
        let result = store.create_user(duplicate).await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_find_by_username_and_email() {
        let (store, group_id) = setup().await;
        let created = store.create_user(sample_user(group_id)).await.unwrap();

        let by_name = store.find_by_username("alice").await.unwrap().unwrap();
        let by_email = store.find_by_email("alice@example.com").await.unwrap().unwrap();

        assert_eq!(by_name.id, created.id);
        assert_eq!(by_email.id, created.id);
        assert!(store.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_block_is_idempotent() {
        let (store, group_id) = setup().await;
        let user = store.create_user(sample_user(group_id)).await.unwrap();

        let once = store.block_user(user.id).await.unwrap();
        assert!(once.is_blocked);

        // Second block is a no-op, not an error
        let twice = store.block_user(user.id).await.unwrap();
        assert!(twice.is_blocked);

        let unblocked = store.unblock_user(user.id).await.unwrap();
        assert!(!unblocked.is_blocked);
        let again = store.unblock_user(user.id).await.unwrap();
        assert!(!again.is_blocked);
    }

    #[tokio::test]
    async fn test_update_user_partial_patch() {
        let (store, group_id) = setup().await;
        let user = store.create_user(sample_user(group_id)).await.unwrap();

        let updated = store
            .update_user(
                user.id,
                UserPatch {
                    first_name: Some("Alicia".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Alicia");
        // Untouched fields survive
        assert_eq!(updated.email, "alice@example.com");
        assert_eq!(updated.last_name, "Almeida");
    }

    #[tokio::test]
    async fn test_update_user_rejects_taken_email() {
        let (store, group_id) = setup().await;
        let alice = store.create_user(sample_user(group_id)).await.unwrap();
        let mut bob = sample_user(group_id);
        bob.username = "bob".to_string();
        bob.email = "bob@example.com".to_string();
        store.create_user(bob).await.unwrap();

        let result = store
            .update_user(
                alice.id,
                UserPatch {
                    email: Some("bob@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_user_keeps_own_email() {
        let (store, group_id) = setup().await;
        let alice = store.create_user(sample_user(group_id)).await.unwrap();

        // Re-submitting the current email is not a conflict
        let updated = store
            .update_user(
                alice.id,
                UserPatch {
                    email: Some("alice@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_touch_last_login() {
        let (store, group_id) = setup().await;
        let user = store.create_user(sample_user(group_id)).await.unwrap();
        assert!(user.last_login.is_none());

        let touched = store.touch_last_login(user.id).await.unwrap();
        assert!(touched.last_login.is_some());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (store, group_id) = setup().await;
        let user = store.create_user(sample_user(group_id)).await.unwrap();

        store.delete_user(user.id).await.unwrap();
        assert!(store.get_user(user.id).await.unwrap().is_none());

        let again = store.delete_user(user.id).await;
        assert!(matches!(again, Err(StoreError::NotFound(_))));
    }
}
