use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::StoreError;
use crate::types::db::activity::{self, Entity as Activity};
use crate::types::internal::Action;

/// Append-only audit trail. Entries are inserted with a server-assigned id
/// and timestamp and are never updated or deleted.
pub struct ActivityStore {
    db: DatabaseConnection,
}

impl ActivityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one audit entry attributed to `actor_user_id`.
    pub async fn record(
        &self,
        actor_user_id: i32,
        action: Action,
        description: impl Into<String>,
    ) -> Result<activity::Model, StoreError> {
        let entry = activity::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: Set(actor_user_id),
            action: Set(action.as_str().to_string()),
            description: Set(description.into()),
            timestamp: Set(Utc::now().timestamp()),
        };

        Ok(entry.insert(&self.db).await?)
    }

    /// List entries newest-first, optionally filtered to one actor.
    pub async fn list(&self, actor_user_id: Option<i32>) -> Result<Vec<activity::Model>, StoreError> {
        let mut query = Activity::find()
            .order_by_desc(activity::Column::Timestamp)
            .order_by_desc(activity::Column::Id);

        if let Some(user_id) = actor_user_id {
            query = query.filter(activity::Column::UserId.eq(user_id));
        }

        Ok(query.all(&self.db).await?)
    }
}

impl std::fmt::Debug for ActivityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityStore")
            .field("db", &"<connection>")
            .finish()
    }
}
