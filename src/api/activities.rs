use std::sync::Arc;

use poem_openapi::{param::Query, payload::Json, OpenApi};

use crate::api::{ApiTags, SessionAuth};
use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::types::dto::activity::ActivityResponse;

/// Audit log endpoints
pub struct ActivitiesApi {
    data: Arc<AppData>,
}

impl ActivitiesApi {
    pub fn new(data: Arc<AppData>) -> Self {
        Self { data }
    }
}

#[OpenApi(prefix_path = "/activities")]
impl ActivitiesApi {
    /// List audit entries, newest first.
    ///
    /// Administrators see everything and may filter by actor. Everyone else
    /// is always scoped to their own entries; asking for another user's
    /// entries is refused rather than silently narrowed.
    #[oai(path = "/", method = "get", tag = "ApiTags::Activities")]
    pub async fn list(
        &self,
        auth: SessionAuth,
        user_id: Query<Option<i32>>,
    ) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
        let actor = self.data.guard.require_user(&auth.0.key).await?;
        let actor_is_admin = self.data.guard.is_admin(&actor).await?;

        let filter = if actor_is_admin {
            user_id.0
        } else {
            if let Some(requested) = user_id.0 {
                if requested != actor.id {
                    return Err(ApiError::forbidden(
                        "Cannot view another user's activities",
                    ));
                }
            }
            Some(actor.id)
        };

        let entries = self.data.activities.list(filter).await?;
        Ok(Json(entries.into_iter().map(Into::into).collect()))
    }
}
