use std::sync::Arc;

use chrono::{Datelike, TimeZone, Utc};
use poem_openapi::{payload::Json, OpenApi};

use crate::api::{ApiTags, SessionAuth};
use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::types::dto::dashboard::DashboardStatsResponse;

const RECENT_ACTIVITY_LIMIT: usize = 20;
const NEW_REGISTRATION_WINDOW_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Dashboard statistics endpoint
pub struct DashboardApi {
    data: Arc<AppData>,
}

impl DashboardApi {
    pub fn new(data: Arc<AppData>) -> Self {
        Self { data }
    }
}

#[OpenApi(prefix_path = "/dashboard")]
impl DashboardApi {
    /// Aggregate counts for the dashboard view
    #[oai(path = "/stats", method = "get", tag = "ApiTags::Dashboard")]
    pub async fn stats(&self, auth: SessionAuth) -> Result<Json<DashboardStatsResponse>, ApiError> {
        self.data.guard.require_user(&auth.0.key).await?;

        let users = self.data.users.list_users().await?;
        let groups = self.data.directory.list_groups().await?;
        let activities = self.data.activities.list(None).await?;

        let cutoff = Utc::now().timestamp() - NEW_REGISTRATION_WINDOW_SECONDS;
        let new_registrations = users.iter().filter(|u| u.created_at >= cutoff).count() as u64;
        let blocked_accounts = users.iter().filter(|u| u.is_blocked).count() as u64;

        // Sunday-first weekday histogram over the whole log
        let mut activity_by_day = vec![0u64; 7];
        for entry in &activities {
            if let Some(moment) = Utc.timestamp_opt(entry.timestamp, 0).single() {
                activity_by_day[moment.weekday().num_days_from_sunday() as usize] += 1;
            }
        }

        let recent_activities = activities
            .into_iter()
            .take(RECENT_ACTIVITY_LIMIT)
            .map(Into::into)
            .collect();

        Ok(Json(DashboardStatsResponse {
            total_users: users.len() as u64,
            active_groups: groups.len() as u64,
            new_registrations,
            blocked_accounts,
            activity_by_day,
            recent_activities,
        }))
    }
}
