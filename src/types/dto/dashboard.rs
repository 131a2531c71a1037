use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::dto::activity::ActivityResponse;

/// Aggregate statistics for the dashboard view
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DashboardStatsResponse {
    /// Total number of user accounts
    pub total_users: u64,

    /// Total number of groups
    pub active_groups: u64,

    /// Accounts created within the last 30 days
    pub new_registrations: u64,

    /// Accounts currently blocked
    pub blocked_accounts: u64,

    /// Activity counts per weekday, Sunday first (7 buckets)
    pub activity_by_day: Vec<u64>,

    /// The 20 most recent audit entries, newest first
    pub recent_activities: Vec<ActivityResponse>,
}
