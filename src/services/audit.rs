use std::sync::Arc;

use crate::stores::ActivityStore;
use crate::types::internal::Action;

/// Best-effort audit recording for API handlers.
///
/// Audit entries are written after the mutation they describe has committed.
/// A failed append must not fail the request it documents, so errors are
/// logged and swallowed here rather than propagated.
pub struct AuditLogger {
    activities: Arc<ActivityStore>,
}

impl AuditLogger {
    pub fn new(activities: Arc<ActivityStore>) -> Self {
        Self { activities }
    }

    pub async fn log(&self, actor_user_id: i32, action: Action, description: impl Into<String>) {
        let description = description.into();
        if let Err(e) = self
            .activities
            .record(actor_user_id, action, description.clone())
            .await
        {
            tracing::warn!(
                actor_user_id,
                action = %action,
                description = %description,
                error = %e,
                "Failed to append audit entry"
            );
        }
    }
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger").finish()
    }
}
